//! Event handlers and the event-redirection chain.
//!
//! Display backends never see application messages directly. A listener attached to a display node holds a
//! [`Handler`] that turns a raw event payload into a [`Message`], and an [`EventRoot`] that carries the message up
//! through every `map`ped subtree until it reaches the application's sink.

use std::{
    any::Any,
    cell::RefCell,
    fmt::Debug,
    rc::Rc,
};

/// A message produced by a handler, opaque to the diffing engine.
pub type Message = Box<dyn Any>;

/// A function that transforms the messages of a subtree into messages of its parent.
///
/// Mappers are compared by reference: two mappers are "the same" only when they share the same allocation.
#[derive(Clone)]
pub struct Mapper(Rc<dyn Fn(Message) -> Message>);

impl Mapper {
    /// Wrap a raw message transformation.
    pub fn new(f: impl Fn(Message) -> Message + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Create a mapper that converts messages of type `A` into messages of type `B`.
    ///
    /// Messages of any other type pass through untouched.
    pub fn typed<A: 'static, B: 'static>(f: impl Fn(A) -> B + 'static) -> Self {
        Self::new(move |msg: Message| match msg.downcast::<A>() {
            Ok(msg) => Box::new(f(*msg)) as Message,
            Err(msg) => {
                tracing::warn!(
                    "mapper expected a message of type `{}`, passing it through unchanged",
                    std::any::type_name::<A>()
                );
                msg
            }
        })
    }

    /// Run the mapper on a message.
    pub fn call(&self, msg: Message) -> Message {
        (self.0)(msg)
    }

    /// Check if two mappers are the same function instance.
    pub fn ptr_eq(&self, other: &Mapper) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Mapper")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// What a handler wants done with the event that triggered it.
pub struct Dispatch {
    /// The message to send to the application.
    pub message: Message,
    /// Stop the event from bubbling further up the display tree.
    pub stop_propagation: bool,
    /// Prevent the default action of the display backend.
    pub prevent_default: bool,
}

impl Dispatch {
    /// A dispatch that only sends a message.
    pub fn message(message: impl Any) -> Self {
        Self {
            message: Box::new(message),
            stop_propagation: false,
            prevent_default: false,
        }
    }
}

impl Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatch")
            .field("stop_propagation", &self.stop_propagation)
            .field("prevent_default", &self.prevent_default)
            .finish_non_exhaustive()
    }
}

/// The capabilities a handler claims over its event.
///
/// Listeners whose handler can never prevent the default action are registered as passive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Only produces messages.
    Normal,
    /// May stop propagation.
    MayStopPropagation,
    /// May prevent the default action.
    MayPreventDefault,
    /// May do both.
    Custom,
}

impl HandlerKind {
    /// Whether a listener with this kind of handler can be registered as passive.
    pub fn is_passive(self) -> bool {
        matches!(self, HandlerKind::Normal | HandlerKind::MayStopPropagation)
    }
}

type HandlerFn = dyn Fn(&dyn Any) -> Option<Dispatch>;

/// Turns a raw event payload into a message.
///
/// The payload is whatever the display backend hands to the listener (a `web_sys::Event`, a test payload, ...).
/// Returning `None` means the handler is not interested in this particular event.
#[derive(Clone)]
pub struct Handler {
    kind: HandlerKind,
    callback: Rc<HandlerFn>,
}

impl Handler {
    /// A handler that only produces messages.
    pub fn new<M: Any>(f: impl Fn(&dyn Any) -> Option<M> + 'static) -> Self {
        Self {
            kind: HandlerKind::Normal,
            callback: Rc::new(move |event: &dyn Any| f(event).map(Dispatch::message)),
        }
    }

    /// A handler that ignores the payload and always produces a clone of the same message.
    pub fn always<M: Any + Clone>(message: M) -> Self {
        Self::new(move |_| Some(message.clone()))
    }

    /// A handler with full control over propagation and the default action.
    pub fn custom(
        kind: HandlerKind,
        f: impl Fn(&dyn Any) -> Option<Dispatch> + 'static,
    ) -> Self {
        Self {
            kind,
            callback: Rc::new(f),
        }
    }

    /// The kind of this handler
    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    /// Run the handler against a raw event payload.
    pub fn call(&self, event: &dyn Any) -> Option<Dispatch> {
        let mut dispatch = (self.callback)(event)?;

        // Handlers may only use the capabilities their kind declares
        match self.kind {
            HandlerKind::Normal => {
                dispatch.stop_propagation = false;
                dispatch.prevent_default = false;
            }
            HandlerKind::MayStopPropagation => dispatch.prevent_default = false,
            HandlerKind::MayPreventDefault => dispatch.stop_propagation = false,
            HandlerKind::Custom => {}
        }

        Some(dispatch)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("kind", &self.kind)
            .field("callback", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

enum EventNode {
    Sink(Rc<dyn Fn(Message)>),
    Mapped {
        mappers: RefCell<Vec<Mapper>>,
        parent: EventRoot,
    },
}

/// One link of the event-redirection chain.
///
/// The chain ends at a sink provided by the application. Every `map`ped subtree adds a link holding its mappers;
/// messages travel from the innermost link outwards, applying the innermost mapper first.
#[derive(Clone)]
pub struct EventRoot(Rc<EventNode>);

impl EventRoot {
    /// The end of every chain: the function that receives messages for the application.
    pub fn sink(f: impl Fn(Message) + 'static) -> Self {
        Self(Rc::new(EventNode::Sink(Rc::new(f))))
    }

    /// A sink that throws every message away.
    pub fn discard() -> Self {
        Self::sink(|_| {})
    }

    /// Add a link to the chain.
    ///
    /// The mappers are stored outermost first, the way they are written in the view.
    pub fn mapped(mappers: Vec<Mapper>, parent: EventRoot) -> Self {
        Self(Rc::new(EventNode::Mapped {
            mappers: RefCell::new(mappers),
            parent,
        }))
    }

    /// Send a message up the chain.
    pub fn dispatch(&self, mut message: Message) {
        let mut current = self;
        loop {
            match &*current.0 {
                EventNode::Sink(sink) => return sink(message),
                EventNode::Mapped { mappers, parent } => {
                    for mapper in mappers.borrow().iter().rev() {
                        message = mapper.call(message);
                    }
                    current = parent;
                }
            }
        }
    }

    /// Rewrite the mappers of this link in place.
    ///
    /// Every listener dispatching through this link picks up the new mappers immediately. Rewriting a sink is a
    /// no-op.
    pub fn replace_mappers(&self, new: Vec<Mapper>) {
        match &*self.0 {
            EventNode::Mapped { mappers, .. } => *mappers.borrow_mut() = new,
            EventNode::Sink(_) => {
                tracing::warn!("attempted to replace the mappers of an event sink");
            }
        }
    }

    /// The mappers of this link, empty for a sink.
    pub fn mappers(&self) -> Vec<Mapper> {
        match &*self.0 {
            EventNode::Mapped { mappers, .. } => mappers.borrow().clone(),
            EventNode::Sink(_) => Vec::new(),
        }
    }

    /// The next link outwards, `None` for the sink.
    pub fn parent(&self) -> Option<&EventRoot> {
        match &*self.0 {
            EventNode::Mapped { parent, .. } => Some(parent),
            EventNode::Sink(_) => None,
        }
    }

    /// Check if two roots are the same link.
    pub fn ptr_eq(&self, other: &EventRoot) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for EventRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &*self.0 {
            EventNode::Sink(_) => f.write_str("EventRoot::Sink"),
            EventNode::Mapped { mappers, parent } => f
                .debug_struct("EventRoot::Mapped")
                .field("mappers", &mappers.borrow().len())
                .field("parent", parent)
                .finish(),
        }
    }
}

/// What the display backend should do with an event after a listener handled it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Stop the event from bubbling.
    pub stop_propagation: bool,
    /// Prevent the backend's default action.
    pub prevent_default: bool,
}

struct ListenerInner {
    handler: RefCell<Handler>,
    root: EventRoot,
    passive: bool,
}

/// The callback a display backend stores for one event name on one node.
///
/// Cloning a listener is cheap and yields a handle to the same callback, so backends can hand it to their native
/// event system while the patch engine keeps updating the handler.
#[derive(Clone)]
pub struct Listener(Rc<ListenerInner>);

impl Listener {
    /// Create a listener dispatching through `root`.
    pub fn new(handler: Handler, root: EventRoot) -> Self {
        let passive = handler.kind().is_passive();
        Self(Rc::new(ListenerInner {
            handler: RefCell::new(handler),
            root,
            passive,
        }))
    }

    /// Whether the backend may register this listener as passive.
    pub fn is_passive(&self) -> bool {
        self.0.passive
    }

    /// The handler currently installed.
    pub fn handler(&self) -> Handler {
        self.0.handler.borrow().clone()
    }

    /// Try to swap the handler without re-registering the listener.
    ///
    /// Only possible when the kinds match, since the passive flag was fixed at registration. Returns `false` when the
    /// listener has to be replaced instead.
    pub fn swap_handler(&self, handler: &Handler) -> bool {
        let mut current = self.0.handler.borrow_mut();
        if current.kind() != handler.kind() {
            return false;
        }
        *current = handler.clone();
        true
    }

    /// Handle a raw event payload, dispatching the resulting message (if any) up the event chain.
    pub fn handle(&self, event: &dyn Any) -> EventOutcome {
        // Release the borrow before dispatching: the application may re-render synchronously
        let handler = self.handler();
        let Some(dispatch) = handler.call(event) else {
            return EventOutcome::default();
        };

        let outcome = EventOutcome {
            stop_propagation: dispatch.stop_propagation,
            prevent_default: dispatch.prevent_default,
        };
        self.0.root.dispatch(dispatch.message);
        outcome
    }

    /// Check if two listeners are the same callback.
    pub fn ptr_eq(&self, other: &Listener) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("handler", &*self.0.handler.borrow())
            .field("passive", &self.0.passive)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn mappers_apply_innermost_first() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let seen = seen.clone();
            EventRoot::sink(move |msg| seen.borrow_mut().push(*msg.downcast::<String>().unwrap()))
        };

        let outer = EventRoot::mapped(
            vec![
                Mapper::typed(|s: String| format!("a({s})")),
                Mapper::typed(|s: String| format!("b({s})")),
            ],
            sink,
        );
        let inner = EventRoot::mapped(vec![Mapper::typed(|s: String| format!("c({s})"))], outer);

        inner.dispatch(Box::new("x".to_string()));
        assert_eq!(seen.borrow().as_slice(), ["a(b(c(x)))"]);
    }

    #[test]
    fn links_lead_out_to_the_sink() {
        let sink = EventRoot::discard();
        let outer = EventRoot::mapped(vec![Mapper::typed(|n: i32| n + 1)], sink.clone());
        let inner = EventRoot::mapped(
            vec![Mapper::typed(|n: i32| n * 2), Mapper::typed(|n: i32| n - 1)],
            outer.clone(),
        );

        assert_eq!(inner.mappers().len(), 2);
        assert!(inner.parent().unwrap().ptr_eq(&outer));
        assert!(outer.parent().unwrap().ptr_eq(&sink));
        assert!(sink.parent().is_none());
        assert!(sink.mappers().is_empty());
    }

    #[test]
    fn replacing_mappers_is_visible_to_existing_listeners() {
        let seen = Rc::new(Cell::new(0));
        let sink = {
            let seen = seen.clone();
            EventRoot::sink(move |msg| seen.set(*msg.downcast::<i32>().unwrap()))
        };
        let link = EventRoot::mapped(vec![Mapper::typed(|n: i32| n + 1)], sink);
        let listener = Listener::new(Handler::always(10), link.clone());

        listener.handle(&());
        assert_eq!(seen.get(), 11);

        let double = Mapper::typed(|n: i32| n * 2);
        link.replace_mappers(vec![double.clone()]);
        assert!(link.mappers()[0].ptr_eq(&double));
        listener.handle(&());
        assert_eq!(seen.get(), 20);
    }

    #[test]
    fn handler_kind_limits_dispatch_flags() {
        let handler = Handler::custom(HandlerKind::MayStopPropagation, |_| {
            Some(Dispatch {
                message: Box::new(()),
                stop_propagation: true,
                prevent_default: true,
            })
        });
        let listener = Listener::new(handler, EventRoot::discard());
        assert!(listener.is_passive());
        assert_eq!(
            listener.handle(&()),
            EventOutcome {
                stop_propagation: true,
                prevent_default: false
            }
        );
    }

    #[test]
    fn swap_requires_matching_kind() {
        let listener = Listener::new(Handler::always(1), EventRoot::discard());
        assert!(listener.swap_handler(&Handler::always(2)));
        let custom = Handler::custom(HandlerKind::Custom, |_| None);
        assert!(!listener.swap_handler(&custom));
    }
}
