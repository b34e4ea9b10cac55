//! The immutable view tree.
//!
//! Every node that owns children records how many nodes live below it. The diff engine numbers the old tree in
//! pre-order and uses these counts to skip whole subtrees, so they are computed once in the constructors and never
//! touched again.

use crate::{
    events::Mapper,
    facts::{organize_facts, Directive, Facts, Str},
    patch::WidgetPatch,
    sanitize,
};
use std::{
    any::{Any, TypeId},
    cell::OnceCell,
    fmt::{Debug, Formatter},
    rc::Rc,
};

/// A node of the view tree.
#[derive(Clone, Debug)]
pub enum VNode {
    /// A text node
    Text(VText),
    /// An element whose children are matched by position
    Element(VElement),
    /// An element whose children are matched by key
    Keyed(VKeyed),
    /// A subtree whose messages are transformed before reaching the parent
    Tagged(VTagged),
    /// A lazily produced subtree
    Thunk(VThunk),
    /// A node rendered and patched by user code
    Widget(VWidget),
}

/// A text node
#[derive(Clone, Debug, PartialEq)]
pub struct VText {
    pub(crate) text: Str,
}

/// An element with positional children
#[derive(Clone, Debug)]
pub struct VElement {
    pub(crate) tag: Str,
    pub(crate) namespace: Option<Str>,
    pub(crate) facts: Facts,
    pub(crate) children: Vec<VNode>,
    pub(crate) descendants: usize,
}

/// An element with keyed children
#[derive(Clone, Debug)]
pub struct VKeyed {
    pub(crate) tag: Str,
    pub(crate) namespace: Option<Str>,
    pub(crate) facts: Facts,
    pub(crate) children: Vec<(Str, VNode)>,
    pub(crate) descendants: usize,
}

/// A subtree wrapped in a message mapper
#[derive(Clone, Debug)]
pub struct VTagged {
    pub(crate) mapper: Mapper,
    pub(crate) inner: Box<VNode>,
    pub(crate) descendants: usize,
}

/// A subtree that is only produced when its arguments change.
///
/// Arguments are compared by reference, never by value.
#[derive(Clone)]
pub struct VThunk {
    pub(crate) args: Vec<Rc<dyn Any>>,
    pub(crate) produce: Rc<dyn Fn() -> VNode>,
    pub(crate) cached: OnceCell<Rc<VNode>>,
}

pub(crate) type WidgetRender = dyn Fn(&dyn Any, &mut dyn Any) -> Box<dyn Any>;
pub(crate) type WidgetDiff = dyn Fn(&dyn Any, &dyn Any) -> Option<WidgetPatch>;

/// A node whose display subtree is owned by user code.
#[derive(Clone)]
pub struct VWidget {
    pub(crate) facts: Facts,
    pub(crate) model: Rc<dyn Any>,
    pub(crate) render_fn: *const (),
    pub(crate) backend: TypeId,
    pub(crate) render: Rc<WidgetRender>,
    pub(crate) diff: Rc<WidgetDiff>,
}

impl VNode {
    /// Create a text node.
    pub fn text(text: impl Into<Str>) -> Self {
        VNode::Text(VText { text: text.into() })
    }

    /// Create an element in the default namespace.
    pub fn element(
        tag: impl Into<Str>,
        directives: impl IntoIterator<Item = Directive>,
        children: impl IntoIterator<Item = VNode>,
    ) -> Self {
        Self::build_element(tag.into(), None, directives, children)
    }

    /// Create an element in a namespace, such as svg.
    pub fn element_ns(
        namespace: impl Into<Str>,
        tag: impl Into<Str>,
        directives: impl IntoIterator<Item = Directive>,
        children: impl IntoIterator<Item = VNode>,
    ) -> Self {
        Self::build_element(tag.into(), Some(namespace.into()), directives, children)
    }

    fn build_element(
        tag: Str,
        namespace: Option<Str>,
        directives: impl IntoIterator<Item = Directive>,
        children: impl IntoIterator<Item = VNode>,
    ) -> Self {
        let children: Vec<VNode> = children.into_iter().collect();
        let descendants = children.iter().map(|c| 1 + c.descendants()).sum();
        VNode::Element(VElement {
            tag: sanitize::tag(tag),
            namespace,
            facts: organize_facts(directives),
            children,
            descendants,
        })
    }

    /// Create an element whose children are identified by key.
    pub fn keyed(
        tag: impl Into<Str>,
        directives: impl IntoIterator<Item = Directive>,
        children: impl IntoIterator<Item = (Str, VNode)>,
    ) -> Self {
        Self::build_keyed(tag.into(), None, directives, children)
    }

    /// Create a keyed element in a namespace.
    pub fn keyed_ns(
        namespace: impl Into<Str>,
        tag: impl Into<Str>,
        directives: impl IntoIterator<Item = Directive>,
        children: impl IntoIterator<Item = (Str, VNode)>,
    ) -> Self {
        Self::build_keyed(tag.into(), Some(namespace.into()), directives, children)
    }

    fn build_keyed(
        tag: Str,
        namespace: Option<Str>,
        directives: impl IntoIterator<Item = Directive>,
        children: impl IntoIterator<Item = (Str, VNode)>,
    ) -> Self {
        let children: Vec<(Str, VNode)> = children.into_iter().collect();
        let descendants = children.iter().map(|(_, c)| 1 + c.descendants()).sum();
        VNode::Keyed(VKeyed {
            tag: sanitize::tag(tag),
            namespace,
            facts: organize_facts(directives),
            children,
            descendants,
        })
    }

    /// Transform every message produced inside `inner` with `mapper`.
    pub fn map(mapper: Mapper, inner: VNode) -> Self {
        let descendants = 1 + inner.descendants();
        VNode::Tagged(VTagged {
            mapper,
            inner: Box::new(inner),
            descendants,
        })
    }

    /// Create a lazy node.
    ///
    /// `produce` runs at most once per thunk, and only when the thunk is rendered or when its arguments differ
    /// from the arguments of the thunk it replaces. Arguments that are the same allocations as last time let the
    /// whole subtree be reused without producing it.
    pub fn thunk(args: Vec<Rc<dyn Any>>, produce: impl Fn() -> VNode + 'static) -> Self {
        VNode::Thunk(VThunk {
            args,
            produce: Rc::new(produce),
            cached: OnceCell::new(),
        })
    }

    /// Create a widget rendered and patched by the given functions.
    ///
    /// Two widgets are only patched in place when they share the same `render` function, model type and backend.
    /// `diff` is called with the old and new models and may return a [`WidgetPatch`] to run against the live
    /// display node.
    ///
    /// The render function is compared by address. Rust does not promise that a function has a single address:
    /// the same function can show up at two addresses across codegen units, and identical functions can be
    /// merged into one. The first only costs a redraw. Against the second, give every kind of widget a model type
    /// of its own.
    ///
    /// A widget is tied to the display backend `D` its render function was written for.
    pub fn widget<D: crate::Dom, M: 'static>(
        directives: impl IntoIterator<Item = Directive>,
        model: M,
        render: fn(&M, &mut D) -> Result<D::Node, D::Error>,
        diff: fn(&M, &M) -> Option<WidgetPatch>,
    ) -> Self {
        VNode::Widget(VWidget {
            facts: organize_facts(directives),
            model: Rc::new(model),
            render_fn: render as *const (),
            backend: TypeId::of::<D>(),
            render: Rc::new(move |model: &dyn Any, dom: &mut dyn Any| {
                let Some(model) = model.downcast_ref::<M>() else {
                    panic!("widget model is not a `{}`", std::any::type_name::<M>());
                };
                let Some(dom) = dom.downcast_mut::<D>() else {
                    panic!(
                        "widget rendered with a backend other than `{}`",
                        std::any::type_name::<D>()
                    );
                };
                Box::new(render(model, dom))
            }),
            diff: Rc::new(move |old: &dyn Any, new: &dyn Any| {
                match (old.downcast_ref::<M>(), new.downcast_ref::<M>()) {
                    (Some(old), Some(new)) => diff(old, new),
                    _ => panic!("widget model is not a `{}`", std::any::type_name::<M>()),
                }
            }),
        })
    }

    /// The number of nodes below this one, as seen by the diff engine.
    pub fn descendants(&self) -> usize {
        match self {
            VNode::Element(el) => el.descendants,
            VNode::Keyed(el) => el.descendants,
            VNode::Tagged(tagged) => tagged.descendants,
            VNode::Text(_) | VNode::Thunk(_) | VNode::Widget(_) => 0,
        }
    }

    /// Whether the node has no children in the index space of its parent.
    pub fn is_leaf(&self) -> bool {
        matches!(self, VNode::Text(_) | VNode::Thunk(_) | VNode::Widget(_))
    }

    /// The text of a text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            VNode::Text(text) => Some(&text.text),
            _ => None,
        }
    }

    /// The tag of an element, keyed or not.
    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element(el) => Some(&el.tag),
            VNode::Keyed(el) => Some(&el.tag),
            _ => None,
        }
    }

    /// The facts of an element or widget.
    pub fn facts(&self) -> Option<&Facts> {
        match self {
            VNode::Element(el) => Some(&el.facts),
            VNode::Keyed(el) => Some(&el.facts),
            VNode::Widget(widget) => Some(&widget.facts),
            _ => None,
        }
    }
}

impl VThunk {
    /// The subtree of this thunk, producing it on first use.
    pub fn force(&self) -> &VNode {
        self.content()
    }

    /// Check if the subtree was already produced.
    pub fn is_forced(&self) -> bool {
        self.cached.get().is_some()
    }

    pub(crate) fn content(&self) -> &Rc<VNode> {
        self.cached.get_or_init(|| Rc::new((self.produce)()))
    }

    /// Reuse a subtree produced by an earlier thunk. Has no effect once this thunk was forced.
    pub(crate) fn adopt(&self, node: Rc<VNode>) {
        let _ = self.cached.set(node);
    }

    pub(crate) fn same_args(&self, other: &VThunk) -> bool {
        self.args.len() == other.args.len()
            && self
                .args
                .iter()
                .zip(&other.args)
                .all(|(a, b)| Rc::ptr_eq(a, b))
    }
}

impl Debug for VThunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VThunk")
            .field("args", &self.args.len())
            .field("cached", &self.cached.get())
            .finish()
    }
}

impl VWidget {
    /// Check if both widgets were built from the same render function, model type and backend.
    pub(crate) fn same_kind(&self, other: &VWidget) -> bool {
        std::ptr::eq(self.render_fn, other.render_fn)
            && self.backend == other.backend
            && (*self.model).type_id() == (*other.model).type_id()
    }
}

impl Debug for VWidget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VWidget")
            .field("facts", &self.facts)
            .field("render_fn", &self.render_fn)
            .finish_non_exhaustive()
    }
}
