//! Listeners installed by rendering and patching, and the messages they deliver.

use pretty_assertions::assert_eq;
use std::{any::Any, cell::RefCell, rc::Rc};
use trellis_core::{prelude::*, Dispatch, EventOutcome};
use trellis_memory::{MemoryDom, NodeId};

#[derive(Debug, Clone, PartialEq)]
enum Msg {
    Clicked,
    Typed(String),
    Child(i32),
}

/// A sink that records every message it receives.
fn recording() -> (EventRoot, Rc<RefCell<Vec<Msg>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = {
        let seen = seen.clone();
        EventRoot::sink(move |msg| match msg.downcast::<Msg>() {
            Ok(msg) => seen.borrow_mut().push(*msg),
            Err(_) => panic!("the application received a message that is not a `Msg`"),
        })
    };
    (sink, seen)
}

fn button(handler: Handler) -> VNode {
    VNode::element("button", [Directive::on("click", handler)], [VNode::text("go")])
}

fn first_child(updater: &DomUpdater<MemoryDom>) -> NodeId {
    updater.dom().children(*updater.root())[0]
}

#[test]
fn clicks_reach_the_application() {
    let (sink, seen) = recording();
    let updater = DomUpdater::new(
        MemoryDom::new(),
        button(Handler::always(Msg::Clicked)),
        sink,
    )
    .unwrap();

    let root = *updater.root();
    assert_eq!(updater.dom().get(root).unwrap().listening_for(), ["click"]);

    updater.dom().dispatch(root, "click", &());
    updater.dom().dispatch(root, "click", &());
    assert_eq!(*seen.borrow(), [Msg::Clicked, Msg::Clicked]);
}

#[test]
fn handlers_read_the_payload() {
    let (sink, seen) = recording();
    let input = VNode::element(
        "input",
        [Directive::on(
            "input",
            Handler::new(|event: &dyn Any| event.downcast_ref::<String>().cloned().map(Msg::Typed)),
        )],
        [],
    );
    let updater = DomUpdater::new(MemoryDom::new(), input, sink).unwrap();
    let root = *updater.root();

    updater.dom().dispatch(root, "input", &String::from("hello"));
    // not a payload the handler understands
    updater.dom().dispatch(root, "input", &5);

    assert_eq!(*seen.borrow(), [Msg::Typed("hello".into())]);
}

#[test]
fn events_bubble_until_stopped() {
    let (sink, seen) = recording();

    let stopping = Handler::custom(HandlerKind::MayStopPropagation, |_| {
        Some(Dispatch {
            message: Box::new(Msg::Child(1)),
            stop_propagation: true,
            prevent_default: false,
        })
    });
    let view = |inner: Handler| {
        VNode::element(
            "div",
            [Directive::on("click", Handler::always(Msg::Clicked))],
            [button(inner)],
        )
    };

    let mut updater = DomUpdater::new(
        MemoryDom::new(),
        view(Handler::always(Msg::Child(0))),
        sink,
    )
    .unwrap();
    let target = first_child(&updater);

    updater.dom().dispatch(target, "click", &());
    assert_eq!(*seen.borrow(), [Msg::Child(0), Msg::Clicked]);

    seen.borrow_mut().clear();
    updater.update(view(stopping)).unwrap();
    let outcome = updater.dom().dispatch(target, "click", &());

    assert_eq!(*seen.borrow(), [Msg::Child(1)]);
    assert_eq!(
        outcome,
        EventOutcome {
            stop_propagation: true,
            prevent_default: false
        }
    );
}

#[test]
fn handlers_of_the_same_kind_are_swapped_in_place() {
    let (sink, seen) = recording();
    let mut updater = DomUpdater::new(
        MemoryDom::new(),
        button(Handler::always(Msg::Child(1))),
        sink,
    )
    .unwrap();
    let root = *updater.root();
    let before = updater.dom().get(root).unwrap().listener("click").unwrap().clone();

    updater.update(button(Handler::always(Msg::Child(2)))).unwrap();
    let after = updater.dom().get(root).unwrap().listener("click").unwrap().clone();
    assert!(before.ptr_eq(&after));

    updater.dom().dispatch(root, "click", &());
    assert_eq!(*seen.borrow(), [Msg::Child(2)]);
}

#[test]
fn handlers_of_another_kind_are_reregistered() {
    let (sink, seen) = recording();
    let mut updater = DomUpdater::new(
        MemoryDom::new(),
        button(Handler::always(Msg::Clicked)),
        sink,
    )
    .unwrap();
    let root = *updater.root();
    let before = updater.dom().get(root).unwrap().listener("click").unwrap().clone();
    assert!(before.is_passive());

    let preventing = Handler::custom(HandlerKind::MayPreventDefault, |_| {
        Some(Dispatch {
            message: Box::new(Msg::Clicked),
            stop_propagation: false,
            prevent_default: true,
        })
    });
    updater.update(button(preventing)).unwrap();

    let after = updater.dom().get(root).unwrap().listener("click").unwrap().clone();
    assert!(!before.ptr_eq(&after));
    assert!(!after.is_passive());

    let outcome = updater.dom().dispatch(root, "click", &());
    assert!(outcome.prevent_default);
    assert_eq!(*seen.borrow(), [Msg::Clicked]);
}

#[test]
fn removed_handlers_stop_listening() {
    let (sink, seen) = recording();
    let mut updater = DomUpdater::new(
        MemoryDom::new(),
        button(Handler::always(Msg::Clicked)),
        sink,
    )
    .unwrap();
    let root = *updater.root();

    updater
        .update(VNode::element("button", [], [VNode::text("go")]))
        .unwrap();
    assert!(updater.dom().get(root).unwrap().listening_for().is_empty());

    updater.dom().dispatch(root, "click", &());
    assert!(seen.borrow().is_empty());
}

#[test]
fn mapped_subtrees_transform_their_messages() {
    let (sink, seen) = recording();
    let view = VNode::element(
        "div",
        [],
        [VNode::map(Mapper::typed(Msg::Child), button(Handler::always(7)))],
    );
    let updater = DomUpdater::new(MemoryDom::new(), view, sink).unwrap();

    updater.dom().dispatch(first_child(&updater), "click", &());
    assert_eq!(*seen.borrow(), [Msg::Child(7)]);
}

#[test]
fn nested_maps_apply_innermost_first() {
    let (sink, seen) = recording();
    let view = VNode::map(
        Mapper::typed(Msg::Child),
        VNode::map(Mapper::typed(|n: i32| n * 10), button(Handler::always(4))),
    );
    let updater = DomUpdater::new(MemoryDom::new(), view, sink).unwrap();

    updater.dom().dispatch(*updater.root(), "click", &());
    assert_eq!(*seen.borrow(), [Msg::Child(40)]);
}

#[test]
fn new_mappers_reach_existing_listeners() {
    let (sink, seen) = recording();
    let view = |mapper: Mapper| {
        VNode::element("div", [], [VNode::map(mapper, button(Handler::always(1)))])
    };

    let app = sink.clone();
    let mut updater = DomUpdater::new(
        MemoryDom::new(),
        view(Mapper::typed(Msg::Child)),
        sink,
    )
    .unwrap();
    let target = first_child(&updater);
    let listener = updater.dom().get(target).unwrap().listener("click").unwrap().clone();
    let link = updater.dom().event_root(&target).unwrap();
    assert_eq!(link.mappers().len(), 1);
    assert!(link.parent().unwrap().ptr_eq(&app));

    updater
        .update(view(Mapper::typed(|n: i32| Msg::Child(n + 100))))
        .unwrap();

    // the listener was kept, only the chain it dispatches through changed
    let current = updater.dom().get(target).unwrap().listener("click").unwrap().clone();
    assert!(listener.ptr_eq(&current));
    assert!(updater.dom().event_root(&target).unwrap().ptr_eq(&link));
    assert_eq!(link.mappers().len(), 1);

    updater.dom().dispatch(target, "click", &());
    assert_eq!(*seen.borrow(), [Msg::Child(101)]);
}

#[test]
fn shared_mappers_need_no_patch() {
    let mapper = Mapper::typed(Msg::Child);
    let view = |mapper: &Mapper| VNode::map(mapper.clone(), VNode::text("same"));

    let (old, new) = (view(&mapper), view(&mapper));
    assert!(trellis_core::diff(&old, &new).is_empty());
}

#[test]
fn redrawn_nodes_inside_a_map_keep_its_mapper() {
    let (sink, seen) = recording();
    let mapper = Mapper::typed(Msg::Child);
    let view = |inner: VNode| VNode::element("div", [], [VNode::map(mapper.clone(), inner)]);

    let mut updater = DomUpdater::new(
        MemoryDom::new(),
        view(VNode::text("loading")),
        sink,
    )
    .unwrap();
    updater.update(view(button(Handler::always(3)))).unwrap();

    let target = first_child(&updater);
    updater.dom().dispatch(target, "click", &());
    assert_eq!(*seen.borrow(), [Msg::Child(3)]);

    // a second update with a new mapper must find the chain on the redrawn node
    updater
        .update(VNode::element(
            "div",
            [],
            [VNode::map(
                Mapper::typed(|n: i32| Msg::Child(-n)),
                button(Handler::always(3)),
            )],
        ))
        .unwrap();
    updater.dom().dispatch(target, "click", &());
    assert_eq!(*seen.borrow(), [Msg::Child(3), Msg::Child(-3)]);
}

#[test]
fn listeners_added_by_patches_use_the_local_chain() {
    let (sink, seen) = recording();
    let mapper = Mapper::typed(Msg::Child);
    let view = |handler: Option<Handler>| {
        let directives: Vec<Directive> = handler
            .into_iter()
            .map(|h| Directive::on("click", h))
            .collect();
        VNode::map(
            mapper.clone(),
            VNode::element("div", [], [VNode::element("span", directives, [])]),
        )
    };

    let mut updater = DomUpdater::new(MemoryDom::new(), view(None), sink).unwrap();
    updater.update(view(Some(Handler::always(9)))).unwrap();

    updater.dom().dispatch(first_child(&updater), "click", &());
    assert_eq!(*seen.borrow(), [Msg::Child(9)]);
}

#[test]
fn keyed_inserts_dispatch_through_the_map() {
    let (sink, seen) = recording();
    let mapper = Mapper::typed(Msg::Child);
    let view = |items: &[i32]| {
        VNode::map(
            mapper.clone(),
            VNode::keyed(
                "ul",
                [],
                items.iter().map(|n| {
                    (
                        trellis_core::Str::from(n.to_string()),
                        VNode::element("li", [Directive::on("click", Handler::always(*n))], []),
                    )
                }),
            ),
        )
    };

    let mut updater = DomUpdater::new(MemoryDom::new(), view(&[1, 2]), sink).unwrap();
    updater.update(view(&[3, 1, 2, 4])).unwrap();

    let root = *updater.root();
    let children = updater.dom().children(root).to_vec();
    for child in children {
        updater.dom().dispatch(child, "click", &());
    }
    assert_eq!(
        *seen.borrow(),
        [Msg::Child(3), Msg::Child(1), Msg::Child(2), Msg::Child(4)]
    );
}
