//! Driving a display tree through many views with a `DomUpdater`.

use pretty_assertions::assert_eq;
use trellis_core::{prelude::*, Str};
use trellis_memory::MemoryDom;

struct Todo {
    id: u32,
    text: &'static str,
    done: bool,
}

fn view(todos: &[Todo], filter: &'static str) -> VNode {
    VNode::element(
        "section",
        [Directive::attribute("data-filter", filter)],
        [
            VNode::element("h1", [], [VNode::text("todos")]),
            VNode::keyed(
                "ul",
                [],
                todos.iter().map(|todo| {
                    let class = if todo.done { "done" } else { "open" };
                    (
                        Str::from(todo.id.to_string()),
                        VNode::element(
                            "li",
                            [
                                Directive::class(class),
                                Directive::property("checked", todo.done),
                            ],
                            [VNode::text(todo.text)],
                        ),
                    )
                }),
            ),
            VNode::text(format!("{} left", todos.iter().filter(|t| !t.done).count())),
        ],
    )
}

fn fresh_html(vnode: &VNode) -> String {
    let mut dom = MemoryDom::new();
    let root = trellis_core::render(&mut dom, vnode, &EventRoot::discard()).unwrap();
    dom.to_html(root)
}

#[test]
fn mounted_trees_follow_every_update() {
    let mut dom = MemoryDom::new();
    let body = dom.create_element("body", None).unwrap();

    let mut todos = vec![
        Todo { id: 1, text: "milk", done: false },
        Todo { id: 2, text: "eggs", done: false },
        Todo { id: 3, text: "bread", done: true },
    ];

    let mut updater = DomUpdater::new_append_to_mount(
        dom,
        view(&todos, "all"),
        EventRoot::discard(),
        &body,
    )
    .unwrap();
    assert_eq!(updater.dom().children(body), [*updater.root()]);

    let steps: Vec<Box<dyn Fn(&mut Vec<Todo>)>> = vec![
        Box::new(|todos: &mut Vec<Todo>| todos[0].done = true),
        Box::new(|todos: &mut Vec<Todo>| todos.swap(0, 2)),
        Box::new(|todos: &mut Vec<Todo>| {
            todos.push(Todo { id: 4, text: "tea", done: false })
        }),
        Box::new(|todos: &mut Vec<Todo>| {
            todos.remove(1);
        }),
        Box::new(|todos: &mut Vec<Todo>| todos.reverse()),
        Box::new(|todos: &mut Vec<Todo>| todos.clear()),
    ];

    for (i, step) in steps.iter().enumerate() {
        step(&mut todos);
        let filter = if i % 2 == 0 { "all" } else { "active" };
        let next = view(&todos, filter);
        let expected = fresh_html(&next);

        updater.update(next).unwrap();

        let root = *updater.root();
        assert_eq!(updater.dom().to_html(root), expected, "after step {i}");
        assert_eq!(updater.dom().children(body), [root]);
    }
}

#[test]
fn garbage_is_collected_between_updates() {
    let todos = |n: u32| {
        (0..n)
            .map(|id| Todo { id, text: "item", done: false })
            .collect::<Vec<_>>()
    };

    let mut updater = DomUpdater::new(
        MemoryDom::new(),
        view(&todos(10), "all"),
        EventRoot::discard(),
    )
    .unwrap();
    let allocated = updater.dom().size();

    updater.update(view(&todos(2), "all")).unwrap();
    let root = *updater.root();
    let freed = updater.dom_mut().collect_garbage(root);

    // eight items of two nodes each
    assert_eq!(freed, 16);
    assert_eq!(updater.dom().size(), allocated - 16);
}

#[test]
fn the_updater_gives_the_backend_back() {
    let updater = DomUpdater::new(
        MemoryDom::new(),
        VNode::text("hi"),
        EventRoot::discard(),
    )
    .unwrap();
    let root = *updater.root();
    assert_eq!(updater.current().as_text(), Some("hi"));

    let dom = updater.into_dom();
    assert_eq!(dom.text_content(root), "hi");
}
