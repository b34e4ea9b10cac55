//! Building display nodes from view nodes.

use crate::{
    diff::collapse,
    events::{EventRoot, Handler, Listener},
    nodes::VNode,
    patch::FactsDiff,
    Dom,
};

/// Build the display subtree for `vnode`.
///
/// Listeners created for the subtree dispatch through `events`, or through the event root of the innermost tagged
/// node around them. Thunks are forced on the way.
pub fn render<D: Dom>(dom: &mut D, vnode: &VNode, events: &EventRoot) -> Result<D::Node, D::Error> {
    match vnode {
        VNode::Text(text) => dom.create_text_node(&text.text),

        VNode::Thunk(thunk) => render(dom, thunk.force(), events),

        VNode::Tagged(tagged) => {
            let (mappers, inner) = collapse(tagged);
            let root = EventRoot::mapped(mappers.into_iter().cloned().collect(), events.clone());
            let node = render(dom, inner, &root)?;
            dom.set_event_root(&node, root)?;
            Ok(node)
        }

        VNode::Element(el) => {
            let node = dom.create_element(&el.tag, el.namespace.as_deref())?;
            apply_facts(dom, &node, &FactsDiff::full(&el.facts), events)?;
            for child in &el.children {
                let child = render(dom, child, events)?;
                dom.append_child(&node, &child)?;
            }
            Ok(node)
        }

        VNode::Keyed(el) => {
            let node = dom.create_element(&el.tag, el.namespace.as_deref())?;
            apply_facts(dom, &node, &FactsDiff::full(&el.facts), events)?;
            for (_, child) in &el.children {
                let child = render(dom, child, events)?;
                dom.append_child(&node, &child)?;
            }
            Ok(node)
        }

        VNode::Widget(widget) => {
            let rendered = (widget.render)(&*widget.model, dom);
            let node = match rendered.downcast::<Result<D::Node, D::Error>>() {
                Ok(result) => (*result)?,
                Err(_) => panic!("widget rendered a node for a different backend"),
            };
            apply_facts(dom, &node, &FactsDiff::full(&widget.facts), events)?;
            Ok(node)
        }
    }
}

/// Write changed facts to a display node.
pub(crate) fn apply_facts<D: Dom>(
    dom: &mut D,
    node: &D::Node,
    facts: &FactsDiff<'_>,
    events: &EventRoot,
) -> Result<(), D::Error> {
    for (name, value) in &facts.styles {
        dom.set_style(node, name, value)?;
    }

    for (name, value) in &facts.properties {
        // the user may have changed these since the last render
        if matches!(*name, "value" | "checked") && dom.property(node, name).as_ref() == *value {
            continue;
        }
        dom.set_property(node, name, *value)?;
    }

    for (name, value) in &facts.attributes {
        match value {
            Some(value) => dom.set_attribute(node, name, value)?,
            None => dom.remove_attribute(node, name)?,
        }
    }

    for (name, namespace, value) in &facts.attributes_ns {
        match value {
            Some(value) => dom.set_attribute_ns(node, namespace, name, value)?,
            None => dom.remove_attribute_ns(node, namespace, name)?,
        }
    }

    for (name, handler) in &facts.events {
        apply_event(dom, node, name, *handler, events)?;
    }

    Ok(())
}

fn apply_event<D: Dom>(
    dom: &mut D,
    node: &D::Node,
    name: &str,
    handler: Option<&Handler>,
    events: &EventRoot,
) -> Result<(), D::Error> {
    let existing = dom.event_listener(node, name);

    let Some(handler) = handler else {
        if existing.is_some() {
            dom.remove_event_listener(node, name)?;
        }
        return Ok(());
    };

    if let Some(existing) = existing {
        if existing.swap_handler(handler) {
            return Ok(());
        }
        dom.remove_event_listener(node, name)?;
    }

    tracing::trace!(event = name, passive = handler.kind().is_passive(), "adding listener");
    dom.add_event_listener(node, name, Listener::new(handler.clone(), events.clone()))
}
