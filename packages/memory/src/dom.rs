use crate::{DomError, ElementData, MemoryNode, NodeId, NodeKind};
use slab::Slab;
use std::any::Any;
use trellis_core::{Dom, EventOutcome, EventRoot, Listener, Value};

/// A display tree that lives entirely in memory.
///
/// Nodes stay allocated after they are detached, since the patch engine may put them back (keyed moves detach a
/// node before reinserting it). Call [`MemoryDom::collect_garbage`] between updates to free whatever is no longer
/// reachable from the root.
#[derive(Debug, Default)]
pub struct MemoryDom {
    nodes: Slab<MemoryNode>,
}

impl MemoryDom {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(id.0)
    }

    /// The number of allocated nodes, attached or not
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no nodes at all
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The children of a node, empty for unknown nodes
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(MemoryNode::children).unwrap_or_default()
    }

    /// The concatenated text of a node and everything below it
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            if let NodeKind::Text(t) = &node.kind {
                text.push_str(t);
            }
            stack.extend(node.children.iter().rev());
        }
        text
    }

    /// Fire an event at a node and let it bubble up through its ancestors.
    ///
    /// Every listener for `event` on the way is handed `payload`, until one of them stops propagation. Returns what
    /// the listeners asked for, combined.
    pub fn dispatch(&self, target: NodeId, event: &str, payload: &dyn Any) -> EventOutcome {
        // collect first so listeners never run while the tree is borrowed
        let mut listeners = Vec::new();
        let mut current = Some(target);
        while let Some(id) = current {
            let Some(node) = self.get(id) else { break };
            if let Some(listener) = node.listeners.get(event) {
                listeners.push(listener.clone());
            }
            current = node.parent;
        }

        let mut outcome = EventOutcome::default();
        for listener in listeners {
            let handled = listener.handle(payload);
            outcome.prevent_default |= handled.prevent_default;
            if handled.stop_propagation {
                outcome.stop_propagation = true;
                break;
            }
        }
        outcome
    }

    /// Free every node that cannot be reached from `root`, returning how many were freed.
    pub fn collect_garbage(&mut self, root: NodeId) -> usize {
        let mut reachable = vec![false; self.nodes.capacity()];
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else { continue };
            reachable[id.0] = true;
            stack.extend(node.children.iter().copied());
        }

        let before = self.nodes.len();
        self.nodes.retain(|key, _| reachable.get(key).copied().unwrap_or(false));
        let freed = before - self.nodes.len();
        tracing::debug!(freed, "collected detached nodes");
        freed
    }

    fn insert(&mut self, kind: NodeKind) -> NodeId {
        NodeId(self.nodes.insert(MemoryNode::new(kind)))
    }

    fn node(&self, id: NodeId) -> Result<&MemoryNode, DomError> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut MemoryNode, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(el) => Ok(el),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    /// Check if `node` is `ancestor` or lives below it.
    fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    fn detach(&mut self, child: NodeId) -> Result<(), DomError> {
        if let Some(parent) = self.node_mut(child)?.parent.take() {
            self.node_mut(parent)?.children.retain(|c| *c != child);
        }
        Ok(())
    }

    fn position(&self, parent: NodeId, child: NodeId) -> Result<usize, DomError> {
        self.node(parent)?
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(DomError::NotAChild { parent, child })
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;
    type Error = DomError;

    fn create_element(&mut self, tag: &str, namespace: Option<&str>) -> Result<NodeId, DomError> {
        Ok(self.insert(NodeKind::Element(ElementData::new(
            tag,
            namespace.map(str::to_string),
        ))))
    }

    fn create_text_node(&mut self, text: &str) -> Result<NodeId, DomError> {
        Ok(self.insert(NodeKind::Text(text.to_string())))
    }

    fn create_fragment(&mut self) -> Result<NodeId, DomError> {
        Ok(self.insert(NodeKind::Fragment))
    }

    fn set_text(&mut self, node: &NodeId, text: &str) -> Result<(), DomError> {
        match &mut self.node_mut(*node)?.kind {
            NodeKind::Text(t) => {
                text.clone_into(t);
                Ok(())
            }
            _ => Err(DomError::NotText(*node)),
        }
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.element_mut(*node)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<(), DomError> {
        self.element_mut(*node)?.attributes.remove(name);
        Ok(())
    }

    fn set_attribute_ns(
        &mut self,
        node: &NodeId,
        namespace: &str,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.element_mut(*node)?
            .attributes_ns
            .insert(name.to_string(), (namespace.to_string(), value.to_string()));
        Ok(())
    }

    fn remove_attribute_ns(
        &mut self,
        node: &NodeId,
        namespace: &str,
        name: &str,
    ) -> Result<(), DomError> {
        let el = self.element_mut(*node)?;
        if el.attributes_ns.get(name).is_some_and(|(ns, _)| ns == namespace) {
            el.attributes_ns.remove(name);
        }
        Ok(())
    }

    fn set_style(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(*node)?;
        if value.is_empty() {
            el.styles.remove(name);
        } else {
            el.styles.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    fn property(&self, node: &NodeId, name: &str) -> Option<Value> {
        self.get(*node)?.element()?.properties.get(name).cloned()
    }

    fn set_property(
        &mut self,
        node: &NodeId,
        name: &str,
        value: Option<&Value>,
    ) -> Result<(), DomError> {
        let el = self.element_mut(*node)?;
        match value {
            Some(value) => {
                el.properties.insert(name.to_string(), value.clone());
            }
            None => {
                el.properties.remove(name);
            }
        }
        Ok(())
    }

    fn event_listener(&self, node: &NodeId, event: &str) -> Option<Listener> {
        self.get(*node)?.listeners.get(event).cloned()
    }

    fn add_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        listener: Listener,
    ) -> Result<(), DomError> {
        self.node_mut(*node)?
            .listeners
            .insert(event.to_string(), listener);
        Ok(())
    }

    fn remove_event_listener(&mut self, node: &NodeId, event: &str) -> Result<(), DomError> {
        self.node_mut(*node)?.listeners.remove(event);
        Ok(())
    }

    fn event_root(&self, node: &NodeId) -> Option<EventRoot> {
        self.get(*node)?.event_root.clone()
    }

    fn set_event_root(&mut self, node: &NodeId, root: EventRoot) -> Result<(), DomError> {
        self.node_mut(*node)?.event_root = Some(root);
        Ok(())
    }

    fn child(&self, parent: &NodeId, index: usize) -> Option<NodeId> {
        self.get(*parent)?.children.get(index).copied()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.get(*node)?.parent
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    fn insert_before(
        &mut self,
        parent: &NodeId,
        child: &NodeId,
        reference: Option<&NodeId>,
    ) -> Result<(), DomError> {
        let (parent, child) = (*parent, *child);

        if matches!(self.node(parent)?.kind, NodeKind::Text(_)) {
            return Err(DomError::NotAContainer(parent));
        }
        if self.is_within(parent, child) {
            return Err(DomError::Cycle { parent, child });
        }
        if let Some(reference) = reference {
            self.position(parent, *reference)?;
        }

        // inserting a fragment moves its children instead
        let moving = if matches!(self.node(child)?.kind, NodeKind::Fragment) {
            std::mem::take(&mut self.node_mut(child)?.children)
        } else {
            self.detach(child)?;
            vec![child]
        };

        let mut at = match reference {
            Some(reference) => self.position(parent, *reference)?,
            None => self.node(parent)?.children.len(),
        };
        for id in moving {
            self.node_mut(id)?.parent = Some(parent);
            self.node_mut(parent)?.children.insert(at, id);
            at += 1;
        }
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let at = self.position(*parent, *child)?;
        self.node_mut(*parent)?.children.remove(at);
        self.node_mut(*child)?.parent = None;
        Ok(())
    }

    fn replace_child(
        &mut self,
        parent: &NodeId,
        new: &NodeId,
        old: &NodeId,
    ) -> Result<(), DomError> {
        if new == old {
            return Ok(());
        }
        self.position(*parent, *old)?;
        self.insert_before(parent, new, Some(old))?;
        self.remove_child(parent, old)
    }
}
