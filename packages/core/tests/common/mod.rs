//! Display trees shared by the integration tests.
#![allow(dead_code)]

use std::cell::Cell;
use trellis_core::{prelude::*, Listener};
use trellis_memory::{DomError, MemoryDom, NodeId};

/// A memory display tree that counts how often a child is looked up by position.
#[derive(Default)]
pub struct CountingDom {
    pub inner: MemoryDom,
    pub lookups: Cell<usize>,
}

impl Dom for CountingDom {
    type Node = NodeId;
    type Error = DomError;

    fn create_element(&mut self, tag: &str, namespace: Option<&str>) -> Result<NodeId, DomError> {
        self.inner.create_element(tag, namespace)
    }
    fn create_text_node(&mut self, text: &str) -> Result<NodeId, DomError> {
        self.inner.create_text_node(text)
    }
    fn create_fragment(&mut self) -> Result<NodeId, DomError> {
        self.inner.create_fragment()
    }
    fn set_text(&mut self, node: &NodeId, text: &str) -> Result<(), DomError> {
        self.inner.set_text(node, text)
    }
    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.inner.set_attribute(node, name, value)
    }
    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<(), DomError> {
        self.inner.remove_attribute(node, name)
    }
    fn set_attribute_ns(
        &mut self,
        node: &NodeId,
        namespace: &str,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.inner.set_attribute_ns(node, namespace, name, value)
    }
    fn remove_attribute_ns(
        &mut self,
        node: &NodeId,
        namespace: &str,
        name: &str,
    ) -> Result<(), DomError> {
        self.inner.remove_attribute_ns(node, namespace, name)
    }
    fn set_style(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.inner.set_style(node, name, value)
    }
    fn property(&self, node: &NodeId, name: &str) -> Option<Value> {
        self.inner.property(node, name)
    }
    fn set_property(
        &mut self,
        node: &NodeId,
        name: &str,
        value: Option<&Value>,
    ) -> Result<(), DomError> {
        self.inner.set_property(node, name, value)
    }
    fn event_listener(&self, node: &NodeId, event: &str) -> Option<Listener> {
        self.inner.event_listener(node, event)
    }
    fn add_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        listener: Listener,
    ) -> Result<(), DomError> {
        self.inner.add_event_listener(node, event, listener)
    }
    fn remove_event_listener(&mut self, node: &NodeId, event: &str) -> Result<(), DomError> {
        self.inner.remove_event_listener(node, event)
    }
    fn event_root(&self, node: &NodeId) -> Option<EventRoot> {
        self.inner.event_root(node)
    }
    fn set_event_root(&mut self, node: &NodeId, root: EventRoot) -> Result<(), DomError> {
        self.inner.set_event_root(node, root)
    }
    fn child(&self, parent: &NodeId, index: usize) -> Option<NodeId> {
        self.lookups.set(self.lookups.get() + 1);
        self.inner.child(parent, index)
    }
    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.inner.parent(node)
    }
    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        self.inner.append_child(parent, child)
    }
    fn insert_before(
        &mut self,
        parent: &NodeId,
        child: &NodeId,
        reference: Option<&NodeId>,
    ) -> Result<(), DomError> {
        self.inner.insert_before(parent, child, reference)
    }
    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        self.inner.remove_child(parent, child)
    }
    fn replace_child(
        &mut self,
        parent: &NodeId,
        new: &NodeId,
        old: &NodeId,
    ) -> Result<(), DomError> {
        self.inner.replace_child(parent, new, old)
    }
}
