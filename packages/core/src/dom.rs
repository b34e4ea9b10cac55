use crate::{
    events::{EventRoot, Listener},
    facts::Value,
};
use std::{any::Any, fmt::Debug};

/// A mutable display tree that view trees are rendered into.
///
/// Node handles are cheap to clone and compare equal when they refer to the same display node. Creating and
/// mutating nodes may fail with the backend's own error type; navigating the tree never does.
///
/// Inserting a fragment moves its children into the parent and leaves the fragment empty.
pub trait Dom: Any {
    /// A handle to a display node
    type Node: Clone + PartialEq + Debug + 'static;
    /// What goes wrong inside the backend
    type Error: Debug + 'static;

    /// Create an element with the given tag name, and optional namespace
    fn create_element(
        &mut self,
        tag: &str,
        namespace: Option<&str>,
    ) -> Result<Self::Node, Self::Error>;
    /// Create a text node
    fn create_text_node(&mut self, text: &str) -> Result<Self::Node, Self::Error>;
    /// Create an empty fragment to batch insertions
    fn create_fragment(&mut self) -> Result<Self::Node, Self::Error>;
    /// Replace the content of a text node
    fn set_text(&mut self, node: &Self::Node, text: &str) -> Result<(), Self::Error>;

    /// Set an attribute on an element
    fn set_attribute(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: &str,
    ) -> Result<(), Self::Error>;
    /// Remove an attribute from an element
    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<(), Self::Error>;
    /// Set a namespaced attribute on an element
    fn set_attribute_ns(
        &mut self,
        node: &Self::Node,
        namespace: &str,
        name: &str,
        value: &str,
    ) -> Result<(), Self::Error>;
    /// Remove a namespaced attribute from an element
    fn remove_attribute_ns(
        &mut self,
        node: &Self::Node,
        namespace: &str,
        name: &str,
    ) -> Result<(), Self::Error>;
    /// Set a style property, the empty string clears it
    fn set_style(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<(), Self::Error>;

    /// Read the live value of a property
    fn property(&self, node: &Self::Node, name: &str) -> Option<Value>;
    /// Set a property, `None` clears it
    fn set_property(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: Option<&Value>,
    ) -> Result<(), Self::Error>;

    /// The listener installed for an event, if any
    fn event_listener(&self, node: &Self::Node, event: &str) -> Option<Listener>;
    /// Install a listener, replacing any listener for the same event
    fn add_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        listener: Listener,
    ) -> Result<(), Self::Error>;
    /// Uninstall the listener for an event
    fn remove_event_listener(&mut self, node: &Self::Node, event: &str) -> Result<(), Self::Error>;

    /// The event root attached to a node by a tagged subtree
    fn event_root(&self, node: &Self::Node) -> Option<EventRoot>;
    /// Attach an event root to a node
    fn set_event_root(&mut self, node: &Self::Node, root: EventRoot) -> Result<(), Self::Error>;

    /// The child at the given position
    fn child(&self, parent: &Self::Node, index: usize) -> Option<Self::Node>;
    /// The parent of a node, `None` for detached nodes
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    /// Add a child after every existing child
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;
    /// Insert a child in front of `reference`, or at the end when there is no reference
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        reference: Option<&Self::Node>,
    ) -> Result<(), Self::Error>;
    /// Detach a child from its parent
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;
    /// Put `new` where `old` is and detach `old`
    fn replace_child(
        &mut self,
        parent: &Self::Node,
        new: &Self::Node,
        old: &Self::Node,
    ) -> Result<(), Self::Error>;
}
