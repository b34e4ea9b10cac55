//! Items related to nodes in the [`MemoryDom`](crate::MemoryDom)

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use trellis_core::{EventRoot, Listener, Value};

/// A handle to a node of a [`MemoryDom`](crate::MemoryDom)
#[derive(Hash, PartialEq, Eq, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// An element node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementData {
    /// The tag of the element
    pub tag: String,
    /// The namespace of the element
    pub namespace: Option<String>,
    /// The attributes of the element
    pub attributes: BTreeMap<String, String>,
    /// The namespaced attributes of the element, as `name -> (namespace, value)`
    pub attributes_ns: BTreeMap<String, (String, String)>,
    /// The inline styles of the element
    pub styles: BTreeMap<String, String>,
    /// The properties of the element
    pub properties: BTreeMap<String, Value>,
}

impl ElementData {
    /// Create a new element node
    pub fn new(tag: impl Into<String>, namespace: impl Into<Option<String>>) -> Self {
        Self {
            tag: tag.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }
}

/// A type of node with data specific to the node type.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An element node
    Element(ElementData),
    /// A text node
    Text(String),
    /// A fragment: a temporary container whose children move into whatever it is inserted into
    Fragment,
}

/// A node of the in-memory display tree
#[derive(Debug, Clone)]
pub struct MemoryNode {
    /// What kind of node this is
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) listeners: FxHashMap<String, Listener>,
    pub(crate) event_root: Option<EventRoot>,
}

impl MemoryNode {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            listeners: FxHashMap::default(),
            event_root: None,
        }
    }

    /// The parent of this node, if it is attached
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The children of this node, in order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The element data, if this node is an element
    pub fn element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// The text, if this node is a text node
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The names of the events this node listens for, sorted
    pub fn listening_for(&self) -> Vec<&str> {
        let mut events: Vec<&str> = self.listeners.keys().map(String::as_str).collect();
        events.sort_unstable();
        events
    }

    /// The listener for an event
    pub fn listener(&self, event: &str) -> Option<&Listener> {
        self.listeners.get(event)
    }
}
