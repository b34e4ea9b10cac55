use crate::NodeId;
use thiserror::Error;

/// Everything that can go wrong when mutating a [`MemoryDom`](crate::MemoryDom).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The node was never created, or was freed by garbage collection
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),

    /// The operation expects a parent/child relationship that is not there
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The expected parent
        parent: NodeId,
        /// The expected child
        child: NodeId,
    },

    /// The operation only makes sense on elements
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    /// The operation only makes sense on text nodes
    #[error("node {0:?} is not a text node")]
    NotText(NodeId),

    /// Text nodes cannot have children
    #[error("node {0:?} cannot have children")]
    NotAContainer(NodeId),

    /// A node cannot be inserted below itself
    #[error("inserting {child:?} into {parent:?} would create a cycle")]
    Cycle {
        /// The node receiving the child
        parent: NodeId,
        /// The node being inserted
        child: NodeId,
    },
}
