#![warn(missing_docs)]
//! An in-memory display tree for trellis.
//!
//! [`MemoryDom`] implements [`trellis_core::Dom`] on top of a slab of nodes. It can serialize any subtree to HTML,
//! fire events at nodes the way a browser would (bubbling from the target up to the root), and free nodes that
//! were detached by patching.

mod dom;
mod error;
mod html;
mod node;

pub use dom::MemoryDom;
pub use error::DomError;
pub use node::{ElementData, MemoryNode, NodeId, NodeKind};
