//! Trellis keeps a display tree in sync with a stream of immutable view trees.
//!
//! Views are plain [`VNode`](prelude::VNode) values. Rendering the first one builds the display tree; every later
//! view is diffed against the previous one and only the difference is applied.
//!
//! The display tree is provided by a backend:
//! - `memory` (default): an in-memory tree, for tests and HTML generation
//! - `web`: the browser DOM, through `web-sys`

pub use trellis_core as core;

#[cfg(feature = "memory")]
pub use trellis_memory as memory;

#[cfg(feature = "web")]
pub use trellis_web as web;

pub mod prelude {
    pub use trellis_core::prelude::*;
    pub use trellis_core::{apply, diff, render, Str};

    #[cfg(feature = "memory")]
    pub use trellis_memory::{MemoryDom, NodeId};

    #[cfg(feature = "web")]
    pub use trellis_web::{launch, Config, WebDom};
}
