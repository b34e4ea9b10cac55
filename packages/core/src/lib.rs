//! Trellis core: structural diffing of immutable view trees, and patching of a mutable display tree to match.
//!
//! A view is described as a [`VNode`] tree. Rendering it once with [`render`] builds a display tree through any
//! backend implementing [`Dom`]. After each state change, [`diff`] compares the previous view with the new one and
//! [`apply`] brings the display tree up to date, touching only what changed. [`DomUpdater`] ties the three together.
//!
//! ```rust, ignore
//! let mut updater = DomUpdater::new(dom, view(&model), EventRoot::sink(|msg| queue.push(msg)))?;
//! model.count += 1;
//! updater.update(view(&model))?;
//! ```
#![warn(missing_docs)]

mod apply;
mod diff;
mod dom;
mod events;
mod facts;
mod nodes;
mod patch;
mod render;
mod sanitize;
mod updater;

pub(crate) mod innerlude {
    pub use crate::apply::*;
    pub use crate::diff::*;
    pub use crate::dom::*;
    pub use crate::events::*;
    pub use crate::facts::*;
    pub use crate::nodes::*;
    pub use crate::patch::*;
    pub use crate::render::*;
    pub use crate::updater::*;
}

pub use crate::innerlude::{
    apply, diff, organize_facts, render, Directive, Dispatch, Dom, DomUpdater, Entry, EventOutcome,
    EventRoot, Facts, FactsDiff, Handler, HandlerKind, Insert, Listener, Mapper, Message, Move,
    Patch, PatchKind, Reorder, Str,
    VElement, VKeyed, VNode, VTagged, VText, VThunk, VWidget, Value, WidgetPatch,
};

/// The purpose of this module is to alleviate imports of many common types
///
/// This includes types like [`VNode`], [`Directive`], [`Handler`] and [`Mapper`].
pub mod prelude {
    pub use crate::innerlude::{
        Directive, Dom, DomUpdater, EventRoot, Handler, HandlerKind, Mapper, VNode, Value,
        WidgetPatch,
    };
}
