#![warn(missing_docs)]
//! Trellis WebSys
//!
//! ## Overview
//! ------------
//! This crate implements the trellis display backend for the web browser using web-sys. View trees are rendered into
//! real DOM nodes, and every update is diffed and patched in place.
//!
//! The implementation is fairly thin: the heavy lifting happens inside trellis-core. This crate only maps the
//! [`Dom`](trellis_core::Dom) operations onto DOM calls and wires trellis listeners to native event listeners.
//!
//! ## Events
//! ------------
//! Every listener is registered directly on its node. The native event is handed to the trellis handler as the
//! payload, so handlers downcast it to `web_sys::Event` (or a more specific event type with `JsCast`).
//! Listeners whose handlers can never call `preventDefault` are registered as passive unless
//! [`Config::passive_listeners`] turns that off.

mod cfg;
mod dom;
mod error;
mod launch;

pub use crate::cfg::Config;
pub use crate::dom::WebDom;
pub use crate::error::WebError;
pub use crate::launch::launch;
