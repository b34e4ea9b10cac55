//! This module contains the `launch` function, which is the main entry point for trellis web

use crate::{Config, WebDom, WebError};
use trellis_core::{DomUpdater, EventRoot, VNode};
use web_sys::Node;

/// Render `vnode` into the element named by the config and return the updater that keeps it current.
///
/// Every message produced by a listener is handed to `events`. The application is expected to compute its next view
/// in response and pass it to [`DomUpdater::update`].
///
/// # Example
///
/// ```rust, ignore
/// let updater = trellis_web::launch(Config::new().rootname("app"), view(&model), EventRoot::sink(on_message))?;
/// ```
pub fn launch(
    config: Config,
    vnode: VNode,
    events: EventRoot,
) -> Result<DomUpdater<WebDom>, WebError> {
    let dom = WebDom::new(&config)?;
    let mount = dom
        .document()
        .get_element_by_id(&config.rootname)
        .map(Node::from)
        .ok_or_else(|| WebError::MissingRoot(config.rootname.clone()))?;

    tracing::info!(root = %config.rootname, "mounting application");
    DomUpdater::new_append_to_mount(dom, vnode, events, &mount)
}
