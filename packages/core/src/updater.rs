//! Keep a display tree up to date with the latest view tree.

use crate::{apply::apply, diff::diff, events::EventRoot, nodes::VNode, render::render, Dom};

/// Owns a display backend, the last view tree rendered into it, and the display node that tree lives at.
///
/// If an update fails half way, the display tree is left partially patched and should be rebuilt with a new
/// `DomUpdater`.
pub struct DomUpdater<D: Dom> {
    dom: D,
    current: VNode,
    root: D::Node,
    events: EventRoot,
}

impl<D: Dom> DomUpdater<D> {
    /// Create a new `DomUpdater`.
    ///
    /// The view tree is rendered, but the resulting root is not attached anywhere. Listeners dispatch their messages
    /// through `events`.
    pub fn new(mut dom: D, vnode: VNode, events: EventRoot) -> Result<Self, D::Error> {
        let root = render(&mut dom, &vnode, &events)?;
        Ok(Self {
            dom,
            current: vnode,
            root,
            events,
        })
    }

    /// Create a new `DomUpdater` whose root is appended (as a child) to `mount`.
    pub fn new_append_to_mount(
        mut dom: D,
        vnode: VNode,
        events: EventRoot,
        mount: &D::Node,
    ) -> Result<Self, D::Error> {
        let root = render(&mut dom, &vnode, &events)?;
        dom.append_child(mount, &root)?;
        Ok(Self {
            dom,
            current: vnode,
            root,
            events,
        })
    }

    /// Diff the current view tree against `new` and patch the display tree to match.
    pub fn update(&mut self, new: VNode) -> Result<(), D::Error> {
        let patches = diff(&self.current, &new);
        self.root = apply(&mut self.dom, &self.root, &self.current, patches, &self.events)?;
        self.current = new;
        Ok(())
    }

    /// The display node at the root of the tree.
    pub fn root(&self) -> &D::Node {
        &self.root
    }

    /// The view tree the display tree currently reflects.
    pub fn current(&self) -> &VNode {
        &self.current
    }

    /// The display backend.
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// The display backend, mutably.
    ///
    /// Changes made behind the updater's back to nodes it manages will confuse the next update.
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// Give the display backend back.
    pub fn into_dom(self) -> D {
        self.dom
    }
}
