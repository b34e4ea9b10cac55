//! Mutating the display tree.
//!
//! Application runs in two passes. The first pairs every patch with its display node while the display tree still
//! matches the old view tree. The second runs the patches in order. Splitting the work this way means no patch can
//! observe the effects of another while its target is being looked up.

mod resolve;

use crate::{
    events::EventRoot,
    nodes::VNode,
    patch::{Entry, Patch},
    render::{apply_facts, render},
    Dom,
};
use resolve::{ResolvedKind, ResolvedPatch, ResolvedReorder};

/// Apply the patches produced by diffing `old` against a new tree.
///
/// `root` must be the display node rendered from `old`, and `events` the event root it was rendered with. Returns the
/// display root of the new tree, which differs from `root` when the root itself was redrawn.
///
/// # Panics
///
/// When the patches were not produced against `old`, or the display tree no longer has the shape of `old`.
pub fn apply<D: Dom>(
    dom: &mut D,
    root: &D::Node,
    old: &VNode,
    patches: Vec<Patch<'_>>,
    events: &EventRoot,
) -> Result<D::Node, D::Error> {
    if patches.is_empty() {
        return Ok(root.clone());
    }

    let count = patches.len();
    let resolved = resolve::resolve(dom, root, old, patches, events);
    tracing::debug!(patches = count, "applying patches");

    apply_resolved(dom, root.clone(), resolved)
}

/// Run resolved patches in order, keeping track of `root` if a patch replaces it.
fn apply_resolved<D: Dom>(
    dom: &mut D,
    mut root: D::Node,
    patches: Vec<ResolvedPatch<'_, D::Node>>,
) -> Result<D::Node, D::Error> {
    for patch in patches {
        let target = patch.node.clone();
        let replacement = apply_patch(dom, patch)?;
        if target == root {
            root = replacement;
        }
    }
    Ok(root)
}

/// Run one patch, returning the node that now stands where the target was.
fn apply_patch<D: Dom>(
    dom: &mut D,
    patch: ResolvedPatch<'_, D::Node>,
) -> Result<D::Node, D::Error> {
    let ResolvedPatch {
        index,
        node,
        events,
        kind,
    } = patch;

    tracing::trace!(index, "applying patch");

    match kind {
        ResolvedKind::Redraw(vnode) => redraw(dom, &node, vnode, &events),

        ResolvedKind::Facts(facts) => {
            apply_facts(dom, &node, &facts, &events)?;
            Ok(node)
        }

        ResolvedKind::ReplaceText(text) => {
            dom.set_text(&node, text)?;
            Ok(node)
        }

        ResolvedKind::Thunk(patches) => apply_resolved(dom, node, patches),

        ResolvedKind::ReplaceMapperChain(mappers) => {
            match dom.event_root(&node) {
                Some(root) => root.replace_mappers(mappers),
                None => tracing::warn!(
                    index,
                    "cannot replace mappers of a node without an event root"
                ),
            }
            Ok(node)
        }

        ResolvedKind::AppendChildren { keep, children } => {
            let fragment = dom.create_fragment()?;
            for child in children {
                let child = render(dom, child, &events)?;
                dom.append_child(&fragment, &child)?;
            }
            let reference = dom.child(&node, keep);
            dom.insert_before(&node, &fragment, reference.as_ref())?;
            Ok(node)
        }

        ResolvedKind::RemoveChildren { keep, count } => {
            for _ in 0..count {
                let Some(child) = dom.child(&node, keep) else {
                    panic!(
                        "cannot remove child {keep} of the node at index {index}: it has no such child"
                    );
                };
                dom.remove_child(&node, &child)?;
            }
            Ok(node)
        }

        ResolvedKind::Remove(_) => {
            panic!("keyed removal at index {index} found outside of a reorder")
        }

        ResolvedKind::Reorder(reorder) => {
            apply_reorder(dom, &node, reorder, &events)?;
            Ok(node)
        }

        ResolvedKind::InvokeWidgetPatch(patch) => {
            let replacement = patch.apply(dom, &node)?;
            if replacement != node {
                if let Some(parent) = dom.parent(&node) {
                    dom.replace_child(&parent, &replacement, &node)?;
                }
            }
            Ok(replacement)
        }
    }
}

fn redraw<D: Dom>(
    dom: &mut D,
    node: &D::Node,
    vnode: &VNode,
    events: &EventRoot,
) -> Result<D::Node, D::Error> {
    let replacement = render(dom, vnode, events)?;

    // a redrawn child of a tagged node keeps answering for the tagged node
    if dom.event_root(&replacement).is_none() {
        if let Some(root) = dom.event_root(node) {
            dom.set_event_root(&replacement, root)?;
        }
    }

    if let Some(parent) = dom.parent(node) {
        dom.replace_child(&parent, &replacement, node)?;
    }
    Ok(replacement)
}

fn apply_reorder<D: Dom>(
    dom: &mut D,
    parent: &D::Node,
    reorder: ResolvedReorder<'_, D::Node>,
    events: &EventRoot,
) -> Result<(), D::Error> {
    let ResolvedReorder {
        patches,
        inserts,
        end_inserts,
        entries,
    } = reorder;

    let mut moved: Vec<Option<D::Node>> = vec![None; entries.len()];

    for patch in patches {
        match patch.kind {
            ResolvedKind::Remove(None) => dom.remove_child(parent, &patch.node)?,
            ResolvedKind::Remove(Some(mv)) => {
                let node = apply_resolved(dom, patch.node, mv.patches)?;
                dom.remove_child(parent, &node)?;
                moved[mv.entry] = Some(node);
            }
            _ => {
                apply_patch(dom, patch)?;
            }
        }
    }

    for insert in inserts {
        let child = take_entry(dom, &entries, &mut moved, insert.entry, events)?;
        let reference = dom.child(parent, insert.position);
        dom.insert_before(parent, &child, reference.as_ref())?;
    }

    if !end_inserts.is_empty() {
        let fragment = dom.create_fragment()?;
        for entry in end_inserts {
            let child = take_entry(dom, &entries, &mut moved, entry, events)?;
            dom.append_child(&fragment, &child)?;
        }
        dom.append_child(parent, &fragment)?;
    }

    Ok(())
}

fn take_entry<D: Dom>(
    dom: &mut D,
    entries: &[Entry<'_>],
    moved: &mut [Option<D::Node>],
    entry: usize,
    events: &EventRoot,
) -> Result<D::Node, D::Error> {
    match &entries[entry] {
        Entry::Insert(vnode) => render(dom, vnode, events),
        Entry::Move => match moved[entry].take() {
            Some(node) => Ok(node),
            None => panic!("moved entry {entry} was inserted before it was detached"),
        },
    }
}
