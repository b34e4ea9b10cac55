//! Finding the display node each patch applies to.
//!
//! The old tree is walked in pre-order next to the display tree. Each step knows the index range `[low, high]`
//! covered by the current subtree; a subtree whose range holds no pending patch is skipped without touching its
//! display nodes. Nothing is mutated here, so every node is found before the first patch changes the tree.

use crate::{
    diff::collapse,
    events::{EventRoot, Mapper},
    nodes::VNode,
    patch::{Entry, FactsDiff, Insert, Patch, PatchKind, WidgetPatch},
    Dom,
};
use std::{iter::Peekable, vec::IntoIter};

/// A patch together with the display node it applies to.
#[derive(Debug)]
pub(crate) struct ResolvedPatch<'a, N> {
    pub index: usize,
    pub node: N,
    /// The event root in effect at the node, used for anything rendered there
    pub events: EventRoot,
    pub kind: ResolvedKind<'a, N>,
}

#[derive(Debug)]
pub(crate) enum ResolvedKind<'a, N> {
    Redraw(&'a VNode),
    Facts(FactsDiff<'a>),
    ReplaceText(&'a str),
    Thunk(Vec<ResolvedPatch<'a, N>>),
    ReplaceMapperChain(Vec<Mapper>),
    AppendChildren { keep: usize, children: Vec<&'a VNode> },
    RemoveChildren { keep: usize, count: usize },
    Remove(Option<ResolvedMove<'a, N>>),
    Reorder(ResolvedReorder<'a, N>),
    InvokeWidgetPatch(WidgetPatch),
}

#[derive(Debug)]
pub(crate) struct ResolvedMove<'a, N> {
    pub entry: usize,
    pub patches: Vec<ResolvedPatch<'a, N>>,
}

#[derive(Debug)]
pub(crate) struct ResolvedReorder<'a, N> {
    pub patches: Vec<ResolvedPatch<'a, N>>,
    pub inserts: Vec<Insert>,
    pub end_inserts: Vec<usize>,
    pub entries: Vec<Entry<'a>>,
}

type Pending<'a> = Peekable<IntoIter<Patch<'a>>>;

/// Pair every patch with its display node.
///
/// Panics when a patch addresses an index the old tree does not have, or when the display tree is missing a node
/// the old tree says should be there: both mean the patches were not produced against this tree.
pub(crate) fn resolve<'a, D: Dom>(
    dom: &D,
    root: &D::Node,
    old: &VNode,
    patches: Vec<Patch<'a>>,
    events: &EventRoot,
) -> Vec<ResolvedPatch<'a, D::Node>> {
    Resolver { dom }.resolve_all(root, old, patches, 0, old.descendants(), events)
}

struct Resolver<'d, D: Dom> {
    dom: &'d D,
}

impl<D: Dom> Resolver<'_, D> {
    fn resolve_all<'a>(
        &self,
        node: &D::Node,
        vnode: &VNode,
        patches: Vec<Patch<'a>>,
        low: usize,
        high: usize,
        events: &EventRoot,
    ) -> Vec<ResolvedPatch<'a, D::Node>> {
        let mut out = Vec::with_capacity(patches.len());
        let mut pending = patches.into_iter().peekable();

        self.walk(node, vnode, &mut pending, low, high, events, &mut out);

        if let Some(patch) = pending.next() {
            if vnode.is_leaf() {
                panic!(
                    "patch at index {} addresses a child of the leaf at index {low}",
                    patch.index
                );
            }
            panic!(
                "patch at index {} is outside of the old tree ({low}..={high}): {:?}",
                patch.index, patch.kind
            );
        }
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn walk<'a>(
        &self,
        node: &D::Node,
        vnode: &VNode,
        pending: &mut Pending<'a>,
        low: usize,
        high: usize,
        events: &EventRoot,
        out: &mut Vec<ResolvedPatch<'a, D::Node>>,
    ) {
        while let Some(patch) = pending.next_if(|p| p.index == low) {
            out.push(self.resolve_one(node, vnode, patch, low, high, events));
        }

        let Some(next) = pending.peek().map(|p| p.index) else {
            return;
        };
        if next > high {
            return;
        }

        match vnode {
            VNode::Tagged(tagged) => {
                let (_, inner) = collapse(tagged);
                let events = self.dom.event_root(node).unwrap_or_else(|| {
                    tracing::warn!(
                        index = low,
                        "tagged node has no event root, using its parent's"
                    );
                    events.clone()
                });
                self.walk(node, inner, pending, low + 1, high, &events, out);
            }
            VNode::Element(el) => {
                self.walk_children(node, el.children.iter(), pending, low, high, events, out)
            }
            VNode::Keyed(el) => self.walk_children(
                node,
                el.children.iter().map(|(_, kid)| kid),
                pending,
                low,
                high,
                events,
                out,
            ),
            // a leaf spans only its own index, so `next > high` already returned
            VNode::Text(_) | VNode::Thunk(_) | VNode::Widget(_) => {}
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn walk_children<'a, 'v>(
        &self,
        node: &D::Node,
        kids: impl Iterator<Item = &'v VNode>,
        pending: &mut Pending<'a>,
        mut low: usize,
        high: usize,
        events: &EventRoot,
        out: &mut Vec<ResolvedPatch<'a, D::Node>>,
    ) {
        for (position, kid) in kids.enumerate() {
            let Some(next) = pending.peek().map(|p| p.index) else {
                return;
            };
            if next > high {
                return;
            }

            low += 1;
            let next_low = low + kid.descendants();
            if low <= next && next <= next_low {
                let Some(child) = self.dom.child(node, position) else {
                    panic!(
                        "display node is missing child {position} for the old tree node at index {low}"
                    );
                };
                self.walk(&child, kid, pending, low, next_low, events, out);
            }
            low = next_low;
        }
    }

    fn resolve_one<'a>(
        &self,
        node: &D::Node,
        vnode: &VNode,
        patch: Patch<'a>,
        low: usize,
        high: usize,
        events: &EventRoot,
    ) -> ResolvedPatch<'a, D::Node> {
        let kind = match patch.kind {
            PatchKind::Redraw(vnode) => ResolvedKind::Redraw(vnode),
            PatchKind::Facts(facts) => ResolvedKind::Facts(facts),
            PatchKind::ReplaceText(text) => ResolvedKind::ReplaceText(text),
            PatchKind::ReplaceMapperChain(mappers) => ResolvedKind::ReplaceMapperChain(mappers),
            PatchKind::AppendChildren { keep, children } => {
                ResolvedKind::AppendChildren { keep, children }
            }
            PatchKind::RemoveChildren { keep, count } => {
                ResolvedKind::RemoveChildren { keep, count }
            }
            PatchKind::InvokeWidgetPatch(patch) => ResolvedKind::InvokeWidgetPatch(patch),

            PatchKind::Thunk(patches) => {
                let VNode::Thunk(thunk) = vnode else {
                    panic!("thunk patch at index {low} addresses a node that is not a thunk");
                };
                let content = thunk.content();
                ResolvedKind::Thunk(self.resolve_all(
                    node,
                    content,
                    patches,
                    0,
                    content.descendants(),
                    events,
                ))
            }

            PatchKind::Reorder(reorder) => ResolvedKind::Reorder(ResolvedReorder {
                patches: self.resolve_all(node, vnode, reorder.patches, low, high, events),
                inserts: reorder.inserts,
                end_inserts: reorder.end_inserts,
                entries: reorder.entries,
            }),

            PatchKind::Remove(moved) => ResolvedKind::Remove(moved.map(|moved| ResolvedMove {
                entry: moved.entry,
                patches: self.resolve_all(node, vnode, moved.patches, low, high, events),
            })),
        };

        ResolvedPatch {
            index: patch.index,
            node: node.clone(),
            events: events.clone(),
            kind,
        }
    }
}
