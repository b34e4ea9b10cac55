//! Comparing two view trees.
//!
//! The old tree is numbered in pre-order: the root is `0`, its first child `1`, the first child's descendants follow,
//! and so on. Every patch names the node it applies to by that number. Descendant counts let the walk step over a
//! child's whole subtree in one addition, which is what lets patch application skip untouched subtrees later.
//!
//! Tagged nodes are the one wrinkle: a chain of nested `map`s collapses onto a single index, so the subtree below the
//! chain always starts at the chain's index plus one.
//!
//! Thunks open a fresh numbering. A thunk counts as a leaf in its parent's numbering, and the patches for its
//! content are wrapped in a [`PatchKind::Thunk`] whose indices start from `0` at the content's root.

use crate::{
    events::Mapper,
    facts::{Facts, Str},
    nodes::{VElement, VKeyed, VNode, VTagged},
    patch::{Patch, PatchKind},
};

mod facts;
mod keyed;

pub(crate) use facts::diff_facts;

/// Compute the patches that turn the display tree of `old` into the display tree of `new`.
///
/// Thunks in `new` whose arguments match the thunk they replace adopt the old thunk's content, so `new` is the tree
/// to keep around once the patches are applied.
pub fn diff<'a>(old: &'a VNode, new: &'a VNode) -> Vec<Patch<'a>> {
    let mut patches = Vec::new();
    diff_help(old, new, &mut patches, 0);
    tracing::debug!(patches = patches.len(), "diffed view trees");
    patches
}

pub(crate) fn diff_help<'a>(
    x: &'a VNode,
    y: &'a VNode,
    patches: &mut Vec<Patch<'a>>,
    index: usize,
) {
    if std::ptr::eq(x, y) {
        return;
    }

    match (x, y) {
        (VNode::Thunk(xt), VNode::Thunk(yt)) => {
            if xt.same_args(yt) {
                tracing::trace!(index, "reusing thunk");
                yt.adopt(xt.content().clone());
                return;
            }

            let mut sub_patches = Vec::new();
            diff_help(xt.force(), yt.force(), &mut sub_patches, 0);
            if !sub_patches.is_empty() {
                patches.push(Patch::new(index, PatchKind::Thunk(sub_patches)));
            }
        }

        (VNode::Tagged(xt), VNode::Tagged(yt)) => {
            let (x_mappers, x_inner) = collapse(xt);
            let (y_mappers, y_inner) = collapse(yt);

            if x_mappers.len() != y_mappers.len() {
                return redraw(y, patches, index);
            }

            let same = x_mappers.iter().zip(&y_mappers).all(|(a, b)| a.ptr_eq(b));
            if !same {
                let chain = y_mappers.into_iter().cloned().collect();
                patches.push(Patch::new(index, PatchKind::ReplaceMapperChain(chain)));
            }

            diff_help(x_inner, y_inner, patches, index + 1);
        }

        (VNode::Text(xt), VNode::Text(yt)) => {
            if xt.text != yt.text {
                patches.push(Patch::new(index, PatchKind::ReplaceText(&yt.text)));
            }
        }

        (VNode::Keyed(xk), VNode::Keyed(yk)) => {
            if !diff_parents(Parent::keyed(xk), Parent::keyed(yk), y, patches, index) {
                return;
            }
            keyed::diff_keyed_kids(&xk.children, &yk.children, patches, index);
        }

        (VNode::Element(_) | VNode::Keyed(_), VNode::Element(_) | VNode::Keyed(_)) => {
            let (Some(xp), Some(yp)) = (Parent::of(x), Parent::of(y)) else {
                return redraw(y, patches, index);
            };
            let (x_kids, y_kids) = (xp.kids, yp.kids);
            if !diff_parents(xp, yp, y, patches, index) {
                return;
            }
            diff_kids(x_kids, y_kids, patches, index);
        }

        (VNode::Widget(xw), VNode::Widget(yw)) => {
            if !xw.same_kind(yw) {
                return redraw(y, patches, index);
            }

            if let Some(facts) = diff_facts(&xw.facts, &yw.facts) {
                patches.push(Patch::new(index, PatchKind::Facts(facts)));
            }

            if let Some(patch) = (yw.diff)(&*xw.model, &*yw.model) {
                patches.push(Patch::new(index, PatchKind::InvokeWidgetPatch(patch)));
            }
        }

        _ => redraw(y, patches, index),
    }
}

fn redraw<'a>(y: &'a VNode, patches: &mut Vec<Patch<'a>>, index: usize) {
    tracing::trace!(index, "redrawing node");
    patches.push(Patch::new(index, PatchKind::Redraw(y)));
}

/// The mappers of a chain of tagged nodes, outermost first, and the node below the chain.
pub(crate) fn collapse(tagged: &VTagged) -> (Vec<&Mapper>, &VNode) {
    let mut mappers = vec![&tagged.mapper];
    let mut inner = &*tagged.inner;
    while let VNode::Tagged(next) = inner {
        mappers.push(&next.mapper);
        inner = &next.inner;
    }
    (mappers, inner)
}

/// Compare everything about two elements except their children.
///
/// Returns `false` when the new element had to be redrawn, in which case the children must not be diffed.
fn diff_parents<'a>(
    x: Parent<'a>,
    y: Parent<'a>,
    y_node: &'a VNode,
    patches: &mut Vec<Patch<'a>>,
    index: usize,
) -> bool {
    if x.tag != y.tag || x.namespace != y.namespace {
        redraw(y_node, patches, index);
        return false;
    }

    if let Some(facts) = diff_facts(x.facts, y.facts) {
        patches.push(Patch::new(index, PatchKind::Facts(facts)));
    }
    true
}

/// Children matched by position.
fn diff_kids<'a>(x: Kids<'a>, y: Kids<'a>, patches: &mut Vec<Patch<'a>>, root_index: usize) {
    let (x_len, y_len) = (x.len(), y.len());

    if x_len > y_len {
        patches.push(Patch::new(
            root_index,
            PatchKind::RemoveChildren {
                keep: y_len,
                count: x_len - y_len,
            },
        ));
    } else if x_len < y_len {
        patches.push(Patch::new(
            root_index,
            PatchKind::AppendChildren {
                keep: x_len,
                children: (x_len..y_len).map(|i| y.get(i)).collect(),
            },
        ));
    }

    let mut index = root_index;
    for i in 0..x_len.min(y_len) {
        let x_kid = x.get(i);
        index += 1;
        diff_help(x_kid, y.get(i), patches, index);
        index += x_kid.descendants();
    }
}

/// The parts of an element that are compared before its children.
struct Parent<'a> {
    tag: &'a Str,
    namespace: Option<&'a Str>,
    facts: &'a Facts,
    kids: Kids<'a>,
}

impl<'a> Parent<'a> {
    fn of(node: &'a VNode) -> Option<Self> {
        match node {
            VNode::Element(el) => Some(Self::element(el)),
            VNode::Keyed(el) => Some(Self::keyed(el)),
            _ => None,
        }
    }

    fn element(el: &'a VElement) -> Self {
        Self {
            tag: &el.tag,
            namespace: el.namespace.as_ref(),
            facts: &el.facts,
            kids: Kids::Plain(&el.children),
        }
    }

    fn keyed(el: &'a VKeyed) -> Self {
        Self {
            tag: &el.tag,
            namespace: el.namespace.as_ref(),
            facts: &el.facts,
            kids: Kids::Keyed(&el.children),
        }
    }
}

/// Children of either kind of element, viewed positionally.
#[derive(Clone, Copy)]
enum Kids<'a> {
    Plain(&'a [VNode]),
    Keyed(&'a [(Str, VNode)]),
}

impl<'a> Kids<'a> {
    fn len(&self) -> usize {
        match self {
            Kids::Plain(kids) => kids.len(),
            Kids::Keyed(kids) => kids.len(),
        }
    }

    fn get(&self, i: usize) -> &'a VNode {
        match self {
            Kids::Plain(kids) => &kids[i],
            Kids::Keyed(kids) => &kids[i].1,
        }
    }
}
