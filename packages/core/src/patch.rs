//! The output of the diff engine.
//!
//! A patch addresses a node by its pre-order index in the *old* tree, counting from `0` at the root. Patches borrow
//! from the new tree, so the new tree must outlive them.

use crate::{
    events::{Handler, Mapper},
    facts::Value,
    nodes::VNode,
    Dom,
};
use std::{
    any::Any,
    fmt::{Debug, Formatter},
};

/// One change to apply to the display tree.
#[derive(Debug)]
pub struct Patch<'a> {
    /// The pre-order index of the target in the old tree
    pub index: usize,
    /// What to do
    pub kind: PatchKind<'a>,
}

impl<'a> Patch<'a> {
    pub(crate) fn new(index: usize, kind: PatchKind<'a>) -> Self {
        Self { index, kind }
    }
}

/// The different kinds of changes.
#[derive(Debug)]
pub enum PatchKind<'a> {
    /// Throw the node away and render this one in its place.
    Redraw(&'a VNode),

    /// Update the facts of an element or widget.
    Facts(FactsDiff<'a>),

    /// Change the content of a text node.
    ReplaceText(&'a str),

    /// Patches for the subtree of a thunk, indexed from `0` at the thunk's root.
    Thunk(Vec<Patch<'a>>),

    /// Rewrite the mappers of a tagged subtree in place, outermost first.
    ReplaceMapperChain(Vec<Mapper>),

    /// Append the given children after the first `keep` children.
    AppendChildren {
        /// How many children stay in front of the new ones
        keep: usize,
        /// The children to render and append
        children: Vec<&'a VNode>,
    },

    /// Drop `count` children after the first `keep` children.
    RemoveChildren {
        /// How many children stay
        keep: usize,
        /// How many children go
        count: usize,
    },

    /// Take a keyed child out of its parent. Only found inside a [`Reorder`].
    Remove(Option<Move<'a>>),

    /// Rearrange the children of a keyed element.
    Reorder(Reorder<'a>),

    /// Let a widget patch its own display node.
    InvokeWidgetPatch(WidgetPatch),
}

/// A keyed child that is removed here and inserted elsewhere under the same parent.
#[derive(Debug)]
pub struct Move<'a> {
    /// The entry of the [`Reorder`] that the detached node is stored under
    pub entry: usize,
    /// Patches for the moved subtree, indexed in the old tree
    pub patches: Vec<Patch<'a>>,
}

/// The result of diffing keyed children.
///
/// Applied in three steps: the local patches (including every removal, which detaches moved nodes), then the
/// inserts in order, then the end inserts appended together.
#[derive(Debug, Default)]
pub struct Reorder<'a> {
    /// In-place diffs and removals of children
    pub patches: Vec<Patch<'a>>,
    /// Children inserted before the child currently at `position`
    pub inserts: Vec<Insert>,
    /// Entries appended after every existing child, in order
    pub end_inserts: Vec<usize>,
    /// What each insert brings in
    pub entries: Vec<Entry<'a>>,
}

impl Reorder<'_> {
    /// Check if applying this reorder would do nothing.
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty() && self.inserts.is_empty() && self.end_inserts.is_empty()
    }
}

/// An insertion in the middle of a keyed element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insert {
    /// The index, among the children left after the removals, to insert in front of
    pub position: usize,
    /// The entry to insert
    pub entry: usize,
}

/// The node brought in by an insert.
#[derive(Debug)]
pub enum Entry<'a> {
    /// A fresh node, rendered on insertion
    Insert(&'a VNode),
    /// An existing node, detached by a [`PatchKind::Remove`] carrying this entry
    Move,
}

/// The changed facts of one node.
///
/// A `None` value (or an empty style) clears the fact.
#[derive(Debug, Default)]
pub struct FactsDiff<'a> {
    /// Event listeners to install or remove
    pub events: Vec<(&'a str, Option<&'a Handler>)>,
    /// Style properties to set, the empty string clears
    pub styles: Vec<(&'a str, &'a str)>,
    /// Properties to set or clear
    pub properties: Vec<(&'a str, Option<&'a Value>)>,
    /// Attributes to set or remove
    pub attributes: Vec<(&'a str, Option<&'a str>)>,
    /// Namespaced attributes to set or remove, as `(name, namespace, value)`
    pub attributes_ns: Vec<(&'a str, &'a str, Option<&'a str>)>,
}

impl FactsDiff<'_> {
    /// Check if there is nothing to change.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
            && self.styles.is_empty()
            && self.properties.is_empty()
            && self.attributes.is_empty()
            && self.attributes_ns.is_empty()
    }
}

type WidgetPatchFn = dyn FnOnce(&mut dyn Any, &dyn Any) -> Box<dyn Any>;

/// A change a widget makes to its own display node.
pub struct WidgetPatch(Box<WidgetPatchFn>);

impl WidgetPatch {
    /// Wrap a patch for a widget rendered with the display backend `D`.
    ///
    /// The function receives the live node and returns the node that should stand in its place from now on, which
    /// is usually the same node.
    pub fn new<D: Dom>(
        f: impl FnOnce(&mut D, &D::Node) -> Result<D::Node, D::Error> + 'static,
    ) -> Self {
        Self(Box::new(move |dom: &mut dyn Any, node: &dyn Any| {
            let Some(dom) = dom.downcast_mut::<D>() else {
                panic!(
                    "widget patch applied with a backend other than `{}`",
                    std::any::type_name::<D>()
                );
            };
            let Some(node) = node.downcast_ref::<D::Node>() else {
                panic!("widget patch applied to a foreign display node");
            };
            Box::new(f(dom, node))
        }))
    }

    pub(crate) fn apply<D: Dom>(self, dom: &mut D, node: &D::Node) -> Result<D::Node, D::Error> {
        let result = (self.0)(dom, node);
        match result.downcast::<Result<D::Node, D::Error>>() {
            Ok(result) => *result,
            Err(_) => panic!("widget patch returned a node of another backend"),
        }
    }
}

impl Debug for WidgetPatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("WidgetPatch")
    }
}
