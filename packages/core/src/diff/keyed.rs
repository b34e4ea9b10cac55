//! Reconciling keyed children.
//!
//! Two cursors walk the old and new children together. When the keys under the cursors differ, a single step of
//! look-ahead recognizes the common edits (one insertion, one removal, a swap of neighbours, one replacement) and
//! keeps going. Anything more tangled stops the walk, and whatever is left is removed and appended wholesale.
//!
//! Every removal and insertion is recorded under its key. A key that is removed on one side and inserted on the
//! other is a move: the display node is detached, patched, and put back where it belongs instead of being rebuilt.

use super::diff_help;
use crate::{
    facts::Str,
    nodes::VNode,
    patch::{Entry, Insert, Move, Patch, PatchKind, Reorder},
};
use rustc_hash::FxHashMap;
use std::borrow::Cow;

/// Appended to a key that shows up more than once on the same side.
const DUPLICATE: &str = "_trellis\u{0}dup";

#[derive(Clone, Copy)]
enum Change<'a> {
    /// Seen as a new child, waiting for a removal to turn into a move
    Inserted { entry: usize, node: &'a VNode },
    /// Seen as an old child at `index`, whose removal is the local patch at `patch`
    Removed {
        node: &'a VNode,
        index: usize,
        patch: usize,
    },
    /// Matched on both sides
    Moved,
}

struct KeyedDiff<'a> {
    changes: FxHashMap<Cow<'a, str>, Change<'a>>,
    reorder: Reorder<'a>,
}

pub(crate) fn diff_keyed_kids<'a>(
    x_kids: &'a [(Str, VNode)],
    y_kids: &'a [(Str, VNode)],
    patches: &mut Vec<Patch<'a>>,
    root_index: usize,
) {
    let mut state = KeyedDiff {
        changes: FxHashMap::default(),
        reorder: Reorder::default(),
    };

    let (x_len, y_len) = (x_kids.len(), y_kids.len());
    let (mut xi, mut yi) = (0, 0);
    let mut index = root_index;

    while xi < x_len && yi < y_len {
        let (x_key, x_node) = (&x_kids[xi].0, &x_kids[xi].1);
        let (y_key, y_node) = (&y_kids[yi].0, &y_kids[yi].1);

        if x_key == y_key {
            index += 1;
            diff_help(x_node, y_node, &mut state.reorder.patches, index);
            index += x_node.descendants();
            xi += 1;
            yi += 1;
            continue;
        }

        let x_next = x_kids.get(xi + 1);
        let y_next = y_kids.get(yi + 1);

        // the old child after the cursor is the new child under it
        let old_match = x_next.is_some_and(|(key, _)| key == y_key);
        // the new child after the cursor is the old child under it
        let new_match = y_next.is_some_and(|(key, _)| key == x_key);

        match (x_next, y_next) {
            (Some((x_next_key, x_next_node)), Some((_, y_next_node))) if old_match && new_match => {
                tracing::trace!(index, "swapping keyed children");
                index += 1;
                diff_help(x_node, y_next_node, &mut state.reorder.patches, index);
                state.insert_node(Cow::Borrowed(y_key), y_node, Some(yi));
                index += x_node.descendants();

                index += 1;
                state.remove_node(Cow::Borrowed(x_next_key), x_next_node, index);
                index += x_next_node.descendants();

                xi += 2;
                yi += 2;
            }

            (_, Some((_, y_next_node))) if new_match => {
                index += 1;
                state.insert_node(Cow::Borrowed(y_key), y_node, Some(yi));
                diff_help(x_node, y_next_node, &mut state.reorder.patches, index);
                index += x_node.descendants();

                xi += 1;
                yi += 2;
            }

            (Some((_, x_next_node)), _) if old_match => {
                index += 1;
                state.remove_node(Cow::Borrowed(x_key), x_node, index);
                index += x_node.descendants();

                index += 1;
                diff_help(x_next_node, y_node, &mut state.reorder.patches, index);
                index += x_next_node.descendants();

                xi += 2;
                yi += 1;
            }

            (Some((x_next_key, _)), Some((y_next_key, _))) if x_next_key == y_next_key => {
                index += 1;
                state.remove_node(Cow::Borrowed(x_key), x_node, index);
                state.insert_node(Cow::Borrowed(y_key), y_node, Some(yi));
                index += x_node.descendants();

                xi += 1;
                yi += 1;
            }

            _ => break,
        }
    }

    while xi < x_len {
        let (x_key, x_node) = (&x_kids[xi].0, &x_kids[xi].1);
        index += 1;
        state.remove_node(Cow::Borrowed(x_key), x_node, index);
        index += x_node.descendants();
        xi += 1;
    }

    while yi < y_len {
        let (y_key, y_node) = (&y_kids[yi].0, &y_kids[yi].1);
        state.insert_node(Cow::Borrowed(y_key), y_node, None);
        yi += 1;
    }

    if !state.reorder.is_empty() {
        tracing::trace!(
            index = root_index,
            inserts = state.reorder.inserts.len(),
            end_inserts = state.reorder.end_inserts.len(),
            "reordering keyed children"
        );
        patches.push(Patch::new(root_index, PatchKind::Reorder(state.reorder)));
    }
}

impl<'a> KeyedDiff<'a> {
    /// Record a new child that belongs before the child at `position`, or at the end.
    fn insert_node(&mut self, key: Cow<'a, str>, node: &'a VNode, position: Option<usize>) {
        match self.changes.get(&key).copied() {
            None => {
                let entry = self.push_entry(Entry::Insert(node), position);
                self.changes.insert(key, Change::Inserted { entry, node });
            }

            Some(Change::Removed {
                node: old,
                index,
                patch,
            }) => {
                self.changes.insert(key, Change::Moved);
                let entry = self.push_entry(Entry::Move, position);

                let mut patches = Vec::new();
                diff_help(old, node, &mut patches, index);
                self.reorder.patches[patch].kind = PatchKind::Remove(Some(Move { entry, patches }));
            }

            Some(_) => self.insert_node(Cow::Owned(format!("{key}{DUPLICATE}")), node, position),
        }
    }

    /// Record that the old child at `index` is no longer where it was.
    fn remove_node(&mut self, key: Cow<'a, str>, node: &'a VNode, index: usize) {
        match self.changes.get(&key).copied() {
            None => {
                let patch = self.reorder.patches.len();
                self.reorder
                    .patches
                    .push(Patch::new(index, PatchKind::Remove(None)));
                self.changes
                    .insert(key, Change::Removed { node, index, patch });
            }

            Some(Change::Inserted { entry, node: new }) => {
                self.changes.insert(key, Change::Moved);
                self.reorder.entries[entry] = Entry::Move;

                let mut patches = Vec::new();
                diff_help(node, new, &mut patches, index);
                self.reorder
                    .patches
                    .push(Patch::new(index, PatchKind::Remove(Some(Move { entry, patches }))));
            }

            Some(_) => self.remove_node(Cow::Owned(format!("{key}{DUPLICATE}")), node, index),
        }
    }

    fn push_entry(&mut self, entry: Entry<'a>, position: Option<usize>) -> usize {
        let id = self.reorder.entries.len();
        self.reorder.entries.push(entry);
        match position {
            Some(position) => self.reorder.inserts.push(Insert { position, entry: id }),
            None => self.reorder.end_inserts.push(id),
        }
        id
    }
}
