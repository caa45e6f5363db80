// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reorder helpers: apply a `(source, target)` drag-over to application-owned lists.
//!
//! The engine never mutates application data. A [`DragOver`](crate::types::DragOver)
//! monitor typically calls one of these helpers and then registers the affected
//! participants again.
//!
//! ## Example
//!
//! ```
//! use understory_dnd::reorder::{Group, move_between_groups, move_item};
//!
//! let mut list = vec![1, 2, 3, 4];
//! assert_eq!(move_item(&mut list, |k| k, &1, &3), Ok(true));
//! assert_eq!(list, [2, 3, 1, 4]);
//!
//! let mut columns = vec![Group::new(10, vec![1, 2]), Group::new(20, vec![])];
//! // Dropping onto an empty column appends.
//! assert_eq!(move_between_groups(&mut columns, &2, &20), Ok(true));
//! assert_eq!(columns[1].items, [2]);
//! ```

use alloc::vec::Vec;

use crate::error::ReorderError;

/// Move the element keyed `source` to the index currently held by `target`.
///
/// Returns `Ok(false)` when `target` is not in the list or both keys sit at
/// the same index.
pub fn move_item<T, K: PartialEq>(
    list: &mut Vec<T>,
    key: impl Fn(&T) -> &K,
    source: &K,
    target: &K,
) -> Result<bool, ReorderError> {
    let from = list
        .iter()
        .position(|t| key(t) == source)
        .ok_or(ReorderError::SourceNotFound)?;
    let Some(to) = list.iter().position(|t| key(t) == target) else {
        return Ok(false);
    };
    if from == to {
        return Ok(false);
    }
    let moved = list.remove(from);
    list.insert(to, moved);
    Ok(true)
}

/// An identified, ordered group of item ids (for example a board column).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group<K> {
    /// Group id; also a valid drop target.
    pub id: K,
    /// Ordered item ids.
    pub items: Vec<K>,
}

impl<K> Group<K> {
    /// Create a group.
    pub fn new(id: K, items: Vec<K>) -> Self {
        Self { id, items }
    }
}

/// Move item `source` next to `target`, which is either an item or a group id.
///
/// Within one group this is [`move_item`]. Across groups the item leaves its
/// group and is inserted at the target's index, or after the target when the
/// target is the last item. A group id as target appends to that group; the
/// source's own group id is a no-op.
pub fn move_between_groups<K: PartialEq>(
    groups: &mut [Group<K>],
    source: &K,
    target: &K,
) -> Result<bool, ReorderError> {
    let from_group = groups
        .iter()
        .position(|g| g.items.contains(source))
        .ok_or(ReorderError::SourceNotFound)?;
    let to_group = groups
        .iter()
        .position(|g| g.id == *target || g.items.contains(target))
        .ok_or(ReorderError::TargetNotFound)?;

    if from_group == to_group {
        if groups[from_group].id == *target {
            return Ok(false);
        }
        return move_item(&mut groups[from_group].items, |k| k, source, target);
    }

    let items = &mut groups[from_group].items;
    let from = items
        .iter()
        .position(|k| k == source)
        .ok_or(ReorderError::SourceNotFound)?;
    let moved = items.remove(from);

    let dest = &mut groups[to_group].items;
    let at = match dest.iter().position(|k| k == target) {
        Some(i) if i + 1 < dest.len() => i,
        _ => dest.len(),
    };
    dest.insert(at, moved);
    Ok(true)
}
