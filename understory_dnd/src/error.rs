// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Both errors describe integration mistakes rather than runtime conditions.
//! They are returned as soon as they are detected and never retried.

use crate::types::DragKind;

/// Errors surfaced by target resolution and the observation handles.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DndError {
    /// No registered draggable lists the dragged kind in its accept list.
    #[error("no registered draggable accepts drag kind `{kind}`")]
    NoAcceptingTarget {
        /// Kind of the dragged source.
        kind: DragKind,
    },
    /// A [`Sortable`](crate::root::Sortable) handle was used after its root was dropped.
    #[error("drag-and-drop root is no longer alive")]
    MissingContext,
}

/// Errors from the [`reorder`](crate::reorder) helpers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    /// The dragged id is not in the list (or in any group).
    #[error("drag source is not present in the list")]
    SourceNotFound,
    /// The drop target is neither an item nor a group id.
    #[error("drop target is neither a listed item nor a group")]
    TargetNotFound,
}
