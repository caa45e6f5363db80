// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: drag kinds, draggable descriptors, bounds providers, and drop notifications.
//!
//! ## Overview
//!
//! A [`Draggable`] is one registered drag/drop participant. It is built from a
//! [`DragSpec`] (what it is and what it accepts) plus a [`BoundsProvider`]
//! (where it currently is on screen). Bounds are queried on demand and never
//! cached, so layout changes between pointer moves are always observed.

use alloc::borrow::Cow;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use kurbo::Rect;

/// Tag classifying what kind of thing a draggable is (for example `"item"` or `"column"`).
///
/// Kinds are compared by value. A [`Draggable`] accepts a dragged source when
/// the source's kind appears in its [`accept`](Draggable::accept) list.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DragKind(Cow<'static, str>);

impl DragKind {
    /// Create a kind from a static name.
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// The kind's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for DragKind {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for DragKind {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl fmt::Display for DragKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces the current screen rectangle of a draggable.
///
/// Called on every resolution pass; implementations should read live layout
/// rather than a snapshot taken at registration time.
pub trait BoundsProvider {
    /// Current bounds in the same coordinate space as pointer positions.
    fn bounds(&self) -> Rect;
}

/// A fixed rectangle, mostly useful for tests and static layouts.
impl BoundsProvider for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// A rectangle the host rewrites after each layout pass.
impl BoundsProvider for Cell<Rect> {
    fn bounds(&self) -> Rect {
        self.get()
    }
}

impl<F: Fn() -> Rect> BoundsProvider for F {
    fn bounds(&self) -> Rect {
        self()
    }
}

/// Registration parameters for a draggable: its kind, accepted kinds, and optional children.
///
/// ```
/// use understory_dnd::types::DragSpec;
///
/// let column: DragSpec<u32> = DragSpec::new("column")
///     .accepts(["column", "item"])
///     .with_items([10, 11, 12]);
/// assert!(column.items.is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragSpec<K> {
    /// Kind of this draggable.
    pub kind: DragKind,
    /// Kinds this draggable receives as a drop target.
    pub accept: Vec<DragKind>,
    /// Ordered child ids for containers; `None` for leaves.
    pub items: Option<Vec<K>>,
}

impl<K> DragSpec<K> {
    /// A leaf spec of the given kind that accepts nothing yet.
    pub fn new(kind: impl Into<DragKind>) -> Self {
        Self {
            kind: kind.into(),
            accept: Vec::new(),
            items: None,
        }
    }

    /// Add accepted kinds.
    pub fn accepts<I>(mut self, kinds: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DragKind>,
    {
        self.accept.extend(kinds.into_iter().map(Into::into));
        self
    }

    /// Turn this spec into a container with the given ordered children.
    pub fn with_items(mut self, items: impl IntoIterator<Item = K>) -> Self {
        self.items = Some(items.into_iter().collect());
        self
    }
}

/// One registered drag/drop participant.
///
/// Descriptors are immutable once registered; changing the kind, accept list,
/// items, or bounds provider means registering again under the same id.
pub struct Draggable<K> {
    id: K,
    kind: DragKind,
    accept: Vec<DragKind>,
    items: Option<Vec<K>>,
    bounds: Rc<dyn BoundsProvider>,
}

impl<K: fmt::Debug> fmt::Debug for Draggable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Draggable")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("accept", &self.accept)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl<K> Draggable<K> {
    /// Build a descriptor from its id, spec, and bounds provider.
    pub fn new(id: K, spec: DragSpec<K>, bounds: Rc<dyn BoundsProvider>) -> Self {
        Self {
            id,
            kind: spec.kind,
            accept: spec.accept,
            items: spec.items,
            bounds,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &K {
        &self.id
    }

    /// Kind tag.
    pub fn kind(&self) -> &DragKind {
        &self.kind
    }

    /// Kinds accepted as a drop target.
    pub fn accept(&self) -> &[DragKind] {
        &self.accept
    }

    /// Whether a source of `kind` may be dropped on this descriptor.
    pub fn accepts(&self, kind: &DragKind) -> bool {
        self.accept.contains(kind)
    }

    /// Ordered child ids, if this is a container.
    pub fn items(&self) -> Option<&[K]> {
        self.items.as_deref()
    }

    /// Whether this descriptor carries a child list.
    pub fn is_container(&self) -> bool {
        self.items.is_some()
    }

    /// Query the current bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds.bounds()
    }
}

/// Whether a pointer-down should keep propagating to enclosing elements.
///
/// Returned by [`GestureRecognizer::pointer_down`](crate::gesture::GestureRecognizer::pointer_down)
/// and [`DndRoot::pointer_down`](crate::root::DndRoot::pointer_down).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Propagation {
    /// Not handled here; the host should offer the event to the parent element.
    Continue,
    /// A gesture was armed; the host should stop propagation.
    Stop,
}

/// Drop-over notification carrying the dragged source and its newly resolved target.
///
/// Delivered to [`DndRoot::on_drag_over`](crate::root::DndRoot::on_drag_over)
/// monitors. Interpreting it as a reorder is up to the application, see
/// [`reorder`](crate::reorder).
pub struct DragOver<K> {
    /// The dragged descriptor.
    pub source: Rc<Draggable<K>>,
    /// The descriptor the source is currently over.
    pub target: Rc<Draggable<K>>,
}

impl<K: fmt::Debug> fmt::Debug for DragOver<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragOver")
            .field("source", self.source.id())
            .field("target", self.target.id())
            .finish()
    }
}
