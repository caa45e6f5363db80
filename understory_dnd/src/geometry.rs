// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry helpers: containment, center distance, and size-mismatch disambiguation.
//!
//! ## Size mismatch
//!
//! When two same-kind siblings differ in size, picking the nearest center is
//! unstable: as soon as a small item swaps with a large neighbor, the pointer
//! sits nearer the neighbor's new center and the pair swaps back.
//! [`size_mismatch_pick`] instead splits the pair's combined extent at
//! `origin + (size_a + size_b) / 2`, where `origin` is the smaller leading
//! edge, and picks the rectangle on the pointer's side of that split. The split
//! is the same before and after a swap of adjacent siblings, so the result does
//! not oscillate.

use alloc::rc::Rc;

use kurbo::{Point, Rect};

use crate::types::Draggable;

/// Whether `point` lies inside `rect`. All four edges count as inside.
pub fn point_in_rect(rect: Rect, point: Point) -> bool {
    let r = rect.abs();
    r.x0 <= point.x && point.x <= r.x1 && r.y0 <= point.y && point.y <= r.y1
}

/// Euclidean distance from `point` to the center of `rect`.
///
/// This is a ranking metric only.
pub fn center_distance(rect: Rect, point: Point) -> f64 {
    rect.center().distance(point)
}

/// Axis along which two rectangles are compared for size mismatch.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SizeAxis {
    /// Compare left edges and widths.
    Horizontal,
    /// Compare top edges and heights.
    Vertical,
}

impl SizeAxis {
    /// Horizontal when both rectangles share a top edge but differ in left edge,
    /// vertical otherwise.
    pub fn between(a: Rect, b: Rect) -> Self {
        let (a, b) = (a.abs(), b.abs());
        if a.y0 == b.y0 && a.x0 != b.x0 {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    /// Leading edge and size of `rect` along this axis.
    pub fn extent(self, rect: Rect) -> (f64, f64) {
        let r = rect.abs();
        match self {
            Self::Horizontal => (r.x0, r.width()),
            Self::Vertical => (r.y0, r.height()),
        }
    }

    /// Coordinate of `point` along this axis.
    pub fn coord(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }
}

/// Split position between two rectangles along `axis`.
pub fn split_threshold(axis: SizeAxis, a: Rect, b: Rect) -> f64 {
    let (a_lead, a_size) = axis.extent(a);
    let (b_lead, b_size) = axis.extent(b);
    let origin = if a_lead < b_lead { a_lead } else { b_lead };
    origin + (a_size + b_size) / 2.0
}

/// Outcome of [`size_mismatch_pick`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Pick {
    /// Keep the dragged source (no move).
    Source,
    /// Accept the candidate.
    Candidate,
}

/// Choose between the source and candidate rectangles for a pointer position.
///
/// Equal sizes along the comparison axis always pick the candidate. Otherwise a
/// pointer before the [split](split_threshold) picks the rectangle with the
/// smaller leading edge and a pointer at or past it picks the other one; the
/// source leads when both leading edges are equal.
pub fn size_mismatch_pick(pointer: Point, source: Rect, candidate: Rect) -> Pick {
    let axis = SizeAxis::between(source, candidate);
    let (source_lead, source_size) = axis.extent(source);
    let (candidate_lead, candidate_size) = axis.extent(candidate);
    if source_size == candidate_size {
        return Pick::Candidate;
    }
    let before = axis.coord(pointer) < split_threshold(axis, source, candidate);
    let source_leads = source_lead <= candidate_lead;
    if before == source_leads {
        Pick::Source
    } else {
        Pick::Candidate
    }
}

/// Descriptor-level size-mismatch resolution.
///
/// Candidates of a different kind than the source (and the source itself) are
/// returned unchanged; kind changes are not subject to size disambiguation.
pub fn resolve_size_mismatch<K: PartialEq>(
    pointer: Point,
    source: &Rc<Draggable<K>>,
    candidate: &Rc<Draggable<K>>,
) -> Rc<Draggable<K>> {
    if source.kind() != candidate.kind() || source.id() == candidate.id() {
        return Rc::clone(candidate);
    }
    match size_mismatch_pick(pointer, source.bounds(), candidate.bounds()) {
        Pick::Source => Rc::clone(source),
        Pick::Candidate => Rc::clone(candidate),
    }
}
