// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostic distance lines from the pointer to each candidate center.
//!
//! The lines are data only; drawing them (and styling the nearest one) is up
//! to the host. They mirror the nearest-center ranking used by
//! [`closest_target`](crate::resolve::closest_target) and ignore containment.

use alloc::vec::Vec;

use kurbo::{Line, Point};

use crate::registry::Registry;
use crate::types::Draggable;

/// One pointer → center line.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceLine<K> {
    /// Candidate id.
    pub id: K,
    /// From the pointer to the candidate's center.
    pub line: Line,
    /// Line length.
    pub length: f64,
    /// Direction from the pointer to the center, in radians.
    pub angle: f64,
    /// Set on the single shortest line.
    pub nearest: bool,
}

impl<K> DistanceLine<K> {
    /// [`angle`](Self::angle) in degrees.
    pub fn angle_degrees(&self) -> f64 {
        self.angle.to_degrees()
    }
}

/// Lines to every registered draggable that accepts `source`'s kind, in registration order.
///
/// On equal lengths the first line is marked nearest.
pub fn distance_lines<K: Ord + Clone>(
    pointer: Point,
    source: &Draggable<K>,
    registry: &Registry<K>,
) -> Vec<DistanceLine<K>> {
    let mut lines: Vec<DistanceLine<K>> = registry
        .in_registration_order()
        .into_iter()
        .filter(|d| d.accepts(source.kind()))
        .map(|d| {
            let center = d.bounds().center();
            let delta = center - pointer;
            DistanceLine {
                id: d.id().clone(),
                line: Line::new(pointer, center),
                length: delta.hypot(),
                angle: delta.atan2(),
                nearest: false,
            }
        })
        .collect();

    let mut nearest: Option<(usize, f64)> = None;
    for (i, line) in lines.iter().enumerate() {
        if nearest.is_none_or(|(_, best)| line.length < best) {
            nearest = Some((i, line.length));
        }
    }
    if let Some((i, _)) = nearest {
        lines[i].nearest = true;
    }
    lines
}
