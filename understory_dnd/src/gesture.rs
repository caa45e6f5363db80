// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture recognizer: turns pointer down/move/up into drag start/move/end.
//!
//! ## States
//!
//! - `Idle`: nothing pressed.
//! - `Pressed`: pointer went down on a draggable; still a potential click.
//! - `Dragging`: the pointer moved far enough after the press.
//!
//! `Pressed → Dragging` happens on the first pointer move whose travel from the
//! press position reaches [`GestureConfig::drag_threshold`]. With the default
//! threshold of `0.0` that is the first move. A pointer up while `Pressed` is a
//! click and produces no events.
//!
//! Entering `Dragging` emits [`GestureEvent::Start`] followed by the first
//! [`GestureEvent::Move`]. Leaving it, through pointer up or [`cancel`], emits
//! exactly one [`GestureEvent::End`].
//!
//! ## Affordance
//!
//! The recognizer applies an [`Affordance`] (typically a global "grabbing"
//! cursor) when dragging starts and removes it when dragging ends, when the
//! gesture is cancelled, or when the recognizer is dropped mid-drag.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_dnd::gesture::{GestureEvent, GestureRecognizer};
//!
//! let mut g: GestureRecognizer<u32> = GestureRecognizer::default();
//! g.pointer_down(1, Point::new(0.0, 0.0));
//! let events = g.pointer_move(Point::new(4.0, 0.0));
//! assert!(matches!(events[0], GestureEvent::Start { source: 1, .. }));
//! assert!(matches!(events[1], GestureEvent::Move { source: 1, .. }));
//! assert_eq!(g.pointer_up(Point::new(4.0, 0.0)).len(), 1);
//! ```
//!
//! [`cancel`]: GestureRecognizer::cancel

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::types::Propagation;

/// Global visual feedback held for the duration of a drag.
pub trait Affordance {
    /// Called when a drag starts.
    fn apply(&mut self);
    /// Called exactly once after each [`apply`](Self::apply).
    fn remove(&mut self);
}

/// An affordance that does nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoAffordance;

impl Affordance for NoAffordance {
    #[inline]
    fn apply(&mut self) {}

    #[inline]
    fn remove(&mut self) {}
}

impl<A: Affordance + ?Sized> Affordance for Box<A> {
    fn apply(&mut self) {
        (**self).apply();
    }

    fn remove(&mut self) {
        (**self).remove();
    }
}

/// Thresholds for gesture recognition.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureConfig {
    /// Minimum pointer travel from the press position before a drag starts (default: `0.0`).
    pub drag_threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 0.0,
        }
    }
}

/// Current recognizer state.
#[derive(Clone, Debug, PartialEq)]
pub enum GesturePhase<K> {
    /// No pointer pressed on a draggable.
    Idle,
    /// Pressed on `source` at `origin`; not yet a drag.
    Pressed {
        /// Pressed draggable.
        source: K,
        /// Press position.
        origin: Point,
    },
    /// Dragging `source`, which was pressed at `origin`.
    Dragging {
        /// Dragged draggable.
        source: K,
        /// Press position.
        origin: Point,
    },
}

/// Drag lifecycle events.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureEvent<K> {
    /// The drag started; always followed by a `Move` for the same position.
    Start {
        /// Dragged draggable.
        source: K,
        /// Press position.
        origin: Point,
        /// Position of the move that started the drag.
        position: Point,
    },
    /// The pointer moved while dragging.
    Move {
        /// Dragged draggable.
        source: K,
        /// Raw pointer position.
        position: Point,
    },
    /// The drag ended.
    End {
        /// Dragged draggable.
        source: K,
        /// Release position, or `None` when the drag was cancelled.
        position: Option<Point>,
    },
}

/// Pointer gesture state machine for a single pointer.
pub struct GestureRecognizer<K, A: Affordance = NoAffordance> {
    config: GestureConfig,
    phase: GesturePhase<K>,
    affordance: A,
}

impl<K: fmt::Debug, A: Affordance> fmt::Debug for GestureRecognizer<K, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureRecognizer")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl<K, A: Affordance + Default> Default for GestureRecognizer<K, A> {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl<K, A: Affordance + Default> GestureRecognizer<K, A> {
    /// Create an idle recognizer with a default affordance.
    pub fn new(config: GestureConfig) -> Self {
        Self::with_affordance(config, A::default())
    }
}

impl<K, A: Affordance> GestureRecognizer<K, A> {
    /// Create an idle recognizer with an explicit affordance.
    pub fn with_affordance(config: GestureConfig, affordance: A) -> Self {
        Self {
            config,
            phase: GesturePhase::Idle,
            affordance,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> &GesturePhase<K> {
        &self.phase
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, GesturePhase::Dragging { .. })
    }

    /// Whether nothing is pressed.
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, GesturePhase::Idle)
    }

    /// The pressed or dragged draggable, if any.
    pub fn source(&self) -> Option<&K> {
        match &self.phase {
            GesturePhase::Idle => None,
            GesturePhase::Pressed { source, .. } | GesturePhase::Dragging { source, .. } => {
                Some(source)
            }
        }
    }
}

impl<K: Clone, A: Affordance> GestureRecognizer<K, A> {
    /// Pointer went down on `source`.
    ///
    /// Arms a gesture and asks the host to stop propagation. While a gesture
    /// is already armed or active the event is ignored, so enclosing
    /// draggables do not steal a press that an inner one already took.
    pub fn pointer_down(&mut self, source: K, position: Point) -> Propagation {
        if !self.is_idle() {
            return Propagation::Continue;
        }
        self.phase = GesturePhase::Pressed {
            source,
            origin: position,
        };
        Propagation::Stop
    }

    /// Pointer moved.
    pub fn pointer_move(&mut self, position: Point) -> Vec<GestureEvent<K>> {
        match &self.phase {
            GesturePhase::Idle => Vec::new(),
            GesturePhase::Pressed { source, origin } => {
                if (position - *origin).hypot() < self.config.drag_threshold {
                    return Vec::new();
                }
                let (source, origin) = (source.clone(), *origin);
                self.phase = GesturePhase::Dragging {
                    source: source.clone(),
                    origin,
                };
                self.affordance.apply();
                vec![
                    GestureEvent::Start {
                        source: source.clone(),
                        origin,
                        position,
                    },
                    GestureEvent::Move { source, position },
                ]
            }
            GesturePhase::Dragging { source, .. } => vec![GestureEvent::Move {
                source: source.clone(),
                position,
            }],
        }
    }

    /// Pointer released. Emits `End` only if a drag was active.
    pub fn pointer_up(&mut self, position: Point) -> Vec<GestureEvent<K>> {
        self.finish(Some(position))
    }

    /// Abort the gesture (for example when the dragged element goes away).
    ///
    /// Emits `End` with no position if a drag was active; a pending press is
    /// simply discarded.
    pub fn cancel(&mut self) -> Vec<GestureEvent<K>> {
        self.finish(None)
    }

    fn finish(&mut self, position: Option<Point>) -> Vec<GestureEvent<K>> {
        match core::mem::replace(&mut self.phase, GesturePhase::Idle) {
            GesturePhase::Dragging { source, .. } => {
                self.affordance.remove();
                vec![GestureEvent::End { source, position }]
            }
            GesturePhase::Idle | GesturePhase::Pressed { .. } => Vec::new(),
        }
    }
}

impl<K, A: Affordance> Drop for GestureRecognizer<K, A> {
    fn drop(&mut self) {
        if matches!(self.phase, GesturePhase::Dragging { .. }) {
            self.affordance.remove();
        }
    }
}
