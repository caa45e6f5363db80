// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for target resolution and the session store.
//!
//! 1. A containing candidate always beats a non-containing one.
//! 2. Without containment the result has the minimal center distance.
//! 3. Resolution never returns a descriptor that rejects the source's kind.
//! 4. Size-mismatch picks flip at most once along the comparison axis.
//! 5. Updating the session with its current fields never notifies.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use proptest::prelude::*;
use understory_dnd::geometry::{Pick, center_distance, point_in_rect, size_mismatch_pick};
use understory_dnd::registry::Registry;
use understory_dnd::resolve::{closest_target, resolve};
use understory_dnd::session::{SessionPatch, SessionStore};
use understory_dnd::types::{DragKind, DragSpec, Draggable};

// ── Strategies ──────────────────────────────────────────────────────────

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0.0..500.0_f64, 0.0..500.0_f64, 1.0..120.0_f64, 1.0..120.0_f64)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, x + w, y + h))
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (-50.0..650.0_f64, -50.0..650.0_f64).prop_map(|(x, y)| Point::new(x, y))
}

/// Rectangles tagged with whether they accept `"item"`.
fn layout_strategy() -> impl Strategy<Value = Vec<(Rect, bool)>> {
    prop::collection::vec((rect_strategy(), any::<bool>()), 1..24)
}

fn build(layout: &[(Rect, bool)]) -> Registry<u32> {
    let mut reg = Registry::new();
    for (i, (rect, accepts)) in layout.iter().enumerate() {
        let spec = if *accepts {
            DragSpec::new("item").accepts(["item"])
        } else {
            DragSpec::new("item").accepts(["column"])
        };
        let _ = reg.register(Draggable::new(i as u32, spec, Rc::new(*rect)), None);
    }
    reg
}

fn outside_source() -> Rc<Draggable<u32>> {
    // A kind no generated layout accepts.
    Rc::new(Draggable::new(
        u32::MAX,
        DragSpec::new("card"),
        Rc::new(Rect::new(-1000.0, -1000.0, -990.0, -990.0)),
    ))
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn containment_takes_precedence(layout in layout_strategy(), pointer in point_strategy()) {
        let reg = build(&layout);
        let kind = DragKind::new("item");
        let any_hit = layout
            .iter()
            .any(|(r, accepts)| *accepts && point_in_rect(*r, pointer));
        if let Some(found) = closest_target(pointer, &kind, &reg) {
            prop_assert_eq!(point_in_rect(found.bounds(), pointer), any_hit);
        }
    }

    #[test]
    fn fallback_is_the_nearest_center(layout in layout_strategy(), pointer in point_strategy()) {
        let reg = build(&layout);
        let kind = DragKind::new("item");
        let accepting: Vec<Rect> = layout
            .iter()
            .filter(|(_, accepts)| *accepts)
            .map(|(r, _)| *r)
            .collect();
        prop_assume!(!accepting.is_empty());
        prop_assume!(!accepting.iter().any(|r| point_in_rect(*r, pointer)));

        let found = closest_target(pointer, &kind, &reg).unwrap();
        let best = accepting
            .iter()
            .map(|r| center_distance(*r, pointer))
            .fold(f64::INFINITY, f64::min);
        prop_assert_eq!(center_distance(found.bounds(), pointer), best);
    }

    #[test]
    fn only_accepting_targets_are_resolved(layout in layout_strategy(), pointer in point_strategy()) {
        let reg = build(&layout);
        let source = Rc::new(Draggable::new(
            u32::MAX,
            DragSpec::new("item"),
            Rc::new(Rect::new(0.0, 0.0, 10.0, 10.0)),
        ));
        let any_accepting = layout.iter().any(|(_, accepts)| *accepts);
        match resolve(pointer, &source, &reg) {
            Ok(target) => {
                prop_assert!(any_accepting);
                prop_assert!(target.id() == source.id() || target.accepts(source.kind()));
            }
            Err(_) => prop_assert!(!any_accepting),
        }
    }

    #[test]
    fn unaccepted_kind_never_resolves(
        layout in layout_strategy(),
        pointer in point_strategy(),
    ) {
        let reg = build(&layout);
        let source = outside_source();
        prop_assert!(resolve(pointer, &source, &reg).is_err());
    }

    #[test]
    fn size_mismatch_is_monotonic(
        lead in 0.0..200.0_f64,
        a_size in 1.0..150.0_f64,
        b_size in 1.0..150.0_f64,
        steps in 2usize..64,
    ) {
        prop_assume!(a_size != b_size);
        let a = Rect::new(0.0, lead, 100.0, lead + a_size);
        let b = Rect::new(0.0, lead + a_size, 100.0, lead + a_size + b_size);
        let end = lead + a_size + b_size;
        let mut flips = 0;
        let mut last: Option<Pick> = None;
        for i in 0..=steps {
            let y = lead + (end - lead) * (i as f64) / (steps as f64);
            let pick = size_mismatch_pick(Point::new(50.0, y), a, b);
            if last.is_some_and(|l| l != pick) {
                flips += 1;
            }
            last = Some(pick);
        }
        prop_assert!(flips <= 1);
    }

    #[test]
    fn repeating_the_current_fields_is_silent(switches in prop::collection::vec(0usize..3, 1..16)) {
        let pool: Vec<Rc<Draggable<u32>>> = (0..3)
            .map(|i| Rc::new(Draggable::new(i, DragSpec::new("item"), Rc::new(Rect::ZERO))))
            .collect();
        let store = SessionStore::new();
        let hits = Rc::new(Cell::new(0_u32));
        let h = hits.clone();
        let _sub = store.subscribe(move || h.set(h.get() + 1));
        store.begin(pool[0].clone());

        for pick in switches {
            store.update(SessionPatch::new().target(Some(pool[pick].clone())));
            let before = hits.get();
            let snapshot = store.snapshot();
            let change = store.update(
                SessionPatch::new()
                    .source(snapshot.source.clone())
                    .target(snapshot.target.clone()),
            );
            prop_assert!(change.is_empty());
            prop_assert_eq!(hits.get(), before);
            prop_assert!(Rc::ptr_eq(&snapshot, &store.snapshot()));
        }
    }
}
