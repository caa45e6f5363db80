// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop-target resolution.
//!
//! ## Algorithm
//!
//! 1. Among registered draggables that accept the source's kind, the innermost
//!    containment hit wins; otherwise the nearest center wins
//!    ([`closest_target`]).
//! 2. A leaf candidate goes straight to size-mismatch resolution.
//! 3. A container that does not list the source, when the source is of a
//!    different kind than the container, is returned as is: the source is being
//!    dropped into a foreign or empty container.
//! 4. Otherwise the search narrows to the container's items
//!    ([`closest_item`]); a found child replaces the container.
//! 5. Size-mismatch resolution between the source and the final candidate
//!    ([`resolve_size_mismatch`]).
//!
//! ## Ties
//!
//! Containment outranks distance. Among several containing candidates the
//! innermost wins: a leaf beats a container, and a rectangle enclosed by
//! another containing rectangle beats the enclosing one. Only peers fall back
//! to the earliest registration, as do equal distances. Among a container's
//! items, list order decides.
//!
//! Item ids without a live registration are skipped; they are expected while
//! a container re-renders mid-drag.

use alloc::rc::Rc;

use kurbo::{Point, Rect};

use crate::error::DndError;
use crate::geometry::{center_distance, point_in_rect, resolve_size_mismatch};
use crate::registry::Registry;
use crate::types::{DragKind, Draggable};

/// Resolve the drop target for `source` at `pointer`.
///
/// The result may be `source` itself, which callers treat as "no move".
pub fn resolve<K: Ord>(
    pointer: Point,
    source: &Rc<Draggable<K>>,
    registry: &Registry<K>,
) -> Result<Rc<Draggable<K>>, DndError> {
    let candidate = closest_target(pointer, source.kind(), registry).ok_or_else(|| {
        DndError::NoAcceptingTarget {
            kind: source.kind().clone(),
        }
    })?;

    let target = match candidate.items() {
        None => Rc::clone(&candidate),
        Some(items) if !items.contains(source.id()) && source.kind() != candidate.kind() => {
            return Ok(Rc::clone(&candidate));
        }
        Some(items) => closest_item(pointer, source.kind(), items, registry)
            .unwrap_or_else(|| Rc::clone(&candidate)),
    };

    Ok(resolve_size_mismatch(pointer, source, &target))
}

/// Best registry-wide candidate accepting `kind`: innermost containment first, then nearest center.
pub fn closest_target<K: Ord>(
    pointer: Point,
    kind: &DragKind,
    registry: &Registry<K>,
) -> Option<Rc<Draggable<K>>> {
    let mut hit: Option<(u64, Rect, &Rc<Draggable<K>>)> = None;
    let mut nearest: Option<(f64, u64, &Rc<Draggable<K>>)> = None;

    for (seq, draggable) in registry.sequenced() {
        if !draggable.accepts(kind) {
            continue;
        }
        let rect = draggable.bounds();
        if point_in_rect(rect, pointer) {
            let better = match hit {
                None => true,
                Some((best_seq, best_rect, best)) => {
                    nested_in(rect, draggable, best_rect, best)
                        || (!nested_in(best_rect, best, rect, draggable) && seq < best_seq)
                }
            };
            if better {
                hit = Some((seq, rect, draggable));
            }
            continue;
        }
        if hit.is_some() {
            continue;
        }
        let dist = center_distance(rect, pointer);
        let better = match nearest {
            None => true,
            Some((best, best_seq, _)) => dist < best || (dist == best && seq < best_seq),
        };
        if better {
            nearest = Some((dist, seq, draggable));
        }
    }

    hit.map(|(_, _, d)| d)
        .or(nearest.map(|(_, _, d)| d))
        .map(Rc::clone)
}

/// Whether `a` sits inside `b`: a leaf within a container, or, between two
/// leaves or two containers, a strictly smaller rectangle enclosed by the other.
fn nested_in<K>(a: Rect, a_desc: &Draggable<K>, b: Rect, b_desc: &Draggable<K>) -> bool {
    if !a_desc.is_container() && b_desc.is_container() {
        return true;
    }
    if a_desc.is_container() != b_desc.is_container() {
        return false;
    }
    let (a, b) = (a.abs(), b.abs());
    a != b && b.x0 <= a.x0 && a.x1 <= b.x1 && b.y0 <= a.y0 && a.y1 <= b.y1
}

/// Best child among `items` accepting `kind`: first containing child, else nearest center.
///
/// Returns `None` when no listed child is registered and accepting.
pub fn closest_item<K: Ord>(
    pointer: Point,
    kind: &DragKind,
    items: &[K],
    registry: &Registry<K>,
) -> Option<Rc<Draggable<K>>> {
    let mut nearest: Option<(f64, &Rc<Draggable<K>>)> = None;
    for id in items {
        let Some(item) = registry.get(id) else {
            continue;
        };
        if !item.accepts(kind) {
            continue;
        }
        let rect = item.bounds();
        if point_in_rect(rect, pointer) {
            return Some(Rc::clone(item));
        }
        let dist = center_distance(rect, pointer);
        if nearest.is_none_or(|(best, _)| dist < best) {
            nearest = Some((dist, item));
        }
    }
    nearest.map(|(_, item)| Rc::clone(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DragSpec;
    use alloc::vec::Vec;
    use kurbo::Rect;

    fn add(reg: &mut Registry<u32>, id: u32, spec: DragSpec<u32>, rect: Rect) -> Rc<Draggable<u32>> {
        let _ = reg.register(Draggable::new(id, spec, Rc::new(rect)), None);
        Rc::clone(reg.get(&id).unwrap())
    }

    fn item_spec() -> DragSpec<u32> {
        DragSpec::new("item").accepts(["item"])
    }

    fn column_spec(items: impl IntoIterator<Item = u32>) -> DragSpec<u32> {
        DragSpec::new("column")
            .accepts(["column", "item"])
            .with_items(items)
    }

    #[test]
    fn containment_beats_a_nearer_center() {
        let mut reg = Registry::new();
        let source = add(&mut reg, 1, item_spec(), Rect::new(0.0, 200.0, 100.0, 300.0));
        let tall = add(&mut reg, 2, item_spec(), Rect::new(0.0, 0.0, 100.0, 100.0));
        let _short = add(&mut reg, 3, item_spec(), Rect::new(0.0, 100.0, 100.0, 110.0));
        // (50, 95) is inside `tall` but nearer the center of `short`.
        let got = closest_target(Point::new(50.0, 95.0), source.kind(), &reg).unwrap();
        assert!(Rc::ptr_eq(&got, &tall));
    }

    #[test]
    fn innermost_hit_wins_regardless_of_registration_order() {
        let source = Rc::new(Draggable::new(
            100,
            item_spec(),
            Rc::new(Rect::new(10.0, 10.0, 90.0, 40.0)),
        ));
        let pointer = Point::new(170.0, 25.0);

        let mut columns_first = Registry::new();
        let _col = add(&mut columns_first, 20, column_spec([3]), Rect::new(120.0, 0.0, 220.0, 300.0));
        let leaf = add(&mut columns_first, 3, item_spec(), Rect::new(130.0, 10.0, 210.0, 40.0));
        let got = closest_target(pointer, source.kind(), &columns_first).unwrap();
        assert!(Rc::ptr_eq(&got, &leaf));

        let mut items_first = Registry::new();
        let leaf = add(&mut items_first, 3, item_spec(), Rect::new(130.0, 10.0, 210.0, 40.0));
        let _col = add(&mut items_first, 20, column_spec([3]), Rect::new(120.0, 0.0, 220.0, 300.0));
        let got = closest_target(pointer, source.kind(), &items_first).unwrap();
        assert!(Rc::ptr_eq(&got, &leaf));
    }

    #[test]
    fn enclosed_container_beats_its_enclosing_container() {
        let mut reg = Registry::new();
        let _outer = add(&mut reg, 1, column_spec([]), Rect::new(0.0, 0.0, 300.0, 300.0));
        let inner = add(&mut reg, 2, column_spec([]), Rect::new(50.0, 50.0, 150.0, 150.0));
        let got = closest_target(Point::new(100.0, 100.0), &DragKind::new("item"), &reg).unwrap();
        assert!(Rc::ptr_eq(&got, &inner));
    }

    #[test]
    fn nearest_center_when_outside_everything() {
        let mut reg = Registry::new();
        let source = add(&mut reg, 1, item_spec(), Rect::new(0.0, 0.0, 10.0, 10.0));
        let _a = add(&mut reg, 2, item_spec(), Rect::new(100.0, 0.0, 110.0, 10.0));
        let b = add(&mut reg, 3, item_spec(), Rect::new(0.0, 100.0, 10.0, 110.0));
        let got = closest_target(Point::new(5.0, 60.0), source.kind(), &reg).unwrap();
        assert!(Rc::ptr_eq(&got, &b));
    }

    #[test]
    fn equal_distances_prefer_the_earliest_registration() {
        let mut reg = Registry::new();
        let first = add(&mut reg, 9, item_spec(), Rect::new(0.0, 0.0, 10.0, 10.0));
        let _second = add(&mut reg, 1, item_spec(), Rect::new(20.0, 0.0, 30.0, 10.0));
        let got = closest_target(Point::new(15.0, 5.0), first.kind(), &reg).unwrap();
        assert!(Rc::ptr_eq(&got, &first));
    }

    #[test]
    fn non_accepting_draggables_are_never_returned() {
        let mut reg = Registry::new();
        let source = Rc::new(Draggable::new(
            100,
            DragSpec::new("card"),
            Rc::new(Rect::new(0.0, 0.0, 10.0, 10.0)),
        ));
        let _wall = add(&mut reg, 1, DragSpec::new("wall"), Rect::new(0.0, 0.0, 50.0, 50.0));
        let slot = add(
            &mut reg,
            2,
            DragSpec::new("slot").accepts(["card"]),
            Rect::new(500.0, 500.0, 510.0, 510.0),
        );
        let got = resolve(Point::new(25.0, 25.0), &source, &reg).unwrap();
        assert!(Rc::ptr_eq(&got, &slot));
    }

    #[test]
    fn no_accepting_draggable_is_an_error() {
        let mut reg = Registry::new();
        let source = add(&mut reg, 1, DragSpec::new("item"), Rect::new(0.0, 0.0, 10.0, 10.0));
        let err = resolve(Point::new(5.0, 5.0), &source, &reg).unwrap_err();
        assert_eq!(
            err,
            DndError::NoAcceptingTarget {
                kind: DragKind::new("item")
            }
        );
    }

    // A child dragged over a foreign column lands on the column itself.
    #[test]
    fn foreign_container_is_returned_directly() {
        let mut reg = Registry::new();
        let _home = add(&mut reg, 10, column_spec([1]), Rect::new(0.0, 0.0, 100.0, 300.0));
        let source = add(&mut reg, 1, item_spec(), Rect::new(10.0, 10.0, 90.0, 40.0));
        let _other_item = add(&mut reg, 2, item_spec(), Rect::new(210.0, 10.0, 290.0, 40.0));
        let away = add(&mut reg, 20, column_spec([2]), Rect::new(200.0, 0.0, 300.0, 300.0));
        // Inside `away`, below its only item.
        let got = resolve(Point::new(250.0, 250.0), &source, &reg).unwrap();
        assert!(Rc::ptr_eq(&got, &away));
    }

    #[test]
    fn own_container_narrows_to_children() {
        let mut reg = Registry::new();
        let source = add(&mut reg, 1, item_spec(), Rect::new(10.0, 10.0, 90.0, 40.0));
        let sibling = add(&mut reg, 2, item_spec(), Rect::new(10.0, 50.0, 90.0, 80.0));
        let _col = add(&mut reg, 10, column_spec([1, 2]), Rect::new(0.0, 0.0, 100.0, 300.0));
        // Column padding below the items: nearest child is `sibling`.
        let got = resolve(Point::new(50.0, 200.0), &source, &reg).unwrap();
        assert!(Rc::ptr_eq(&got, &sibling));
    }

    #[test]
    fn column_dragged_over_column_keeps_the_column() {
        let mut reg = Registry::new();
        let _i1 = add(&mut reg, 1, item_spec(), Rect::new(10.0, 10.0, 90.0, 40.0));
        let _i2 = add(&mut reg, 2, item_spec(), Rect::new(110.0, 10.0, 190.0, 40.0));
        let source = add(&mut reg, 10, column_spec([1]), Rect::new(0.0, 0.0, 100.0, 300.0));
        let other = add(&mut reg, 20, column_spec([2]), Rect::new(100.0, 0.0, 200.0, 300.0));
        // Items do not accept columns, so narrowing finds nothing.
        let got = resolve(Point::new(150.0, 150.0), &source, &reg).unwrap();
        assert!(Rc::ptr_eq(&got, &other));
    }

    #[test]
    fn missing_children_are_skipped() {
        let mut reg = Registry::new();
        let source = add(&mut reg, 1, item_spec(), Rect::new(10.0, 10.0, 90.0, 40.0));
        let y = add(&mut reg, 3, item_spec(), Rect::new(10.0, 100.0, 90.0, 130.0));
        // Child 2 is listed but not registered.
        let got = closest_item(Point::new(50.0, 60.0), source.kind(), &[2, 3], &reg).unwrap();
        assert!(Rc::ptr_eq(&got, &y));
    }

    #[test]
    fn first_containing_child_short_circuits() {
        let mut reg = Registry::new();
        let a = add(&mut reg, 1, item_spec(), Rect::new(0.0, 0.0, 100.0, 100.0));
        let _b = add(&mut reg, 2, item_spec(), Rect::new(0.0, 0.0, 100.0, 100.0));
        let got = closest_item(Point::new(50.0, 50.0), a.kind(), &[1, 2], &reg).unwrap();
        assert!(Rc::ptr_eq(&got, &a));
        let got = closest_item(Point::new(50.0, 50.0), a.kind(), &[2, 1], &reg).unwrap();
        assert_eq!(*got.id(), 2);
    }

    #[test]
    fn empty_item_list_yields_nothing() {
        let reg: Registry<u32> = Registry::new();
        let items: Vec<u32> = Vec::new();
        assert!(closest_item(Point::ZERO, &DragKind::new("item"), &items, &reg).is_none());
    }
}
