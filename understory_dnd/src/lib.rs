// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory DnD: headless drag-and-drop target resolution.
//!
//! ## Overview
//!
//! This crate decides which registered participant a dragged element is
//! "over" while the pointer moves. It does no rendering and owns no
//! application data: the host registers participants with a kind, an accept
//! list, optional child ids and a [`BoundsProvider`](crate::types::BoundsProvider),
//! forwards pointer events, and reacts to the resulting drag-over
//! notifications by reordering its own model.
//!
//! ## Resolution
//!
//! Every pointer move during a drag runs [`resolve`](crate::resolve::resolve):
//!
//! - Only participants whose accept list contains the source's kind are candidates.
//! - A candidate containing the pointer (edges inclusive) beats any nearer
//!   center. Among several containing candidates the innermost wins (a leaf
//!   over its container); only peers fall back to the earliest registration.
//! - Otherwise the candidate with the nearest center wins; equal distances go
//!   to the earliest registration.
//! - Containers narrow the result to their closest child, except when a
//!   child of another kind is dragged into a container that does not list it.
//! - Between two same-kind participants of different size, a threshold at
//!   half their combined extent keeps the choice stable
//!   ([`geometry`](crate::geometry)).
//!
//! ## Workflow
//!
//! 1) Create a [`DndRoot`](crate::root::DndRoot) per independent area.
//! 2) Register participants; keep the [`Sortable`](crate::root::Sortable)
//!    handles and call [`dispose`](crate::root::Sortable::dispose) on unmount.
//! 3) Forward pointer down/move/up. The first move after a press starts the
//!    drag; later moves update the [`DragSession`](crate::session::DragSession).
//! 4) Observe with [`on_drag_over`](crate::root::DndRoot::on_drag_over) and apply
//!    the move with the [`reorder`](crate::reorder) helpers, then register the
//!    participants again.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use kurbo::{Point, Rect};
//! use understory_dnd::reorder::move_item;
//! use understory_dnd::root::{DndConfig, DndRoot};
//! use understory_dnd::types::DragSpec;
//!
//! let root: DndRoot<u32> = DndRoot::new(DndConfig::default());
//! let spec = || DragSpec::new("item").accepts(["item"]);
//! let a = root.register(1, spec(), Rc::new(Rect::new(0.0, 0.0, 100.0, 50.0)));
//! let _b = root.register(2, spec(), Rc::new(Rect::new(0.0, 50.0, 100.0, 100.0)));
//!
//! let order = Rc::new(RefCell::new(vec![1, 2]));
//! let model = order.clone();
//! let _monitor = root.on_drag_over(move |over| {
//!     let mut list = model.borrow_mut();
//!     move_item(&mut *list, |k| k, over.source.id(), over.target.id()).unwrap();
//! });
//!
//! a.pointer_down(Point::new(50.0, 25.0)).unwrap();
//! root.pointer_move(Point::new(50.0, 75.0)).unwrap();
//! assert!(root.is_dragging(&1));
//! root.pointer_up(Point::new(50.0, 75.0));
//! assert_eq!(*order.borrow(), [2, 1]);
//! ```
//!
//! ## Logging
//!
//! Registration, session transitions and resolution failures emit `tracing`
//! events at `debug`/`trace`/`warn`. Install any subscriber to see them.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod debug;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod registry;
pub mod reorder;
pub mod resolve;
pub mod root;
pub mod session;
pub mod types;
