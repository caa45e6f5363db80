// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A board of columns holding items.
//!
//! Items move within and across columns, columns reorder among themselves.
//! Every commit re-registers the columns with their new item lists and
//! re-lays out the board.
//!
//! Run:
//! - `RUST_LOG=understory_dnd=debug cargo run -p understory_dnd_demos --example nested_columns`

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_dnd::reorder::{Group, move_between_groups, move_item};
use understory_dnd::root::{DndConfig, DndRoot, Sortable};
use understory_dnd::types::{DragKind, DragOver, DragSpec};

const COLUMN: DragKind = DragKind::new("column");
const ITEM_HEIGHT: f64 = 30.0;
const COLUMN_WIDTH: f64 = 150.0;
const HEADER: f64 = 40.0;
const FOOTER: f64 = 100.0;

/// Board state plus one live rectangle per participant.
struct Board {
    columns: RefCell<Vec<Group<u32>>>,
    rects: RefCell<BTreeMap<u32, Rc<Cell<Rect>>>>,
}

impl Board {
    fn rect(&self, id: u32) -> Rc<Cell<Rect>> {
        self.rects
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| Rc::new(Cell::new(Rect::ZERO)))
            .clone()
    }

    /// Columns left to right; items stacked under a header, with room below.
    fn layout(&self) {
        for (c, column) in self.columns.borrow().iter().enumerate() {
            let x = c as f64 * (COLUMN_WIDTH + 10.0);
            let height = HEADER + column.items.len() as f64 * ITEM_HEIGHT + FOOTER;
            self.rect(column.id)
                .set(Rect::new(x, 0.0, x + COLUMN_WIDTH, height));
            for (i, item) in column.items.iter().enumerate() {
                let y = HEADER + i as f64 * ITEM_HEIGHT;
                self.rect(*item)
                    .set(Rect::new(x + 10.0, y, x + COLUMN_WIDTH - 10.0, y + ITEM_HEIGHT));
            }
        }
    }

    fn register_columns(&self, root: &DndRoot<u32>) -> BTreeMap<u32, Sortable<u32>> {
        self.columns
            .borrow()
            .iter()
            .map(|column| {
                let handle = root.register(
                    column.id,
                    DragSpec::new(COLUMN)
                        .accepts(["column", "item"])
                        .with_items(column.items.iter().copied()),
                    self.rect(column.id),
                );
                (column.id, handle)
            })
            .collect()
    }

    fn commit(&self, over: &DragOver<u32>) -> bool {
        let (source, target) = (over.source.id(), over.target.id());
        let result = if *over.source.kind() == COLUMN {
            move_item(&mut *self.columns.borrow_mut(), |g: &Group<u32>| &g.id, source, target)
        } else {
            move_between_groups(&mut self.columns.borrow_mut()[..], source, target)
        };
        match result {
            Ok(moved) => moved,
            Err(err) => {
                tracing::warn!(%err, ?source, ?target, "commit rejected");
                false
            }
        }
    }

    fn print(&self) {
        for column in self.columns.borrow().iter() {
            println!("  column {:>3}: {:?}", column.id, column.items);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,understory_dnd=debug".into()),
        )
        .init();

    let board = Rc::new(Board {
        columns: RefCell::new(vec![
            Group::new(100, vec![1, 2, 3]),
            Group::new(200, vec![4]),
            Group::new(300, vec![]),
        ]),
        rects: RefCell::new(BTreeMap::new()),
    });
    board.layout();

    let root: DndRoot<u32> = DndRoot::new(DndConfig::default());
    let columns = board.register_columns(&root);
    let items: BTreeMap<u32, _> = [1, 2, 3, 4]
        .into_iter()
        .map(|id| {
            let handle = root.register(id, DragSpec::new("item").accepts(["item"]), board.rect(id));
            (id, handle)
        })
        .collect();

    let committer = board.clone();
    let registrar = root.clone();
    let _monitor = root.on_drag_over(move |over| {
        if committer.commit(over) {
            committer.layout();
            // Presses only need the id, so the first set of handles stays usable.
            let _ = committer.register_columns(&registrar);
        }
    });

    let drag = |press: Point, path: &[Point]| {
        for point in path {
            if let Err(err) = root.pointer_move(*point) {
                tracing::error!(%err, "resolution failed");
            }
        }
        let end = path.last().copied().unwrap_or(press);
        root.pointer_up(end);
    };

    println!("initial:");
    board.print();

    // Item 2 into the empty third column.
    let press = Point::new(75.0, HEADER + ITEM_HEIGHT * 1.5);
    items[&2].pointer_down(press).expect("root is alive");
    drag(press, &[Point::new(100.0, 60.0), Point::new(400.0, 100.0)]);
    println!("after moving item 2 to column 300:");
    board.print();

    // Item 4 up to the top of the first column.
    let press = Point::new(235.0, HEADER + ITEM_HEIGHT * 0.5);
    items[&4].pointer_down(press).expect("root is alive");
    drag(press, &[Point::new(200.0, 50.0), Point::new(75.0, HEADER + 5.0)]);
    println!("after moving item 4 into column 100:");
    board.print();

    // The first column past the second, grabbed by its header.
    let press = Point::new(75.0, 10.0);
    columns[&100].pointer_down(press).expect("root is alive");
    drag(press, &[Point::new(120.0, 10.0), Point::new(240.0, 10.0)]);
    println!("after moving column 100 right:");
    board.print();
}
