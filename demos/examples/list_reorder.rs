// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reorder a vertical list with rows of different heights.
//!
//! The drag-over monitor moves the row in the model and re-lays out the list,
//! so geometry changes between pointer moves the way a real host would see.
//!
//! Run:
//! - `RUST_LOG=understory_dnd=trace cargo run -p understory_dnd_demos --example list_reorder`

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_dnd::reorder::move_item;
use understory_dnd::root::{DndConfig, DndRoot};
use understory_dnd::types::DragSpec;

#[derive(Debug)]
struct Row {
    id: u32,
    height: f64,
}

/// Stack rows top to bottom and write each row's rectangle into its cell.
fn layout(rows: &[Row], cells: &[(u32, Rc<Cell<Rect>>)]) {
    let mut y = 0.0;
    for row in rows {
        if let Some((_, cell)) = cells.iter().find(|(id, _)| *id == row.id) {
            cell.set(Rect::new(0.0, y, 200.0, y + row.height));
        }
        y += row.height;
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,understory_dnd=debug".into()),
        )
        .init();

    let rows = Rc::new(RefCell::new(vec![
        Row { id: 1, height: 40.0 },
        Row { id: 2, height: 120.0 },
        Row { id: 3, height: 40.0 },
    ]));
    let cells: Rc<Vec<(u32, Rc<Cell<Rect>>)>> = Rc::new(
        rows.borrow()
            .iter()
            .map(|r| (r.id, Rc::new(Cell::new(Rect::ZERO))))
            .collect(),
    );
    layout(&rows.borrow(), &cells);

    let root: DndRoot<u32> = DndRoot::new(DndConfig::default());
    let handles: Vec<_> = cells
        .iter()
        .map(|(id, cell)| {
            root.register(
                *id,
                DragSpec::new("row").accepts(["row"]),
                cell.clone(),
            )
        })
        .collect();

    let model = rows.clone();
    let geometry = cells.clone();
    let _monitor = root.on_drag_over(move |over| {
        let mut rows = model.borrow_mut();
        match move_item(&mut *rows, |r: &Row| &r.id, over.source.id(), over.target.id()) {
            Ok(true) => {
                layout(&rows, &geometry);
                let order: Vec<u32> = rows.iter().map(|r| r.id).collect();
                tracing::info!(?order, "rows reordered");
            }
            Ok(false) => {}
            Err(err) => tracing::warn!(%err, "reorder rejected"),
        }
    });

    // Drag the first short row down through the tall one and past it.
    handles[0]
        .pointer_down(Point::new(100.0, 20.0))
        .expect("root is alive");
    for y in [30.0, 60.0, 90.0, 130.0, 170.0, 190.0] {
        if let Err(err) = root.pointer_move(Point::new(100.0, y)) {
            tracing::error!(%err, "resolution failed");
        }
        let session = root.snapshot();
        let over = session.target.as_ref().map(|t| *t.id());
        println!("pointer y={y:>5.1}  over={over:?}");
        for line in root.debug_lines(Point::new(100.0, y)) {
            let mark = if line.nearest { '*' } else { ' ' };
            println!(
                "  {mark} -> {:?} len={:>6.1} angle={:>6.1}°",
                line.id,
                line.length,
                line.angle_degrees()
            );
        }
    }
    root.pointer_up(Point::new(100.0, 190.0));

    let order: Vec<u32> = rows.borrow().iter().map(|r| r.id).collect();
    println!("final order: {order:?}");
}
