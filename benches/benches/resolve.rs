// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_dnd::registry::Registry;
use understory_dnd::resolve::resolve;
use understory_dnd::root::{DndConfig, DndRoot};
use understory_dnd::types::{DragSpec, Draggable};

const CELL: f64 = 20.0;

fn item_spec() -> DragSpec<u32> {
    DragSpec::new("item").accepts(["item"])
}

fn cell_rect(x: usize, y: usize) -> Rect {
    let (x0, y0) = (x as f64 * CELL, y as f64 * CELL);
    Rect::new(x0, y0, x0 + CELL, y0 + CELL)
}

/// `n * n` leaf items on a grid.
fn grid_registry(n: usize) -> Registry<u32> {
    let mut reg = Registry::new();
    for y in 0..n {
        for x in 0..n {
            let id = (y * n + x) as u32;
            let _ = reg.register(Draggable::new(id, item_spec(), Rc::new(cell_rect(x, y))), None);
        }
    }
    reg
}

/// `n` columns of `n` items each; columns are registered last.
fn column_registry(n: usize) -> Registry<u32> {
    let mut reg = grid_registry(n);
    for x in 0..n {
        let items = (0..n).map(|y| (y * n + x) as u32);
        let id = (n * n + x) as u32;
        let rect = Rect::new(x as f64 * CELL, 0.0, (x + 1) as f64 * CELL, n as f64 * CELL);
        let spec = DragSpec::new("column")
            .accepts(["item", "column"])
            .with_items(items);
        let _ = reg.register(Draggable::new(id, spec, Rc::new(rect)), None);
    }
    reg
}

fn bench_resolve_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_grid");
    for &n in &[8_usize, 32, 64] {
        let reg = grid_registry(n);
        let source = Rc::clone(reg.get(&0).unwrap());
        let extent = n as f64 * CELL;
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("inside_n{}", n), |b| {
            let p = Point::new(extent * 0.6, extent * 0.4);
            b.iter(|| black_box(resolve(black_box(p), &source, &reg).unwrap()));
        });
        group.bench_function(format!("outside_n{}", n), |b| {
            let p = Point::new(extent + 50.0, extent * 0.5);
            b.iter(|| black_box(resolve(black_box(p), &source, &reg).unwrap()));
        });
    }
    group.finish();
}

fn bench_resolve_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_columns");
    for &n in &[8_usize, 32] {
        let reg = column_registry(n);
        let source = Rc::clone(reg.get(&0).unwrap());
        group.throughput(Throughput::Elements((n * n + n) as u64));
        group.bench_function(format!("column_padding_n{}", n), |b| {
            // Between two items of the last column.
            let p = Point::new((n as f64 - 0.5) * CELL, n as f64 * CELL * 0.5);
            b.iter(|| black_box(resolve(black_box(p), &source, &reg).unwrap()));
        });
    }
    group.finish();
}

fn bench_root_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("root_drag");
    let n = 32_usize;
    let path: Vec<Point> = (0..64)
        .map(|i| Point::new(i as f64 * 10.0, (i % 7) as f64 * 40.0))
        .collect();
    group.throughput(Throughput::Elements(path.len() as u64));
    group.bench_function("drag_path_n32", |b| {
        b.iter_batched(
            || {
                let root: DndRoot<u32> = DndRoot::new(DndConfig::default());
                let handles: Vec<_> = (0..n * n)
                    .map(|i| {
                        root.register(i as u32, item_spec(), Rc::new(cell_rect(i % n, i / n)))
                    })
                    .collect();
                (root, handles)
            },
            |(root, handles)| {
                handles[0].pointer_down(Point::new(1.0, 1.0)).unwrap();
                for p in &path {
                    root.pointer_move(*p).unwrap();
                }
                black_box(root.pointer_up(Point::ZERO));
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_resolve_grid,
    bench_resolve_columns,
    bench_root_drag
);
criterion_main!(benches);
