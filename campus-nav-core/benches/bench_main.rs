use std::hint::black_box;

use campus_nav_core::prelude::*;
use criterion::{Criterion, criterion_group, criterion_main};

const GRID: usize = 30;
const SPACING: f64 = 40.0;

/// Square corridor grid, the kind of mesh a large floor plan produces
fn grid_floor() -> FloorGraph {
    let id = |row: usize, col: usize| format!("n_{row}_{col}");
    let mut nodes = Vec::with_capacity(GRID * GRID);
    let mut edges = Vec::with_capacity(GRID * GRID * 2);

    for row in 0..GRID {
        for col in 0..GRID {
            nodes.push(Node::new(id(row, col), col as f64 * SPACING, row as f64 * SPACING));
            if col + 1 < GRID {
                edges.push(Edge::new(id(row, col), id(row, col + 1), SPACING));
            }
            if row + 1 < GRID {
                edges.push(Edge::new(id(row, col), id(row + 1, col), SPACING));
            }
        }
    }

    FloorGraph::new(nodes, edges)
}

fn bench_routing(c: &mut Criterion) {
    let graph = grid_floor();
    let far_corner = format!("n_{}_{}", GRID - 1, GRID - 1);
    let side = (GRID - 1) as f64 * SPACING;

    c.bench_function("astar_corner_to_corner", |b| {
        b.iter(|| find_route(black_box(&graph), black_box("n_0_0"), black_box(&far_corner)));
    });

    c.bench_function("nearest_exit_from_center", |b| {
        let center = format!("n_{}_{}", GRID / 2, GRID / 2);
        b.iter(|| nearest_exit(black_box(&graph), black_box(&center), side, side));
    });
}

criterion_group!(benches, bench_routing);
criterion_main!(benches);
