//! Criterion micro-benchmarks for grid queries.

use criterion::{criterion_group, criterion_main, Criterion};
use locus_core::Position;
use locus_grid::{
    GridlessConfig, GridlessGrid, Grid, HexGrid, HexGridConfig, SquareGrid, SquareGridConfig,
};
use std::hint::black_box;

/// Benchmark: neighbors() on every cell of a 100x100 square grid.
fn bench_neighbors_square_10k(c: &mut Criterion) {
    let grid = SquareGrid::new(SquareGridConfig::new(100.0, 100.0));

    c.bench_function("neighbors_square_10k", |b| {
        b.iter(|| {
            for y in 0..100 {
                for x in 0..100 {
                    black_box(grid.neighbors(Position::new(x as f64, y as f64)));
                }
            }
        });
    });
}

/// Benchmark: neighbors() on every cell of a 100x100 hex grid.
fn bench_neighbors_hex_10k(c: &mut Criterion) {
    let grid = HexGrid::new(HexGridConfig::new(100.0, 100.0));

    c.bench_function("neighbors_hex_10k", |b| {
        b.iter(|| {
            for y in 0..100 {
                for x in 0..100 {
                    black_box(grid.neighbors(Position::new(x as f64, y as f64)));
                }
            }
        });
    });
}

/// Benchmark: hex line of sight across the grid diagonal.
fn bench_line_of_sight_hex(c: &mut Criterion) {
    let grid = HexGrid::new(HexGridConfig::new(100.0, 100.0));

    c.bench_function("line_of_sight_hex_diagonal", |b| {
        b.iter(|| black_box(grid.line_of_sight(Position::new(0.0, 0.0), Position::new(60.0, 30.0))));
    });
}

/// Benchmark: hex spiral of radius 10 (331 cells).
fn bench_spiral_hex(c: &mut Criterion) {
    let grid = HexGrid::new(HexGridConfig::new(100.0, 100.0));

    c.bench_function("spiral_hex_r10", |b| {
        b.iter(|| black_box(grid.spiral(Position::new(50.0, 25.0), 10)));
    });
}

/// Benchmark: sampled range query in a 100x100 gridless room.
fn bench_range_gridless(c: &mut Criterion) {
    let grid = GridlessGrid::new(GridlessConfig::new(100.0, 100.0));

    c.bench_function("range_gridless_r5", |b| {
        b.iter(|| black_box(grid.positions_in_range(Position::new(50.0, 50.0), 5.0)));
    });
}

criterion_group!(
    benches,
    bench_neighbors_square_10k,
    bench_neighbors_hex_10k,
    bench_line_of_sight_hex,
    bench_spiral_hex,
    bench_range_gridless
);
criterion_main!(benches);
