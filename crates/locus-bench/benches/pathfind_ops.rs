//! Criterion micro-benchmarks for hex A*.

use criterion::{criterion_group, criterion_main, Criterion};
use locus_bench::hex_obstacles;
use locus_core::CubeCoordinate;
use locus_grid::{HexGrid, HexGridConfig, HexPathFinder, PathFinder};
use std::collections::HashSet;
use std::hint::black_box;

/// Benchmark: straight run of 30 steps on an open field.
fn bench_astar_open(c: &mut Criterion) {
    let finder = HexPathFinder::new();
    let goal = CubeCoordinate::from_xz(30, -15);
    let blocked = HashSet::new();

    c.bench_function("astar_open_30", |b| {
        b.iter(|| black_box(finder.find_path(CubeCoordinate::ORIGIN, goal, &blocked)));
    });
}

/// Benchmark: 20 steps through a 30% obstacle field, unbounded.
fn bench_astar_obstacles(c: &mut Criterion) {
    let finder = HexPathFinder::new();
    let mut blocked = hex_obstacles(25, 300, 42);
    let goal = CubeCoordinate::from_xz(20, -10);
    blocked.remove(&goal);

    c.bench_function("astar_obstacles_30pct", |b| {
        b.iter(|| black_box(finder.find_path(CubeCoordinate::ORIGIN, goal, &blocked)));
    });
}

/// Benchmark: corner to corner inside a bounded 40x40 grid.
fn bench_astar_bounded(c: &mut Criterion) {
    let finder = HexPathFinder::within(HexGrid::new(HexGridConfig::new(40.0, 40.0)));
    let goal = CubeCoordinate::from_xz(39, 20);
    let blocked = HashSet::new();

    c.bench_function("astar_bounded_40x40", |b| {
        b.iter(|| black_box(finder.find_path(CubeCoordinate::from_xz(0, 0), goal, &blocked)));
    });
}

criterion_group!(benches, bench_astar_open, bench_astar_obstacles, bench_astar_bounded);
criterion_main!(benches);
