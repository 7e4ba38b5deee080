//! Criterion micro-benchmarks for room mutation and queries.

use criterion::{criterion_group, criterion_main, Criterion};
use locus_bench::populated_room;
use locus_core::{EntityId, Position};
use std::hint::black_box;

/// Benchmark: move one entity back and forth in a room of 1000.
fn bench_move_entity(c: &mut Criterion) {
    let room = populated_room(100, 1000, 42);
    let id = EntityId::from("e0");
    let home = room.entity_position(&id).unwrap_or_default();
    let away = Position::new((home.x + 1.0) % 100.0, home.y);

    c.bench_function("room_move_entity_1k", |b| {
        b.iter(|| {
            room.move_entity(&id, away).ok();
            room.move_entity(&id, home).ok();
        });
    });
}

/// Benchmark: entities_in_range over a room of 1000.
fn bench_entities_in_range(c: &mut Criterion) {
    let room = populated_room(100, 1000, 42);

    c.bench_function("room_entities_in_range_1k", |b| {
        b.iter(|| black_box(room.entities_in_range(Position::new(50.0, 50.0), 10.0)));
    });
}

/// Benchmark: blocked-sight check along a 90-cell diagonal.
fn bench_line_of_sight_blocked(c: &mut Criterion) {
    let room = populated_room(100, 1000, 42);

    c.bench_function("room_los_blocked_diagonal", |b| {
        b.iter(|| {
            black_box(room.is_line_of_sight_blocked(Position::new(5.0, 5.0), Position::new(95.0, 95.0)))
        });
    });
}

criterion_group!(
    benches,
    bench_move_entity,
    bench_entities_in_range,
    bench_line_of_sight_blocked
);
criterion_main!(benches);
