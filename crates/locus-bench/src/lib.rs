//! Benchmark fixtures for the Locus spatial engine.
//!
//! - [`scatter_cells`]: deterministic distinct cell indices from a seed
//! - [`populated_room`]: a square room pre-filled with creatures
//! - [`hex_obstacles`]: a deterministic blocked set for A* runs

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use locus_core::{CubeCoordinate, Position};
use locus_grid::{SquareGrid, SquareGridConfig};
use locus_room::{Room, RoomConfig};
use locus_test_utils::creature;
use std::collections::HashSet;

/// Pick `n` distinct indices below `cell_count`.
///
/// Uses a multiplicative hash of the seed with linear probing on
/// collision, so the same arguments always give the same cells.
/// `n` is capped at `cell_count`.
pub fn scatter_cells(cell_count: usize, n: usize, seed: u64) -> Vec<usize> {
    let n = n.min(cell_count);
    let mut taken = HashSet::with_capacity(n);
    let mut cells = Vec::with_capacity(n);
    for i in 0..n as u64 {
        let mut cell = (seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(i.wrapping_mul(1442695040888963407))
            % cell_count as u64) as usize;
        while taken.contains(&cell) {
            cell = (cell + 1) % cell_count;
        }
        taken.insert(cell);
        cells.push(cell);
    }
    cells
}

/// A `side`×`side` square room holding `count` non-blocking creatures
/// named `e0`, `e1`, ... at scattered cells.
/// `count` is capped at `side * side`.
pub fn populated_room(side: u32, count: usize, seed: u64) -> Room {
    let extent = f64::from(side);
    let room = Room::new(RoomConfig::new(
        "bench",
        "bench",
        SquareGrid::new(SquareGridConfig::new(extent, extent)),
    ));
    let side = side as usize;
    for (i, cell) in scatter_cells(side * side, count, seed).into_iter().enumerate() {
        let pos = Position::new((cell % side) as f64, (cell / side) as f64);
        room.place_entity(creature(&format!("e{i}")), pos)
            .expect("scattered cells are distinct and in bounds");
    }
    room
}

/// Roughly `per_mille`/1000 of the cells within `radius` of the origin,
/// never including the origin itself.
pub fn hex_obstacles(radius: i32, per_mille: u64, seed: u64) -> HashSet<CubeCoordinate> {
    let mut blocked = HashSet::new();
    for x in -radius..=radius {
        for z in (-radius).max(-x - radius)..=radius.min(-x + radius) {
            let c = CubeCoordinate::from_xz(x, z);
            if c == CubeCoordinate::ORIGIN {
                continue;
            }
            let h = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add((x as u64).wrapping_mul(1442695040888963407))
                .wrapping_add((z as u64).wrapping_mul(2862933555777941757));
            if (h >> 33) % 1000 < per_mille {
                blocked.insert(c);
            }
        }
    }
    blocked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_cells_are_distinct_and_in_bounds() {
        let cells = scatter_cells(100, 10, 42);
        assert_eq!(cells.len(), 10);
        let unique: HashSet<_> = cells.iter().copied().collect();
        assert_eq!(unique.len(), 10);
        assert!(cells.iter().all(|&c| c < 100));
    }

    #[test]
    fn scatter_cells_are_deterministic() {
        assert_eq!(scatter_cells(1000, 5, 7), scatter_cells(1000, 5, 7));
    }

    #[test]
    fn populated_room_places_everyone() {
        let room = populated_room(20, 50, 3);
        assert_eq!(room.entity_count(), 50);
    }

    #[test]
    fn obstacles_spare_the_origin() {
        let blocked = hex_obstacles(10, 300, 1);
        assert!(!blocked.contains(&CubeCoordinate::ORIGIN));
        assert!(!blocked.is_empty());
        assert!(blocked.iter().all(|c| c.distance(CubeCoordinate::ORIGIN) <= 10));
    }
}
