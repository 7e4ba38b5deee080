//! A* pathfinding over hex cube coordinates.

use crate::grid::Grid;
use crate::hex::HexGrid;
use locus_core::CubeCoordinate;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::trace;

/// Finds step-by-step routes between hexes.
pub trait PathFinder: Send + Sync {
    /// Shortest route from `start` to `goal` that never enters `blocked`.
    ///
    /// The result excludes `start` and ends with `goal`. It is empty when
    /// `start == goal`, when `goal` is blocked, or when no route exists.
    fn find_path(
        &self,
        start: CubeCoordinate,
        goal: CubeCoordinate,
        blocked: &HashSet<CubeCoordinate>,
    ) -> Vec<CubeCoordinate>;
}

/// A* with unit step cost and cube distance as the heuristic.
///
/// Cube distance never overestimates the remaining steps and changes by at
/// most one per step, so the first time the goal is popped its path is
/// optimal. Among equal `f = g + h` the frontier prefers the lower `h`, then
/// the earlier insertion, which makes results reproducible.
///
/// # Termination
///
/// Unbounded search ([`HexPathFinder::new`]) explores the infinite hex
/// plane. If `blocked` fully encloses `goal` (or `start`) it never
/// finishes. Use [`HexPathFinder::within`] when that can happen; expansion
/// is then limited to the grid's valid cells.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use locus_core::CubeCoordinate;
/// use locus_grid::{HexPathFinder, PathFinder};
///
/// let start = CubeCoordinate::ORIGIN;
/// let goal = CubeCoordinate::from_xz(3, -1);
/// let path = HexPathFinder::new().find_path(start, goal, &HashSet::new());
/// assert_eq!(path.len() as u32, start.distance(goal));
/// assert_eq!(path.last(), Some(&goal));
/// ```
#[derive(Clone, Debug, Default)]
pub struct HexPathFinder {
    bounds: Option<HexGrid>,
}

impl HexPathFinder {
    /// A path finder over the unbounded hex plane.
    pub fn new() -> Self {
        Self { bounds: None }
    }

    /// A path finder that only expands cells valid on `grid`.
    pub fn within(grid: HexGrid) -> Self {
        Self { bounds: Some(grid) }
    }

    fn passable(&self, cube: CubeCoordinate, blocked: &HashSet<CubeCoordinate>) -> bool {
        if blocked.contains(&cube) {
            return false;
        }
        match &self.bounds {
            Some(grid) => grid.is_valid_position(grid.position_of(cube)),
            None => true,
        }
    }
}

impl PathFinder for HexPathFinder {
    fn find_path(
        &self,
        start: CubeCoordinate,
        goal: CubeCoordinate,
        blocked: &HashSet<CubeCoordinate>,
    ) -> Vec<CubeCoordinate> {
        if start == goal || !self.passable(goal, blocked) {
            return Vec::new();
        }

        let mut open = BinaryHeap::new();
        let mut g_score: HashMap<CubeCoordinate, u32> = HashMap::new();
        let mut came_from: HashMap<CubeCoordinate, CubeCoordinate> = HashMap::new();
        let mut closed: HashSet<CubeCoordinate> = HashSet::new();
        let mut seq: u64 = 0;

        let h0 = start.distance(goal);
        open.push(Reverse((h0, h0, seq, start)));
        g_score.insert(start, 0);

        while let Some(Reverse((_, _, _, current))) = open.pop() {
            if current == goal {
                let path = reconstruct(&came_from, start, goal);
                trace!(%start, %goal, steps = path.len(), expanded = closed.len(), "hex path found");
                return path;
            }
            if !closed.insert(current) {
                continue;
            }
            let g = g_score.get(&current).copied().unwrap_or(0);

            for next in current.neighbors() {
                if closed.contains(&next) || !self.passable(next, blocked) {
                    continue;
                }
                let tentative = g + 1;
                if g_score.get(&next).is_some_and(|&known| known <= tentative) {
                    continue;
                }
                g_score.insert(next, tentative);
                came_from.insert(next, current);
                let h = next.distance(goal);
                seq += 1;
                open.push(Reverse((tentative + h, h, seq, next)));
            }
        }

        trace!(%start, %goal, expanded = closed.len(), "hex path exhausted");
        Vec::new()
    }
}

/// Walk predecessors back from `goal`, then reverse. Excludes `start`.
fn reconstruct(
    came_from: &HashMap<CubeCoordinate, CubeCoordinate>,
    start: CubeCoordinate,
    goal: CubeCoordinate,
) -> Vec<CubeCoordinate> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HexGridConfig;
    use locus_core::Position;
    use proptest::prelude::*;

    fn cube(x: i32, z: i32) -> CubeCoordinate {
        CubeCoordinate::from_xz(x, z)
    }

    fn assert_contiguous(start: CubeCoordinate, path: &[CubeCoordinate]) {
        let mut prev = start;
        for &step in path {
            assert_eq!(prev.distance(step), 1, "{prev} -> {step} is not a single step");
            prev = step;
        }
    }

    #[test]
    fn same_start_and_goal_is_empty() {
        let finder = HexPathFinder::new();
        assert!(finder.find_path(cube(2, 2), cube(2, 2), &HashSet::new()).is_empty());
    }

    #[test]
    fn blocked_goal_is_empty() {
        let finder = HexPathFinder::new();
        let goal = cube(3, 0);
        let blocked: HashSet<_> = [goal].into_iter().collect();
        assert!(finder.find_path(CubeCoordinate::ORIGIN, goal, &blocked).is_empty());
    }

    #[test]
    fn straight_line_in_open_field() {
        let finder = HexPathFinder::new();
        let path = finder.find_path(CubeCoordinate::ORIGIN, cube(3, 0), &HashSet::new());
        assert_eq!(path, vec![cube(1, 0), cube(2, 0), cube(3, 0)]);
    }

    #[test]
    fn detours_around_a_wall() {
        let finder = HexPathFinder::new();
        let start = CubeCoordinate::ORIGIN;
        let goal = cube(3, 0);
        let blocked: HashSet<_> = [cube(1, 0), cube(2, 0)].into_iter().collect();
        let path = finder.find_path(start, goal, &blocked);
        assert_eq!(path.len(), 4);
        assert_eq!(path.last(), Some(&goal));
        assert!(path.iter().all(|c| !blocked.contains(c)));
        assert_contiguous(start, &path);
    }

    #[test]
    fn bounded_search_gives_up_on_enclosed_goal() {
        let grid = HexGrid::new(HexGridConfig::new(10.0, 10.0));
        let goal = grid.cube_of(Position::new(5.0, 5.0));
        let blocked: HashSet<_> = goal.neighbors().into_iter().collect();
        let finder = HexPathFinder::within(grid);
        assert!(finder.find_path(cube(0, 0), goal, &blocked).is_empty());
    }

    #[test]
    fn bounded_search_stays_on_grid() {
        let grid = HexGrid::new(HexGridConfig::new(3.0, 1.0));
        let finder = HexPathFinder::within(grid);
        let blocked: HashSet<_> = [cube(1, 0)].into_iter().collect();
        assert!(finder.find_path(cube(0, 0), cube(2, 0), &blocked).is_empty());
        assert!(finder.find_path(cube(0, 0), cube(5, 0), &HashSet::new()).is_empty());
        assert_eq!(finder.find_path(cube(0, 0), cube(2, 0), &HashSet::new()).len(), 2);
    }

    #[test]
    fn equal_searches_give_equal_paths() {
        let finder = HexPathFinder::new();
        let blocked: HashSet<_> = [cube(2, -1), cube(2, 0), cube(2, 1)].into_iter().collect();
        let a = finder.find_path(cube(0, 0), cube(4, 0), &blocked);
        let b = finder.find_path(cube(0, 0), cube(4, 0), &blocked);
        assert_eq!(a, b);
        assert_contiguous(cube(0, 0), &a);
    }

    proptest! {
        #[test]
        fn open_field_paths_are_optimal(sx in -8i32..8, sz in -8i32..8, gx in -8i32..8, gz in -8i32..8) {
            let start = cube(sx, sz);
            let goal = cube(gx, gz);
            let path = HexPathFinder::new().find_path(start, goal, &HashSet::new());
            prop_assert_eq!(path.len() as u32, start.distance(goal));
            if start != goal {
                prop_assert_eq!(path.last(), Some(&goal));
            }
            assert_contiguous(start, &path);
        }
    }
}
