//! Grid strategies for Locus rooms.
//!
//! This crate defines the [`Grid`] trait, the single spatial abstraction
//! rooms delegate distance, adjacency, line-of-sight and area queries to,
//! along with its three strategies and hex pathfinding.
//!
//! # Strategies
//!
//! - [`SquareGrid`]: integer cells, Chebyshev distance, 8 neighbours
//! - [`HexGrid`]: cube-coordinate cells in either [`HexOrientation`](locus_core::HexOrientation)
//! - [`GridlessGrid`]: continuous space, Euclidean distance, sampled area queries
//!
//! [`AnyGrid`] enumerates the three so a room can hold any of them and
//! still reach shape-specific helpers without downcasting.
//!
//! # Pathfinding
//!
//! [`HexPathFinder`] runs A* over cube coordinates around a blocked set.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod grid;
pub mod gridless;
pub mod hex;
pub mod pathfind;
pub mod sampling;
pub mod square;

#[cfg(test)]
pub(crate) mod compliance;

pub use grid::{AnyGrid, Grid};
pub use gridless::{GridlessConfig, GridlessGrid};
pub use hex::{HexGrid, HexGridConfig};
pub use locus_core::GridShape;
pub use pathfind::{HexPathFinder, PathFinder};
pub use sampling::SamplingConfig;
pub use square::{SquareGrid, SquareGridConfig};
