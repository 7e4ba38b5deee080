//! Locus: a spatial engine for turn-based games.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Locus sub-crates. Depending on `locus` alone is enough for most
//! users.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use locus::prelude::*;
//!
//! struct Goblin(EntityId);
//! impl Entity for Goblin {
//!     fn id(&self) -> &EntityId { &self.0 }
//!     fn entity_type(&self) -> &str { "monster" }
//! }
//!
//! // A 12x12 pointy-top hex cave.
//! let cave = Room::new(RoomConfig::new(
//!     "cave",
//!     "dungeon",
//!     HexGrid::new(HexGridConfig::new(12.0, 12.0)),
//! ));
//! let id = EntityId::from("gob");
//! cave.place_entity(Arc::new(Goblin(id.clone())), Position::new(5.0, 5.0)).unwrap();
//! cave.move_entity(&id, Position::new(6.0, 5.0)).unwrap();
//! assert_eq!(cave.grid().distance(Position::new(5.0, 5.0), Position::new(6.0, 6.0)), 2.0);
//!
//! // A* around an obstacle, in cube coordinates.
//! let blocked = [CubeCoordinate::from_xz(1, 0)].into_iter().collect();
//! let path = HexPathFinder::new().find_path(
//!     CubeCoordinate::ORIGIN,
//!     CubeCoordinate::from_xz(2, 0),
//!     &blocked,
//! );
//! assert_eq!(path.len(), 3);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `locus-core` | Ids, geometry, cube coordinates, entity capabilities, events |
//! | [`grid`] | `locus-grid` | The `Grid` trait, square/hex/gridless grids, hex A* |
//! | [`room`] | `locus-room` | Rooms, connections, orchestration, queries, persistence |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types and capabilities (`locus-core`).
///
/// Contains ids, [`types::Position`], [`types::CubeCoordinate`], the
/// [`types::Entity`] and [`types::Placeable`] capabilities, and the
/// spatial events published through [`types::EventBus`].
pub use locus_core as types;

/// Grid strategies and pathfinding (`locus-grid`).
///
/// Provides the [`grid::Grid`] trait and its three strategies
/// [`grid::SquareGrid`], [`grid::HexGrid`] and [`grid::GridlessGrid`].
pub use locus_grid as grid;

/// Rooms and orchestration (`locus-room`).
pub use locus_room as room;

/// Common imports for typical Locus usage.
///
/// ```rust
/// use locus::prelude::*;
/// ```
pub mod prelude {
    // Core types and capabilities
    pub use locus_core::{
        CubeCoordinate, Entity, EntityId, EventBus, Footprint, HexOrientation, Placeable,
        Position, RoomId, SpatialEvent,
    };

    // Grids
    pub use locus_grid::{
        AnyGrid, Grid, GridShape, GridlessConfig, GridlessGrid, HexGrid, HexGridConfig,
        HexPathFinder, PathFinder, SquareGrid, SquareGridConfig,
    };

    // Rooms and orchestration
    pub use locus_room::{
        BasicConnection, ChannelBus, Connection, OrchestratorConfig, Room, RoomConfig,
        RoomOrchestrator, SimpleEntityFilter, SpatialQuery, SpatialQueryHandler,
    };

    // Errors
    pub use locus_core::ErrorKind;
    pub use locus_room::{OrchestratorError, RoomError};
}
