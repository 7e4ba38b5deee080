//! Core value types and capabilities for the Locus spatial engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the grid, room and orchestration layers: typed ids,
//! geometry primitives, hex cube coordinates, the entity capabilities a room
//! queries, the spatial event payloads, and the error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cube;
pub mod entity;
pub mod error;
pub mod event;
pub mod geometry;
pub mod id;

pub use cube::{CubeCoordinate, HexOrientation, CUBE_DIRECTIONS};
pub use entity::{footprint, Entity, Footprint, Placeable};
pub use error::{ErrorKind, PublishError};
pub use event::{
    ConnectionAddedEvent, ConnectionRemovedEvent, EntityMovedEvent, EntityPlacedEvent,
    EntityRemovedEvent, EntityRoomTransitionEvent, EventBus, LayoutChangedEvent,
    RoomAddedEvent, RoomCreatedEvent, RoomRemovedEvent, SpatialEvent, Topic,
};
pub use geometry::{Circle, Dimensions, GridShape, Position, Rectangle};
pub use id::{ConnectionId, EntityId, OrchestratorId, RoomId};
