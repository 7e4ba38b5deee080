//! Rooms and the orchestration layer above them.
//!
//! A [`Room`] tracks where entities sit on one grid. A
//! [`RoomOrchestrator`] owns many rooms, the abstract [`Connection`]s
//! between them, and which room each entity logically belongs to.
//! [`SpatialQueryHandler`] answers synchronous range, line-of-sight,
//! movement and placement queries against registered rooms, and
//! [`data`] converts rooms to and from their persisted form.
//!
//! # Locking
//!
//! Rooms and orchestrators guard their maps with one `RwLock` each.
//! Mutations hold the write lock across validation, update and event
//! publication; reads take the shared lock. An orchestrator may call into
//! its rooms while locked, rooms never call back into an orchestrator.
//! Room events reach an orchestrator only through a [`ChannelBus`] drained
//! on another thread ([`RoomOrchestrator::follow_events`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod connection;
pub mod data;
pub mod error;
pub mod orchestrator;
pub mod query;
pub mod room;

mod bus;
mod sync;

pub use bus::ChannelBus;
pub use connection::{BasicConnection, Connection, ConnectionConfig, ConnectionKind};
pub use data::{load_room, EntityPlacement, GridType, LoadContext, PlacedRecord, RoomData};
pub use error::{LoadError, OrchestratorError, QueryError, RoomError};
pub use orchestrator::{
    LayoutOrchestrator, LayoutType, OrchestratorConfig, RoomOrchestrator, TransitionId,
    TransitionSystem,
};
pub use query::{EntityFilter, QueryResponse, SimpleEntityFilter, SpatialQuery, SpatialQueryHandler};
pub use room::{Room, RoomConfig};
