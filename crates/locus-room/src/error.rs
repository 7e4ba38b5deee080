//! Error types for rooms, orchestration, queries and loading.
//!
//! Each enum maps onto the shared [`ErrorKind`] taxonomy through `kind()`,
//! so callers can retry blocked operations and surface malformed ones
//! without matching every variant.

use locus_core::{ConnectionId, EntityId, ErrorKind, Position, RoomId};
use std::error::Error;
use std::fmt;

// ── RoomError ──────────────────────────────────────────────────────

/// Errors from [`Room`](crate::Room) mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum RoomError {
    /// The entity has an empty id.
    InvalidEntity,
    /// The position is not valid on the room's grid.
    InvalidPosition {
        /// Room that rejected the position.
        room_id: RoomId,
        /// The rejected position.
        position: Position,
    },
    /// The entity is not placed in the room.
    EntityNotFound {
        /// Room that was searched.
        room_id: RoomId,
        /// The missing entity.
        entity_id: EntityId,
    },
    /// A movement-blocking occupant holds the target cell.
    Blocked {
        /// Room containing the cell.
        room_id: RoomId,
        /// Entity that was denied.
        entity_id: EntityId,
        /// The blocked cell.
        position: Position,
    },
}

impl RoomError {
    /// Broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidEntity | Self::InvalidPosition { .. } | Self::EntityNotFound { .. } => {
                ErrorKind::InvalidInput
            }
            Self::Blocked { .. } => ErrorKind::Blocked,
        }
    }
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEntity => write!(f, "entity must have a non-empty id"),
            Self::InvalidPosition { room_id, position } => {
                write!(f, "position {position} is not valid in room '{room_id}'")
            }
            Self::EntityNotFound { room_id, entity_id } => {
                write!(f, "entity '{entity_id}' not found in room '{room_id}'")
            }
            Self::Blocked {
                room_id,
                entity_id,
                position,
            } => write!(
                f,
                "entity '{entity_id}' cannot occupy {position} in room '{room_id}': cell is blocked"
            ),
        }
    }
}

impl Error for RoomError {}

// ── OrchestratorError ──────────────────────────────────────────────

/// Errors from [`RoomOrchestrator`](crate::RoomOrchestrator) operations.
#[derive(Clone, Debug, PartialEq)]
pub enum OrchestratorError {
    /// A room with this id is already managed.
    DuplicateRoom {
        /// The duplicate id.
        room_id: RoomId,
    },
    /// No managed room has this id.
    RoomNotFound {
        /// The missing id.
        room_id: RoomId,
    },
    /// A connection with this id already exists.
    DuplicateConnection {
        /// The duplicate id.
        connection_id: ConnectionId,
    },
    /// No connection has this id.
    ConnectionNotFound {
        /// The missing id.
        connection_id: ConnectionId,
    },
    /// A connection names a room that is not managed.
    EndpointMissing {
        /// The connection being added.
        connection_id: ConnectionId,
        /// The unmanaged endpoint.
        room_id: RoomId,
    },
    /// The entity is not logically in the stated room, or not physically
    /// placed there.
    EntityNotInRoom {
        /// The entity.
        entity_id: EntityId,
        /// The room it was expected in.
        room_id: RoomId,
    },
    /// The connection does not lead from `from` to `to` in a usable
    /// direction.
    ConnectionMismatch {
        /// The connection.
        connection_id: ConnectionId,
        /// Requested source room.
        from: RoomId,
        /// Requested destination room.
        to: RoomId,
    },
    /// The connection refuses this entity.
    NotPassable {
        /// The connection.
        connection_id: ConnectionId,
        /// The refused entity.
        entity_id: EntityId,
    },
    /// No chain of passable connections joins the two rooms.
    NoPath {
        /// Start room.
        from: RoomId,
        /// Target room.
        to: RoomId,
    },
    /// A room rejected the delegated operation.
    Room(RoomError),
}

impl OrchestratorError {
    /// Broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateRoom { .. }
            | Self::DuplicateConnection { .. }
            | Self::EndpointMissing { .. }
            | Self::EntityNotInRoom { .. }
            | Self::ConnectionMismatch { .. } => ErrorKind::InvalidInput,
            Self::NotPassable { .. } => ErrorKind::Blocked,
            Self::RoomNotFound { .. } | Self::ConnectionNotFound { .. } | Self::NoPath { .. } => {
                ErrorKind::NotFound
            }
            Self::Room(e) => e.kind(),
        }
    }
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateRoom { room_id } => write!(f, "room '{room_id}' already exists"),
            Self::RoomNotFound { room_id } => write!(f, "room '{room_id}' not found"),
            Self::DuplicateConnection { connection_id } => {
                write!(f, "connection '{connection_id}' already exists")
            }
            Self::ConnectionNotFound { connection_id } => {
                write!(f, "connection '{connection_id}' not found")
            }
            Self::EndpointMissing {
                connection_id,
                room_id,
            } => write!(
                f,
                "connection '{connection_id}' references unknown room '{room_id}'"
            ),
            Self::EntityNotInRoom { entity_id, room_id } => {
                write!(f, "entity '{entity_id}' is not in room '{room_id}'")
            }
            Self::ConnectionMismatch {
                connection_id,
                from,
                to,
            } => write!(
                f,
                "connection '{connection_id}' does not lead from '{from}' to '{to}'"
            ),
            Self::NotPassable {
                connection_id,
                entity_id,
            } => write!(
                f,
                "connection '{connection_id}' is not passable for entity '{entity_id}'"
            ),
            Self::NoPath { from, to } => write!(f, "no path found from '{from}' to '{to}'"),
            Self::Room(e) => write!(f, "room operation failed: {e}"),
        }
    }
}

impl Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Room(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RoomError> for OrchestratorError {
    fn from(e: RoomError) -> Self {
        Self::Room(e)
    }
}

// ── QueryError ─────────────────────────────────────────────────────

/// Errors from [`SpatialQueryHandler`](crate::SpatialQueryHandler).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// The query names a room that is not registered.
    RoomNotFound {
        /// The missing id.
        room_id: RoomId,
    },
}

impl QueryError {
    /// Broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RoomNotFound { .. } => ErrorKind::NotFound,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoomNotFound { room_id } => write!(f, "room '{room_id}' not found"),
        }
    }
}

impl Error for QueryError {}

// ── LoadError ──────────────────────────────────────────────────────

/// Errors from [`load_room`](crate::load_room).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// The persisted grid type tag is not recognised.
    UnknownGridType {
        /// The unrecognised tag.
        grid_type: String,
    },
}

impl LoadError {
    /// Broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownGridType { .. } => ErrorKind::GridConstruction,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGridType { grid_type } => write!(
                f,
                "unknown grid type '{grid_type}' (expected square, hex, hex_pointy, hex_flat or gridless)"
            ),
        }
    }
}

impl Error for LoadError {}
