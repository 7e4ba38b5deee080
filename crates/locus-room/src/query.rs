//! Synchronous spatial queries over registered rooms.
//!
//! [`SpatialQueryHandler`] answers [`SpatialQuery`] requests by delegating
//! to a room and its grid. It never mutates a room, and its answers do
//! not depend on any event bus.

use crate::error::QueryError;
use crate::room::Room;
use crate::sync;
use indexmap::{IndexMap, IndexSet};
use locus_core::{Entity, EntityId, Position, RoomId};
use locus_grid::Grid;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Topic keys for query requests.
pub mod topics {
    /// [`SpatialQuery::PositionsInRange`](super::SpatialQuery::PositionsInRange).
    pub const POSITIONS_IN_RANGE: &str = "spatial.query.positions_in_range";
    /// [`SpatialQuery::EntitiesInRange`](super::SpatialQuery::EntitiesInRange).
    pub const ENTITIES_IN_RANGE: &str = "spatial.query.entities_in_range";
    /// [`SpatialQuery::LineOfSight`](super::SpatialQuery::LineOfSight).
    pub const LINE_OF_SIGHT: &str = "spatial.query.line_of_sight";
    /// [`SpatialQuery::Movement`](super::SpatialQuery::Movement).
    pub const MOVEMENT: &str = "spatial.query.movement";
    /// [`SpatialQuery::Placement`](super::SpatialQuery::Placement).
    pub const PLACEMENT: &str = "spatial.query.placement";
}

/// Decides whether an entity belongs in a query result.
pub trait EntityFilter: Send + Sync {
    /// Returns `true` to keep `entity`.
    fn matches(&self, entity: &dyn Entity) -> bool;
}

/// Filter by type tag and id lists.
///
/// Exclusions are checked first, then the id list, then the type list.
/// A non-empty list that does not contain the entity rejects it; a
/// filter with every list empty accepts everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimpleEntityFilter {
    entity_types: IndexSet<String>,
    entity_ids: IndexSet<EntityId>,
    exclude_ids: IndexSet<EntityId>,
}

impl SimpleEntityFilter {
    /// A filter that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept only these type tags.
    pub fn with_entity_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entity_types.extend(types.into_iter().map(Into::into));
        self
    }

    /// Accept only these ids.
    pub fn with_entity_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EntityId>,
    {
        self.entity_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Always reject these ids.
    pub fn with_exclude_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EntityId>,
    {
        self.exclude_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Only `"character"` entities.
    pub fn characters() -> Self {
        Self::new().with_entity_types(["character"])
    }

    /// Only `"monster"` entities.
    pub fn monsters() -> Self {
        Self::new().with_entity_types(["monster"])
    }

    /// Only `"item"` entities.
    pub fn items() -> Self {
        Self::new().with_entity_types(["item"])
    }

    /// Characters and monsters.
    pub fn combatants() -> Self {
        Self::new().with_entity_types(["character", "monster"])
    }
}

impl EntityFilter for SimpleEntityFilter {
    fn matches(&self, entity: &dyn Entity) -> bool {
        if self.exclude_ids.contains(entity.id()) {
            return false;
        }
        if !self.entity_ids.is_empty() {
            return self.entity_ids.contains(entity.id());
        }
        if !self.entity_types.is_empty() {
            return self.entity_types.contains(entity.entity_type());
        }
        true
    }
}

/// A spatial question about one room.
#[derive(Clone)]
pub enum SpatialQuery {
    /// Grid positions within `radius` of `center`.
    PositionsInRange {
        /// Room to query.
        room_id: RoomId,
        /// Range center.
        center: Position,
        /// Range radius in grid units.
        radius: f64,
    },
    /// Entities within `radius` of `center`, optionally filtered.
    EntitiesInRange {
        /// Room to query.
        room_id: RoomId,
        /// Range center.
        center: Position,
        /// Range radius in grid units.
        radius: f64,
        /// Keeps only matching entities when present.
        filter: Option<Arc<dyn EntityFilter>>,
    },
    /// The sight line between two positions and whether it is blocked.
    LineOfSight {
        /// Room to query.
        room_id: RoomId,
        /// Viewer position.
        from: Position,
        /// Target position.
        to: Position,
    },
    /// Whether `entity` could move from `from` to `to`.
    Movement {
        /// Room to query.
        room_id: RoomId,
        /// The moving entity.
        entity: Arc<dyn Entity>,
        /// Current position.
        from: Position,
        /// Destination.
        to: Position,
    },
    /// Whether `entity` could be placed at `position`.
    Placement {
        /// Room to query.
        room_id: RoomId,
        /// The entity to place.
        entity: Arc<dyn Entity>,
        /// Candidate position.
        position: Position,
    },
}

impl SpatialQuery {
    /// Topic key of this request.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::PositionsInRange { .. } => topics::POSITIONS_IN_RANGE,
            Self::EntitiesInRange { .. } => topics::ENTITIES_IN_RANGE,
            Self::LineOfSight { .. } => topics::LINE_OF_SIGHT,
            Self::Movement { .. } => topics::MOVEMENT,
            Self::Placement { .. } => topics::PLACEMENT,
        }
    }

    /// The room the query targets.
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::PositionsInRange { room_id, .. }
            | Self::EntitiesInRange { room_id, .. }
            | Self::LineOfSight { room_id, .. }
            | Self::Movement { room_id, .. }
            | Self::Placement { room_id, .. } => room_id,
        }
    }
}

impl fmt::Debug for SpatialQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("SpatialQuery");
        s.field("topic", &self.topic()).field("room_id", self.room_id());
        match self {
            Self::PositionsInRange { center, radius, .. } => {
                s.field("center", center).field("radius", radius)
            }
            Self::EntitiesInRange {
                center,
                radius,
                filter,
                ..
            } => s
                .field("center", center)
                .field("radius", radius)
                .field("filtered", &filter.is_some()),
            Self::LineOfSight { from, to, .. } => s.field("from", from).field("to", to),
            Self::Movement { entity, from, to, .. } => s
                .field("entity", entity.id())
                .field("from", from)
                .field("to", to),
            Self::Placement {
                entity, position, ..
            } => s.field("entity", entity.id()).field("position", position),
        };
        s.finish()
    }
}

/// The answer to a [`SpatialQuery`], one variant per request kind.
#[derive(Clone)]
pub enum QueryResponse {
    /// Answer to [`SpatialQuery::PositionsInRange`].
    Positions(Vec<Position>),
    /// Answer to [`SpatialQuery::EntitiesInRange`].
    Entities(Vec<Arc<dyn Entity>>),
    /// Answer to [`SpatialQuery::LineOfSight`].
    LineOfSight {
        /// Grid samples from viewer to target, inclusive.
        path: Vec<Position>,
        /// Whether a sight-blocking occupant sits between the endpoints.
        blocked: bool,
    },
    /// Answer to [`SpatialQuery::Movement`].
    Movement {
        /// Whether the entity could be placed at the destination.
        valid: bool,
        /// Grid distance between the two positions.
        distance: f64,
        /// Straight grid line between the two positions.
        path: Vec<Position>,
    },
    /// Answer to [`SpatialQuery::Placement`].
    Placement {
        /// Whether the entity could be placed there.
        valid: bool,
    },
}

impl fmt::Debug for QueryResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positions(p) => f.debug_tuple("Positions").field(p).finish(),
            Self::Entities(e) => f
                .debug_tuple("Entities")
                .field(&e.iter().map(|e| e.id()).collect::<Vec<_>>())
                .finish(),
            Self::LineOfSight { path, blocked } => f
                .debug_struct("LineOfSight")
                .field("path", path)
                .field("blocked", blocked)
                .finish(),
            Self::Movement {
                valid,
                distance,
                path,
            } => f
                .debug_struct("Movement")
                .field("valid", valid)
                .field("distance", distance)
                .field("path", path)
                .finish(),
            Self::Placement { valid } => f.debug_struct("Placement").field("valid", valid).finish(),
        }
    }
}

/// Routes queries to registered rooms.
#[derive(Default)]
pub struct SpatialQueryHandler {
    rooms: RwLock<IndexMap<RoomId, Arc<Room>>>,
}

impl SpatialQueryHandler {
    /// A handler with no rooms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `room` queryable, replacing any room with the same id.
    pub fn register_room(&self, room: Arc<Room>) {
        debug!(room = %room.id(), "room registered for queries");
        sync::write(&self.rooms).insert(room.id().clone(), room);
    }

    /// Stop answering queries for a room. Returns it if it was registered.
    pub fn unregister_room(&self, room_id: &RoomId) -> Option<Arc<Room>> {
        sync::write(&self.rooms).shift_remove(room_id)
    }

    /// Ids of the registered rooms.
    pub fn room_ids(&self) -> Vec<RoomId> {
        sync::read(&self.rooms).keys().cloned().collect()
    }

    /// Answer `query`.
    ///
    /// # Errors
    ///
    /// [`QueryError::RoomNotFound`] if the target room is not registered.
    pub fn handle(&self, query: &SpatialQuery) -> Result<QueryResponse, QueryError> {
        let room = sync::read(&self.rooms)
            .get(query.room_id())
            .cloned()
            .ok_or_else(|| QueryError::RoomNotFound {
                room_id: query.room_id().clone(),
            })?;

        let response = match query {
            SpatialQuery::PositionsInRange { center, radius, .. } => {
                QueryResponse::Positions(room.positions_in_range(*center, *radius))
            }
            SpatialQuery::EntitiesInRange {
                center,
                radius,
                filter,
                ..
            } => {
                let mut found = room.entities_in_range(*center, *radius);
                if let Some(filter) = filter {
                    found.retain(|e| filter.matches(e.as_ref()));
                }
                QueryResponse::Entities(found)
            }
            SpatialQuery::LineOfSight { from, to, .. } => QueryResponse::LineOfSight {
                path: room.line_of_sight(*from, *to),
                blocked: room.is_line_of_sight_blocked(*from, *to),
            },
            SpatialQuery::Movement { entity, from, to, .. } => QueryResponse::Movement {
                valid: room.can_place_entity(entity.as_ref(), *to),
                distance: room.grid().distance(*from, *to),
                path: room.line_of_sight(*from, *to),
            },
            SpatialQuery::Placement {
                entity, position, ..
            } => QueryResponse::Placement {
                valid: room.can_place_entity(entity.as_ref(), *position),
            },
        };
        Ok(response)
    }
}

impl fmt::Debug for SpatialQueryHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialQueryHandler")
            .field("rooms", &self.room_ids())
            .finish()
    }
}
