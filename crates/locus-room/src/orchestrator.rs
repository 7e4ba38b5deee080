//! Multi-room orchestration over abstract connections.
//!
//! A [`RoomOrchestrator`] owns a graph whose nodes are [`Room`]s and whose
//! edges are [`Connection`]s, and tracks which room each entity logically
//! belongs to. Cross-room moves change that membership and take the entity
//! out of its source room; placing it in the destination is left to
//! whoever consumes the transition event.
//!
//! # Locking
//!
//! One reader/writer lock guards the orchestrator's maps. Room methods are
//! called while it is held, so the lock order is always orchestrator then
//! room. Rooms never call back into their orchestrator.

use crate::bus::BusSlot;
use crate::connection::Connection;
use crate::error::OrchestratorError;
use crate::room::Room;
use crate::sync;
use crossbeam_channel::Receiver;
use indexmap::IndexMap;
use locus_core::{
    ConnectionAddedEvent, ConnectionId, ConnectionRemovedEvent, Entity, EntityId,
    EntityRoomTransitionEvent, EventBus, LayoutChangedEvent, OrchestratorId, Position,
    RoomAddedEvent, RoomId, RoomRemovedEvent, SpatialEvent,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::SystemTime;
use tracing::{debug, trace};

/// How a set of rooms is meant to be arranged.
///
/// The tag is metadata only; no room coordinates are derived from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutType {
    /// Rooms stacked vertically.
    Tower,
    /// Hub and spokes.
    Branching,
    /// A 2D lattice of rooms.
    Grid,
    /// Irregular connections.
    #[default]
    Organic,
}

impl LayoutType {
    /// Stable lowercase tag used in events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tower => "tower",
            Self::Branching => "branching",
            Self::Grid => "grid",
            Self::Organic => "organic",
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction parameters for a [`RoomOrchestrator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Explicit id. A fresh one is allocated when `None`.
    pub id: Option<OrchestratorId>,
    /// Free-form category ("dungeon", "town", ...).
    pub orchestrator_type: String,
    /// Initial layout tag.
    pub layout: LayoutType,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            id: None,
            orchestrator_type: "orchestrator".to_owned(),
            layout: LayoutType::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Use an explicit id.
    pub fn with_id(mut self, id: impl Into<OrchestratorId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the category.
    pub fn with_type(mut self, orchestrator_type: impl Into<String>) -> Self {
        self.orchestrator_type = orchestrator_type.into();
        self
    }

    /// Set the initial layout.
    pub fn with_layout(mut self, layout: LayoutType) -> Self {
        self.layout = layout;
        self
    }
}

/// Computes where rooms sit relative to each other for a layout.
///
/// No implementation ships with the crate; orchestrators only carry the
/// [`LayoutType`] tag.
pub trait LayoutOrchestrator {
    /// Assign a world position to each room.
    fn arrange(
        &self,
        layout: LayoutType,
        rooms: &[Arc<Room>],
        connections: &[Arc<dyn Connection>],
    ) -> IndexMap<RoomId, Position>;
}

/// Handle returned by [`TransitionSystem::begin_transition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionId(pub u64);

/// Moves entities between rooms, possibly over several steps.
///
/// [`RoomOrchestrator`] implements it synchronously: the move happens in
/// `begin_transition` and completing is a no-op.
pub trait TransitionSystem {
    /// Start moving `entity_id` from `from` to `to` through `connection_id`.
    fn begin_transition(
        &self,
        entity_id: &EntityId,
        from: &RoomId,
        to: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<TransitionId, OrchestratorError>;

    /// Finish a transition started earlier.
    fn complete_transition(&self, id: TransitionId) -> Result<(), OrchestratorError>;
}

#[derive(Default)]
struct Graph {
    rooms: IndexMap<RoomId, Arc<Room>>,
    connections: IndexMap<ConnectionId, Arc<dyn Connection>>,
    memberships: IndexMap<EntityId, RoomId>,
    layout: LayoutType,
    transitions: u64,
}

impl Graph {
    fn room(&self, id: &RoomId) -> Result<&Arc<Room>, OrchestratorError> {
        self.rooms
            .get(id)
            .ok_or_else(|| OrchestratorError::RoomNotFound { room_id: id.clone() })
    }

    /// Connections usable when leaving `room`.
    fn exits<'a>(&'a self, room: &'a RoomId) -> impl Iterator<Item = &'a Arc<dyn Connection>> + 'a {
        self.connections
            .values()
            .filter(move |c| c.leads_from(room).is_some())
    }

    /// Check every precondition of a cross-room move, returning the entity.
    fn validate_move(
        &self,
        entity_id: &EntityId,
        from: &RoomId,
        to: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<Arc<dyn Entity>, OrchestratorError> {
        let source = self.room(from)?;
        self.room(to)?;

        if self.memberships.get(entity_id) != Some(from) {
            return Err(OrchestratorError::EntityNotInRoom {
                entity_id: entity_id.clone(),
                room_id: from.clone(),
            });
        }

        let connection = self.connections.get(connection_id).ok_or_else(|| {
            OrchestratorError::ConnectionNotFound {
                connection_id: connection_id.clone(),
            }
        })?;
        if !connection.links(from, to) {
            return Err(OrchestratorError::ConnectionMismatch {
                connection_id: connection_id.clone(),
                from: from.clone(),
                to: to.clone(),
            });
        }

        let entity = source
            .entity(entity_id)
            .ok_or_else(|| OrchestratorError::EntityNotInRoom {
                entity_id: entity_id.clone(),
                room_id: from.clone(),
            })?;
        if !connection.is_passable(entity.as_ref()) {
            return Err(OrchestratorError::NotPassable {
                connection_id: connection_id.clone(),
                entity_id: entity_id.clone(),
            });
        }
        Ok(entity)
    }
}

/// Manages rooms, the connections between them and entity membership.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use locus_core::RoomId;
/// use locus_grid::{SquareGrid, SquareGridConfig};
/// use locus_room::{BasicConnection, OrchestratorConfig, Room, RoomConfig, RoomOrchestrator};
///
/// let orch = RoomOrchestrator::new(OrchestratorConfig::default());
/// for id in ["a", "b"] {
///     let grid = SquareGrid::new(SquareGridConfig::new(10.0, 10.0));
///     orch.add_room(Arc::new(Room::new(RoomConfig::new(id, "dungeon", grid)))).unwrap();
/// }
/// orch.add_connection(Arc::new(BasicConnection::door("door", "a", "b", 1.0))).unwrap();
///
/// # struct Nobody(locus_core::EntityId);
/// # impl locus_core::Entity for Nobody {
/// #     fn id(&self) -> &locus_core::EntityId { &self.0 }
/// #     fn entity_type(&self) -> &str { "character" }
/// # }
/// let walker = Nobody("walker".into());
/// let path = orch.find_path(&"a".into(), &"b".into(), &walker).unwrap();
/// assert_eq!(path, vec![RoomId::from("a"), RoomId::from("b")]);
/// ```
pub struct RoomOrchestrator {
    id: OrchestratorId,
    orchestrator_type: String,
    bus: BusSlot,
    state: RwLock<Graph>,
}

impl RoomOrchestrator {
    /// Create an empty orchestrator.
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            id: config.id.unwrap_or_else(OrchestratorId::next),
            orchestrator_type: config.orchestrator_type,
            bus: BusSlot::default(),
            state: RwLock::new(Graph {
                layout: config.layout,
                ..Graph::default()
            }),
        }
    }

    /// Orchestrator id.
    pub fn id(&self) -> &OrchestratorId {
        &self.id
    }

    /// Orchestrator category.
    pub fn orchestrator_type(&self) -> &str {
        &self.orchestrator_type
    }

    /// Bind to `bus`. Managed rooms keep their own bus binding.
    pub fn connect_bus(&self, bus: Arc<dyn EventBus>) {
        self.bus.connect(bus);
    }

    // ── Rooms ──────────────────────────────────────────────────

    /// Start managing `room`, adopting every entity already placed in it.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::DuplicateRoom`] if the id is taken.
    pub fn add_room(&self, room: Arc<Room>) -> Result<(), OrchestratorError> {
        let mut state = sync::write(&self.state);
        let room_id = room.id().clone();
        if state.rooms.contains_key(&room_id) {
            return Err(OrchestratorError::DuplicateRoom { room_id });
        }

        for entity_id in room.all_entities().into_keys() {
            state.memberships.insert(entity_id, room_id.clone());
        }
        let room_type = room.room_type().to_owned();
        state.rooms.insert(room_id.clone(), room);
        debug!(orchestrator = %self.id, room = %room_id, "room added");

        self.bus.publish(RoomAddedEvent {
            orchestrator_id: self.id.clone(),
            room_id,
            room_type,
            added_at: SystemTime::now(),
        });
        Ok(())
    }

    /// Stop managing a room, dropping its connections and memberships.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::RoomNotFound`] if the id is unknown.
    pub fn remove_room(&self, room_id: &RoomId) -> Result<Arc<Room>, OrchestratorError> {
        let mut state = sync::write(&self.state);
        let room = state
            .rooms
            .shift_remove(room_id)
            .ok_or_else(|| OrchestratorError::RoomNotFound {
                room_id: room_id.clone(),
            })?;

        state.memberships.retain(|_, r| r != room_id);
        let dropped: Vec<ConnectionId> = state
            .connections
            .values()
            .filter(|c| c.from_room() == room_id || c.to_room() == room_id)
            .map(|c| c.id().clone())
            .collect();
        for id in &dropped {
            state.connections.shift_remove(id);
        }
        debug!(
            orchestrator = %self.id,
            room = %room_id,
            dropped_connections = dropped.len(),
            "room removed"
        );

        self.bus.publish(RoomRemovedEvent {
            orchestrator_id: self.id.clone(),
            room_id: room_id.clone(),
            dropped_connections: dropped,
            removed_at: SystemTime::now(),
        });
        Ok(room)
    }

    /// A managed room by id.
    pub fn room(&self, room_id: &RoomId) -> Option<Arc<Room>> {
        sync::read(&self.state).rooms.get(room_id).cloned()
    }

    /// Snapshot of every managed room, in insertion order.
    pub fn all_rooms(&self) -> IndexMap<RoomId, Arc<Room>> {
        sync::read(&self.state).rooms.clone()
    }

    // ── Connections ────────────────────────────────────────────

    /// Add a connection between two managed rooms.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::DuplicateConnection`] if the id is taken and
    /// [`OrchestratorError::EndpointMissing`] if either room is unmanaged.
    pub fn add_connection(&self, connection: Arc<dyn Connection>) -> Result<(), OrchestratorError> {
        let mut state = sync::write(&self.state);
        let connection_id = connection.id().clone();
        if state.connections.contains_key(&connection_id) {
            return Err(OrchestratorError::DuplicateConnection { connection_id });
        }
        for endpoint in [connection.from_room(), connection.to_room()] {
            if !state.rooms.contains_key(endpoint) {
                return Err(OrchestratorError::EndpointMissing {
                    connection_id,
                    room_id: endpoint.clone(),
                });
            }
        }

        let event = ConnectionAddedEvent {
            orchestrator_id: self.id.clone(),
            connection_id: connection_id.clone(),
            from_room: connection.from_room().clone(),
            to_room: connection.to_room().clone(),
            kind: connection.kind().as_str().to_owned(),
            added_at: SystemTime::now(),
        };
        state.connections.insert(connection_id.clone(), connection);
        debug!(orchestrator = %self.id, connection = %connection_id, "connection added");

        self.bus.publish(event);
        Ok(())
    }

    /// Remove a connection.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::ConnectionNotFound`] if the id is unknown.
    pub fn remove_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Arc<dyn Connection>, OrchestratorError> {
        let mut state = sync::write(&self.state);
        let connection = state
            .connections
            .shift_remove(connection_id)
            .ok_or_else(|| OrchestratorError::ConnectionNotFound {
                connection_id: connection_id.clone(),
            })?;
        debug!(orchestrator = %self.id, connection = %connection_id, "connection removed");

        self.bus.publish(ConnectionRemovedEvent {
            orchestrator_id: self.id.clone(),
            connection_id: connection_id.clone(),
            removed_at: SystemTime::now(),
        });
        Ok(connection)
    }

    /// A connection by id.
    pub fn connection(&self, connection_id: &ConnectionId) -> Option<Arc<dyn Connection>> {
        sync::read(&self.state).connections.get(connection_id).cloned()
    }

    /// Connections that lead out of `room_id`: its outgoing ones plus
    /// reversible ones arriving there.
    pub fn room_connections(&self, room_id: &RoomId) -> Vec<Arc<dyn Connection>> {
        sync::read(&self.state).exits(room_id).cloned().collect()
    }

    /// Snapshot of every connection, in insertion order.
    pub fn all_connections(&self) -> IndexMap<ConnectionId, Arc<dyn Connection>> {
        sync::read(&self.state).connections.clone()
    }

    // ── Entities ───────────────────────────────────────────────

    /// Place `entity` in a managed room and record its membership.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::RoomNotFound`] for an unmanaged room, or the
    /// room's own error wrapped in [`OrchestratorError::Room`].
    pub fn place_entity(
        &self,
        room_id: &RoomId,
        entity: Arc<dyn Entity>,
        pos: Position,
    ) -> Result<(), OrchestratorError> {
        let mut state = sync::write(&self.state);
        let entity_id = entity.id().clone();
        state.room(room_id)?.place_entity(entity, pos)?;
        state.memberships.insert(entity_id, room_id.clone());
        Ok(())
    }

    /// Rebuild the memberships of one room from its current placements.
    ///
    /// Entities recorded in the room but no longer placed there lose their
    /// membership; this includes entities that transitioned in and have not
    /// been placed yet.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::RoomNotFound`] for an unmanaged room.
    pub fn sync_room(&self, room_id: &RoomId) -> Result<(), OrchestratorError> {
        let mut state = sync::write(&self.state);
        let placed = state.room(room_id)?.all_entities();
        state
            .memberships
            .retain(|entity_id, r| r != room_id || placed.contains_key(entity_id));
        for entity_id in placed.into_keys() {
            state.memberships.insert(entity_id, room_id.clone());
        }
        Ok(())
    }

    /// Fold one room event into the membership map.
    ///
    /// Placement and move events record the entity in their room; a
    /// removal drops the membership if it still points at that room.
    /// Each claim is checked against the room's current placements, so
    /// events that arrive late cannot undo a newer state. Events for
    /// unmanaged rooms and every other event kind are ignored.
    ///
    /// Returns `true` if a membership changed.
    pub fn apply_event(&self, event: &SpatialEvent) -> bool {
        let (entity_id, room_id, present) = match event {
            SpatialEvent::EntityPlaced(e) => (&e.entity_id, &e.room_id, true),
            SpatialEvent::EntityMoved(e) => (&e.entity_id, &e.room_id, true),
            SpatialEvent::EntityRemoved(e) => (&e.entity_id, &e.room_id, false),
            _ => return false,
        };
        let mut state = sync::write(&self.state);
        let Some(room) = state.rooms.get(room_id) else {
            return false;
        };
        if room.contains_entity(entity_id) != present {
            return false;
        }

        let changed = if present {
            state
                .memberships
                .insert(entity_id.clone(), room_id.clone())
                .as_ref()
                != Some(room_id)
        } else if state.memberships.get(entity_id) == Some(room_id) {
            state.memberships.shift_remove(entity_id);
            true
        } else {
            false
        };
        if changed {
            trace!(
                orchestrator = %self.id,
                entity = %entity_id,
                room = %room_id,
                present,
                "membership updated from room event"
            );
        }
        changed
    }

    /// Apply every event arriving on `events` on a background thread.
    ///
    /// The thread holds the orchestrator weakly and stops when the channel
    /// disconnects or the orchestrator is dropped. Its result is the number
    /// of events that changed a membership.
    ///
    /// Feed it from an unbounded [`ChannelBus`](crate::ChannelBus): rooms
    /// publish while holding their lock, and a full channel would leave
    /// them waiting on this thread while it waits on them.
    ///
    /// # Errors
    ///
    /// Fails if the thread cannot be spawned.
    pub fn follow_events(
        self: &Arc<Self>,
        events: Receiver<SpatialEvent>,
    ) -> io::Result<JoinHandle<usize>> {
        let orchestrator = Arc::downgrade(self);
        thread::Builder::new()
            .name(format!("locus-membership-{}", self.id))
            .spawn(move || {
                let mut changed = 0;
                for event in events.iter() {
                    let Some(orchestrator) = orchestrator.upgrade() else {
                        break;
                    };
                    if orchestrator.apply_event(&event) {
                        changed += 1;
                    }
                }
                debug!(changed, "membership follower stopped");
                changed
            })
    }

    /// The room an entity logically belongs to.
    pub fn entity_room(&self, entity_id: &EntityId) -> Option<RoomId> {
        sync::read(&self.state).memberships.get(entity_id).cloned()
    }

    /// Move an entity's membership from `from` to `to` through a connection.
    ///
    /// The entity is removed from `from`'s placements but not placed in
    /// `to`; an [`EntityRoomTransitionEvent`] tells the game to do that.
    ///
    /// # Errors
    ///
    /// Any failed precondition, checked before anything changes: unknown
    /// rooms or connection, membership elsewhere, a connection that does
    /// not lead from `from` to `to`, an impassable connection, or the
    /// entity not being physically placed in `from`.
    pub fn move_entity_between_rooms(
        &self,
        entity_id: &EntityId,
        from: &RoomId,
        to: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<(), OrchestratorError> {
        let mut state = sync::write(&self.state);
        state.validate_move(entity_id, from, to, connection_id)?;

        state.room(from)?.remove_entity(entity_id)?;
        state.memberships.insert(entity_id.clone(), to.clone());
        debug!(
            orchestrator = %self.id,
            entity = %entity_id,
            %from,
            %to,
            connection = %connection_id,
            "entity changed rooms"
        );

        self.bus.publish(EntityRoomTransitionEvent {
            entity_id: entity_id.clone(),
            from_room: from.clone(),
            to_room: to.clone(),
            connection_id: connection_id.clone(),
            at: SystemTime::now(),
        });
        Ok(())
    }

    /// Whether [`move_entity_between_rooms`](Self::move_entity_between_rooms)
    /// would succeed right now.
    pub fn can_move_entity_between_rooms(
        &self,
        entity_id: &EntityId,
        from: &RoomId,
        to: &RoomId,
        connection_id: &ConnectionId,
    ) -> bool {
        sync::read(&self.state)
            .validate_move(entity_id, from, to, connection_id)
            .is_ok()
    }

    // ── Paths and layout ───────────────────────────────────────

    /// Shortest chain of rooms from `from` to `to` by connection count.
    ///
    /// Only connections passable for `entity` and usable in the walking
    /// direction are followed. Among equally short paths the one found
    /// first in connection insertion order wins.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::RoomNotFound`] if either room is unmanaged and
    /// [`OrchestratorError::NoPath`] if nothing joins them.
    pub fn find_path(
        &self,
        from: &RoomId,
        to: &RoomId,
        entity: &dyn Entity,
    ) -> Result<Vec<RoomId>, OrchestratorError> {
        let state = sync::read(&self.state);
        state.room(from)?;
        state.room(to)?;
        if from == to {
            return Ok(vec![from.clone()]);
        }

        let mut came_from: IndexMap<&RoomId, &RoomId> = IndexMap::new();
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![to.clone()];
                let mut step = to;
                while let Some(prev) = came_from.get(step) {
                    path.push((*prev).clone());
                    step = *prev;
                }
                path.reverse();
                trace!(%from, %to, hops = path.len() - 1, explored = came_from.len(), "room path found");
                return Ok(path);
            }
            for connection in state.exits(current) {
                if !connection.is_passable(entity) {
                    continue;
                }
                let Some(next) = connection.leads_from(current) else {
                    continue;
                };
                if next != from && !came_from.contains_key(next) {
                    came_from.insert(next, current);
                    queue.push_back(next);
                }
            }
        }

        trace!(%from, %to, explored = came_from.len(), "no room path");
        Err(OrchestratorError::NoPath {
            from: from.clone(),
            to: to.clone(),
        })
    }

    /// Current layout tag.
    pub fn layout(&self) -> LayoutType {
        sync::read(&self.state).layout
    }

    /// Change the layout tag.
    pub fn set_layout(&self, layout: LayoutType) {
        let mut state = sync::write(&self.state);
        let old = std::mem::replace(&mut state.layout, layout);
        debug!(orchestrator = %self.id, %old, new = %layout, "layout changed");

        self.bus.publish(LayoutChangedEvent {
            orchestrator_id: self.id.clone(),
            old_layout: old.as_str().to_owned(),
            new_layout: layout.as_str().to_owned(),
            changed_at: SystemTime::now(),
        });
    }
}

impl TransitionSystem for RoomOrchestrator {
    fn begin_transition(
        &self,
        entity_id: &EntityId,
        from: &RoomId,
        to: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<TransitionId, OrchestratorError> {
        self.move_entity_between_rooms(entity_id, from, to, connection_id)?;
        let mut state = sync::write(&self.state);
        state.transitions += 1;
        Ok(TransitionId(state.transitions))
    }

    fn complete_transition(&self, _id: TransitionId) -> Result<(), OrchestratorError> {
        Ok(())
    }
}

impl fmt::Debug for RoomOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = sync::read(&self.state);
        f.debug_struct("RoomOrchestrator")
            .field("id", &self.id)
            .field("orchestrator_type", &self.orchestrator_type)
            .field("rooms", &state.rooms.len())
            .field("connections", &state.connections.len())
            .field("layout", &state.layout)
            .field("bus", &self.bus)
            .finish()
    }
}
