//! Spatial event payloads and the publish capability rooms are bound to.
//!
//! Each payload is a plain struct with a stable dot-namespaced topic
//! ([`Topic::TOPIC`]). Rooms and orchestrators publish them through an
//! [`EventBus`] injected after construction; the transport, subscription
//! and delivery semantics belong to the bus, not to this crate.

use crate::cube::CubeCoordinate;
use crate::error::PublishError;
use crate::geometry::{GridShape, Position};
use crate::id::{ConnectionId, EntityId, OrchestratorId, RoomId};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Associates an event payload with its topic key.
pub trait Topic {
    /// Dot-namespaced topic, e.g. `"spatial.entity.placed"`.
    const TOPIC: &'static str;
}

/// Publish capability injected into rooms and orchestrators.
///
/// `publish` is called synchronously while the publisher holds its own
/// lock, so implementations must not call back into the publisher.
pub trait EventBus: Send + Sync {
    /// Deliver one event.
    fn publish(&self, event: SpatialEvent) -> Result<(), PublishError>;
}

/// An entity was placed in (or re-placed within) a room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityPlacedEvent {
    /// The placed entity.
    pub entity_id: EntityId,
    /// Room the entity was placed in.
    pub room_id: RoomId,
    /// Placement position.
    pub position: Position,
    /// Cube form of `position`, for hex rooms only.
    pub cube: Option<CubeCoordinate>,
    /// Topology of the room.
    pub grid: GridShape,
}

/// An entity moved within a room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityMovedEvent {
    /// The moved entity.
    pub entity_id: EntityId,
    /// Room the move happened in.
    pub room_id: RoomId,
    /// Position before the move.
    pub from: Position,
    /// Position after the move.
    pub to: Position,
    /// Cube form of `from`, for hex rooms only.
    pub from_cube: Option<CubeCoordinate>,
    /// Cube form of `to`, for hex rooms only.
    pub to_cube: Option<CubeCoordinate>,
}

/// An entity was removed from a room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityRemovedEvent {
    /// The removed entity.
    pub entity_id: EntityId,
    /// Room the entity left.
    pub room_id: RoomId,
    /// Last position held.
    pub position: Position,
    /// Cube form of `position`, for hex rooms only.
    pub cube: Option<CubeCoordinate>,
}

/// A room was connected to a bus and announced itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomCreatedEvent {
    /// The new room.
    pub room_id: RoomId,
    /// Free-form room category.
    pub room_type: String,
    /// Topology of the room.
    pub grid: GridShape,
    /// Grid width.
    pub width: f64,
    /// Grid height.
    pub height: f64,
    /// When the announcement was made.
    pub created_at: SystemTime,
}

/// A room was added to an orchestrator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomAddedEvent {
    /// Orchestrator that now manages the room.
    pub orchestrator_id: OrchestratorId,
    /// The added room.
    pub room_id: RoomId,
    /// Free-form room category.
    pub room_type: String,
    /// When the room was added.
    pub added_at: SystemTime,
}

/// A room was removed from an orchestrator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomRemovedEvent {
    /// Orchestrator that managed the room.
    pub orchestrator_id: OrchestratorId,
    /// The removed room.
    pub room_id: RoomId,
    /// Connections dropped along with the room.
    pub dropped_connections: Vec<ConnectionId>,
    /// When the room was removed.
    pub removed_at: SystemTime,
}

/// A connection was added between two rooms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionAddedEvent {
    /// Orchestrator owning the connection.
    pub orchestrator_id: OrchestratorId,
    /// The new connection.
    pub connection_id: ConnectionId,
    /// Source room.
    pub from_room: RoomId,
    /// Destination room.
    pub to_room: RoomId,
    /// Connection kind tag ("door", "stairs", ...).
    pub kind: String,
    /// When the connection was added.
    pub added_at: SystemTime,
}

/// A connection was removed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRemovedEvent {
    /// Orchestrator that owned the connection.
    pub orchestrator_id: OrchestratorId,
    /// The removed connection.
    pub connection_id: ConnectionId,
    /// When the connection was removed.
    pub removed_at: SystemTime,
}

/// An entity's logical room changed.
///
/// Emitted after the entity has been taken out of the source room.
/// Placing it in the destination room is left to whoever consumes this
/// event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityRoomTransitionEvent {
    /// The transitioning entity.
    pub entity_id: EntityId,
    /// Room the entity left.
    pub from_room: RoomId,
    /// Room the entity now belongs to.
    pub to_room: RoomId,
    /// Connection used for the move.
    pub connection_id: ConnectionId,
    /// When the transition happened.
    pub at: SystemTime,
}

/// An orchestrator's layout tag changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutChangedEvent {
    /// Orchestrator whose layout changed.
    pub orchestrator_id: OrchestratorId,
    /// Previous layout tag.
    pub old_layout: String,
    /// New layout tag.
    pub new_layout: String,
    /// When the change happened.
    pub changed_at: SystemTime,
}

/// Every event published by rooms and orchestrators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload")]
pub enum SpatialEvent {
    /// See [`EntityPlacedEvent`].
    #[serde(rename = "spatial.entity.placed")]
    EntityPlaced(EntityPlacedEvent),
    /// See [`EntityMovedEvent`].
    #[serde(rename = "spatial.entity.moved")]
    EntityMoved(EntityMovedEvent),
    /// See [`EntityRemovedEvent`].
    #[serde(rename = "spatial.entity.removed")]
    EntityRemoved(EntityRemovedEvent),
    /// See [`RoomCreatedEvent`].
    #[serde(rename = "spatial.room.created")]
    RoomCreated(RoomCreatedEvent),
    /// See [`RoomAddedEvent`].
    #[serde(rename = "spatial.orchestrator.room_added")]
    RoomAdded(RoomAddedEvent),
    /// See [`RoomRemovedEvent`].
    #[serde(rename = "spatial.orchestrator.room_removed")]
    RoomRemoved(RoomRemovedEvent),
    /// See [`ConnectionAddedEvent`].
    #[serde(rename = "spatial.orchestrator.connection_added")]
    ConnectionAdded(ConnectionAddedEvent),
    /// See [`ConnectionRemovedEvent`].
    #[serde(rename = "spatial.orchestrator.connection_removed")]
    ConnectionRemoved(ConnectionRemovedEvent),
    /// See [`EntityRoomTransitionEvent`].
    #[serde(rename = "entity.room_transition")]
    EntityRoomTransition(EntityRoomTransitionEvent),
    /// See [`LayoutChangedEvent`].
    #[serde(rename = "spatial.orchestrator.layout_changed")]
    LayoutChanged(LayoutChangedEvent),
}

macro_rules! topics {
    ($($variant:ident($payload:ident) => $topic:literal,)*) => {
        $(
            impl Topic for $payload {
                const TOPIC: &'static str = $topic;
            }

            impl From<$payload> for SpatialEvent {
                fn from(event: $payload) -> Self {
                    SpatialEvent::$variant(event)
                }
            }
        )*

        impl SpatialEvent {
            /// Topic key of the wrapped payload.
            pub fn topic(&self) -> &'static str {
                match self {
                    $(SpatialEvent::$variant(_) => <$payload as Topic>::TOPIC,)*
                }
            }
        }
    };
}

topics! {
    EntityPlaced(EntityPlacedEvent) => "spatial.entity.placed",
    EntityMoved(EntityMovedEvent) => "spatial.entity.moved",
    EntityRemoved(EntityRemovedEvent) => "spatial.entity.removed",
    RoomCreated(RoomCreatedEvent) => "spatial.room.created",
    RoomAdded(RoomAddedEvent) => "spatial.orchestrator.room_added",
    RoomRemoved(RoomRemovedEvent) => "spatial.orchestrator.room_removed",
    ConnectionAdded(ConnectionAddedEvent) => "spatial.orchestrator.connection_added",
    ConnectionRemoved(ConnectionRemovedEvent) => "spatial.orchestrator.connection_removed",
    EntityRoomTransition(EntityRoomTransitionEvent) => "entity.room_transition",
    LayoutChanged(LayoutChangedEvent) => "spatial.orchestrator.layout_changed",
}

impl SpatialEvent {
    /// The entity the event concerns, for entity-scoped events.
    pub fn entity_id(&self) -> Option<&EntityId> {
        match self {
            Self::EntityPlaced(e) => Some(&e.entity_id),
            Self::EntityMoved(e) => Some(&e.entity_id),
            Self::EntityRemoved(e) => Some(&e.entity_id),
            Self::EntityRoomTransition(e) => Some(&e.entity_id),
            _ => None,
        }
    }
}
