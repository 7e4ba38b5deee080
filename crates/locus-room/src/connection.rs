//! Abstract room-to-room links.
//!
//! A connection knows the two room ids it joins, whether it can be walked
//! backwards, what it costs and what it requires. It never stores
//! coordinates: a door's physical presence is a separate entity placed in
//! a room by whoever builds the level.

use locus_core::{ConnectionId, Entity, RoomId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// What a connection physically represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// A standard doorway.
    Door,
    /// A stairway between levels.
    Stairs,
    /// A corridor or hallway.
    Passage,
    /// A magical or teleporting link.
    Portal,
    /// A bridge over a gap.
    Bridge,
    /// An enclosed underground route.
    Tunnel,
}

impl ConnectionKind {
    /// Stable lowercase tag used in events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Door => "door",
            Self::Stairs => "stairs",
            Self::Passage => "passage",
            Self::Portal => "portal",
            Self::Bridge => "bridge",
            Self::Tunnel => "tunnel",
        }
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical edge between two rooms.
///
/// Orchestrators share connections across threads, so implementations
/// must be `Send + Sync`.
pub trait Connection: Send + Sync {
    /// Unique connection id.
    fn id(&self) -> &ConnectionId;

    /// What the connection represents.
    fn kind(&self) -> ConnectionKind;

    /// Source room.
    fn from_room(&self) -> &RoomId;

    /// Destination room.
    fn to_room(&self) -> &RoomId;

    /// Whether `entity` may traverse the connection right now.
    fn is_passable(&self, entity: &dyn Entity) -> bool;

    /// Cost for `entity` to traverse the connection.
    fn traversal_cost(&self, entity: &dyn Entity) -> f64;

    /// Whether the connection also leads from `to_room` back to `from_room`.
    fn is_reversible(&self) -> bool;

    /// Free-form requirements ("can_climb", "key:red", ...).
    fn requirements(&self) -> &[String];

    /// Returns `true` if the connection leads from `from` to `to`, in
    /// either direction when reversible.
    fn links(&self, from: &RoomId, to: &RoomId) -> bool {
        (self.from_room() == from && self.to_room() == to)
            || (self.is_reversible() && self.from_room() == to && self.to_room() == from)
    }

    /// The room reached by leaving `room` through this connection, if any.
    fn leads_from(&self, room: &RoomId) -> Option<&RoomId> {
        if self.from_room() == room {
            Some(self.to_room())
        } else if self.is_reversible() && self.to_room() == room {
            Some(self.from_room())
        } else {
            None
        }
    }
}

/// Parameters for a [`BasicConnection`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Unique connection id.
    pub id: ConnectionId,
    /// What the connection represents.
    pub kind: ConnectionKind,
    /// Source room.
    pub from: RoomId,
    /// Destination room.
    pub to: RoomId,
    /// Whether it can be walked backwards.
    pub reversible: bool,
    /// Traversal cost, the same for every entity.
    pub cost: f64,
    /// Free-form requirements.
    #[serde(default)]
    pub requirements: Vec<String>,
}

impl ConnectionConfig {
    /// A reversible connection with no requirements.
    pub fn new(
        id: impl Into<ConnectionId>,
        kind: ConnectionKind,
        from: impl Into<RoomId>,
        to: impl Into<RoomId>,
        cost: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            from: from.into(),
            to: to.into(),
            reversible: true,
            cost,
            requirements: Vec::new(),
        }
    }

    /// Set reversibility.
    pub fn with_reversible(mut self, reversible: bool) -> Self {
        self.reversible = reversible;
        self
    }

    /// Replace the requirement list.
    pub fn with_requirements<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements = requirements.into_iter().map(Into::into).collect();
        self
    }
}

/// A connection with a fixed cost and a toggleable passable flag.
///
/// Passability is the same for every entity; requirements are carried
/// for callers to interpret, not enforced here.
#[derive(Debug)]
pub struct BasicConnection {
    config: ConnectionConfig,
    passable: AtomicBool,
}

impl BasicConnection {
    /// Build a passable connection from `config`.
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            passable: AtomicBool::new(true),
        }
    }

    /// A reversible door.
    pub fn door(
        id: impl Into<ConnectionId>,
        from: impl Into<RoomId>,
        to: impl Into<RoomId>,
        cost: f64,
    ) -> Self {
        Self::new(ConnectionConfig::new(id, ConnectionKind::Door, from, to, cost))
    }

    /// Stairs, which require `"can_climb"`.
    pub fn stairs(
        id: impl Into<ConnectionId>,
        from: impl Into<RoomId>,
        to: impl Into<RoomId>,
        cost: f64,
        reversible: bool,
    ) -> Self {
        Self::new(
            ConnectionConfig::new(id, ConnectionKind::Stairs, from, to, cost)
                .with_reversible(reversible)
                .with_requirements(["can_climb"]),
        )
    }

    /// A reversible passage with the given requirements.
    pub fn passage<I, S>(
        id: impl Into<ConnectionId>,
        from: impl Into<RoomId>,
        to: impl Into<RoomId>,
        cost: f64,
        requirements: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            ConnectionConfig::new(id, ConnectionKind::Passage, from, to, cost)
                .with_requirements(requirements),
        )
    }

    /// A one-way portal.
    pub fn portal(
        id: impl Into<ConnectionId>,
        from: impl Into<RoomId>,
        to: impl Into<RoomId>,
        cost: f64,
    ) -> Self {
        Self::new(
            ConnectionConfig::new(id, ConnectionKind::Portal, from, to, cost)
                .with_reversible(false),
        )
    }

    /// A reversible bridge.
    pub fn bridge(
        id: impl Into<ConnectionId>,
        from: impl Into<RoomId>,
        to: impl Into<RoomId>,
        cost: f64,
    ) -> Self {
        Self::new(ConnectionConfig::new(id, ConnectionKind::Bridge, from, to, cost))
    }

    /// A reversible tunnel.
    pub fn tunnel(
        id: impl Into<ConnectionId>,
        from: impl Into<RoomId>,
        to: impl Into<RoomId>,
        cost: f64,
    ) -> Self {
        Self::new(ConnectionConfig::new(id, ConnectionKind::Tunnel, from, to, cost))
    }

    /// Replace the requirement list.
    pub fn with_requirements<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.with_requirements(requirements);
        self
    }

    /// Open or close the connection for everyone.
    pub fn set_passable(&self, passable: bool) {
        self.passable.store(passable, Ordering::Release);
    }

    /// The construction parameters.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
}

impl Connection for BasicConnection {
    fn id(&self) -> &ConnectionId {
        &self.config.id
    }

    fn kind(&self) -> ConnectionKind {
        self.config.kind
    }

    fn from_room(&self) -> &RoomId {
        &self.config.from
    }

    fn to_room(&self) -> &RoomId {
        &self.config.to
    }

    fn is_passable(&self, _entity: &dyn Entity) -> bool {
        self.passable.load(Ordering::Acquire)
    }

    fn traversal_cost(&self, _entity: &dyn Entity) -> f64 {
        self.config.cost
    }

    fn is_reversible(&self) -> bool {
        self.config.reversible
    }

    fn requirements(&self) -> &[String] {
        &self.config.requirements
    }
}
