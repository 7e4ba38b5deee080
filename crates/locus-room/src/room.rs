//! A bounded space holding entities on one grid.

use crate::bus::BusSlot;
use crate::error::RoomError;
use crate::sync;
use indexmap::IndexMap;
use locus_core::{
    footprint, Entity, EntityId, EntityMovedEvent, EntityPlacedEvent, EntityRemovedEvent,
    EventBus, Position, RoomCreatedEvent, RoomId,
};
use locus_grid::{AnyGrid, Grid};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use tracing::debug;

/// Construction parameters for a [`Room`].
#[derive(Clone, Debug)]
pub struct RoomConfig {
    /// Unique room id.
    pub id: RoomId,
    /// Free-form category ("dungeon", "tavern", ...).
    pub room_type: String,
    /// Spatial rules of the room.
    pub grid: AnyGrid,
}

impl RoomConfig {
    /// Bundle the three parameters.
    pub fn new(id: impl Into<RoomId>, room_type: impl Into<String>, grid: impl Into<AnyGrid>) -> Self {
        Self {
            id: id.into(),
            room_type: room_type.into(),
            grid: grid.into(),
        }
    }
}

/// The three indices a room keeps in step.
#[derive(Default)]
struct Placements {
    entities: IndexMap<EntityId, Arc<dyn Entity>>,
    positions: IndexMap<EntityId, Position>,
    occupancy: IndexMap<Position, Vec<EntityId>>,
}

impl Placements {
    fn occupy(&mut self, id: &EntityId, pos: Position) {
        self.occupancy.entry(pos).or_default().push(id.clone());
    }

    fn vacate(&mut self, id: &EntityId, pos: Position) {
        if let Some(ids) = self.occupancy.get_mut(&pos) {
            ids.retain(|other| other != id);
            if ids.is_empty() {
                self.occupancy.shift_remove(&pos);
            }
        }
    }

    /// Whether anyone other than `id` at `pos` blocks movement.
    fn blocked_for(&self, id: &EntityId, pos: Position) -> bool {
        self.occupancy.get(&pos).is_some_and(|ids| {
            ids.iter()
                .filter(|other| *other != id)
                .filter_map(|other| self.entities.get(other))
                .any(|e| footprint(e.as_ref()).blocks_movement)
        })
    }

    fn blocks_sight(&self, pos: Position) -> bool {
        self.occupancy.get(&pos).is_some_and(|ids| {
            ids.iter()
                .filter_map(|id| self.entities.get(id))
                .any(|e| footprint(e.as_ref()).blocks_line_of_sight)
        })
    }
}

/// A bounded space that tracks which entity sits where.
///
/// A room keeps three indices in step: id to entity, id to position, and
/// position to the ids occupying it. Entities are shared references; the
/// room never clones or mutates them. All methods take `&self` and are
/// safe to call from several threads.
///
/// Events are published only after [`connect_bus`](Room::connect_bus).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use locus_core::{Entity, EntityId, Position};
/// use locus_grid::{SquareGrid, SquareGridConfig};
/// use locus_room::{Room, RoomConfig};
///
/// struct Hero(EntityId);
/// impl Entity for Hero {
///     fn id(&self) -> &EntityId { &self.0 }
///     fn entity_type(&self) -> &str { "character" }
/// }
///
/// let room = Room::new(RoomConfig::new(
///     "hall",
///     "dungeon",
///     SquareGrid::new(SquareGridConfig::new(10.0, 10.0)),
/// ));
/// let hero = EntityId::from("hero");
/// room.place_entity(Arc::new(Hero(hero.clone())), Position::new(5.0, 5.0)).unwrap();
/// room.move_entity(&hero, Position::new(9.0, 9.0)).unwrap();
/// assert!(room.move_entity(&hero, Position::new(10.0, 10.0)).is_err());
/// assert_eq!(room.entity_position(&hero), Some(Position::new(9.0, 9.0)));
/// ```
pub struct Room {
    id: RoomId,
    room_type: String,
    grid: AnyGrid,
    bus: BusSlot,
    state: RwLock<Placements>,
}

impl Room {
    /// Create an empty room. Connect a bus separately.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            id: config.id,
            room_type: config.room_type,
            grid: config.grid,
            bus: BusSlot::default(),
            state: RwLock::new(Placements::default()),
        }
    }

    /// Room id.
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Room category.
    pub fn room_type(&self) -> &str {
        &self.room_type
    }

    /// The room's grid.
    pub fn grid(&self) -> &AnyGrid {
        &self.grid
    }

    /// Bind the room to `bus` and announce it with a room-created event.
    ///
    /// Connecting again replaces the previous bus.
    pub fn connect_bus(&self, bus: Arc<dyn EventBus>) {
        self.bus.connect(bus);
        let dims = self.grid.dimensions();
        self.bus.publish(RoomCreatedEvent {
            room_id: self.id.clone(),
            room_type: self.room_type.clone(),
            grid: self.grid.shape(),
            width: dims.width,
            height: dims.height,
            created_at: SystemTime::now(),
        });
    }

    /// Place `entity` at `pos`, or move it there if it is already placed.
    ///
    /// # Errors
    ///
    /// [`RoomError::InvalidEntity`] for an empty id,
    /// [`RoomError::InvalidPosition`] if the grid rejects `pos`, and
    /// [`RoomError::Blocked`] if another occupant of `pos` blocks movement.
    pub fn place_entity(&self, entity: Arc<dyn Entity>, pos: Position) -> Result<(), RoomError> {
        let id = entity.id().clone();
        if id.is_empty() {
            return Err(RoomError::InvalidEntity);
        }

        let mut state = sync::write(&self.state);
        self.check_target(&state, &id, pos)?;

        if let Some(old) = state.positions.get(&id).copied() {
            state.vacate(&id, old);
        }
        state.entities.insert(id.clone(), entity);
        state.positions.insert(id.clone(), pos);
        state.occupy(&id, pos);
        debug!(room = %self.id, entity = %id, %pos, "entity placed");

        self.bus.publish(EntityPlacedEvent {
            entity_id: id,
            room_id: self.id.clone(),
            position: pos,
            cube: self.grid.cube_of(pos),
            grid: self.grid.shape(),
        });
        Ok(())
    }

    /// Move a placed entity to `to`.
    ///
    /// # Errors
    ///
    /// [`RoomError::EntityNotFound`] if the entity is not placed here, plus
    /// the position and blocking errors of [`place_entity`](Room::place_entity).
    pub fn move_entity(&self, id: &EntityId, to: Position) -> Result<(), RoomError> {
        let mut state = sync::write(&self.state);
        let from = state
            .positions
            .get(id)
            .copied()
            .ok_or_else(|| self.not_found(id))?;
        self.check_target(&state, id, to)?;

        state.vacate(id, from);
        state.positions.insert(id.clone(), to);
        state.occupy(id, to);
        debug!(room = %self.id, entity = %id, %from, %to, "entity moved");

        self.bus.publish(EntityMovedEvent {
            entity_id: id.clone(),
            room_id: self.id.clone(),
            from,
            to,
            from_cube: self.grid.cube_of(from),
            to_cube: self.grid.cube_of(to),
        });
        Ok(())
    }

    /// Remove a placed entity and return it.
    ///
    /// # Errors
    ///
    /// [`RoomError::EntityNotFound`] if the entity is not placed here.
    pub fn remove_entity(&self, id: &EntityId) -> Result<Arc<dyn Entity>, RoomError> {
        let mut state = sync::write(&self.state);
        let pos = state
            .positions
            .shift_remove(id)
            .ok_or_else(|| self.not_found(id))?;
        let entity = state.entities.shift_remove(id).ok_or_else(|| self.not_found(id))?;
        state.vacate(id, pos);
        debug!(room = %self.id, entity = %id, %pos, "entity removed");

        self.bus.publish(EntityRemovedEvent {
            entity_id: id.clone(),
            room_id: self.id.clone(),
            position: pos,
            cube: self.grid.cube_of(pos),
        });
        Ok(entity)
    }

    /// Entities at `pos`, in arrival order.
    pub fn entities_at(&self, pos: Position) -> Vec<Arc<dyn Entity>> {
        let state = sync::read(&self.state);
        state
            .occupancy
            .get(&pos)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.entities.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Where an entity is placed.
    pub fn entity_position(&self, id: &EntityId) -> Option<Position> {
        sync::read(&self.state).positions.get(id).copied()
    }

    /// A placed entity by id.
    pub fn entity(&self, id: &EntityId) -> Option<Arc<dyn Entity>> {
        sync::read(&self.state).entities.get(id).cloned()
    }

    /// Returns `true` if the entity is placed here.
    pub fn contains_entity(&self, id: &EntityId) -> bool {
        sync::read(&self.state).entities.contains_key(id)
    }

    /// Snapshot of every placed entity, in placement order.
    pub fn all_entities(&self) -> IndexMap<EntityId, Arc<dyn Entity>> {
        sync::read(&self.state).entities.clone()
    }

    /// Snapshot of every placement, in placement order.
    pub fn all_positions(&self) -> IndexMap<EntityId, Position> {
        sync::read(&self.state).positions.clone()
    }

    /// Entities within `radius` of `center` under the grid's metric.
    pub fn entities_in_range(&self, center: Position, radius: f64) -> Vec<Arc<dyn Entity>> {
        let state = sync::read(&self.state);
        state
            .positions
            .iter()
            .filter(|(_, pos)| self.grid.distance(center, **pos) <= radius)
            .filter_map(|(id, _)| state.entities.get(id).cloned())
            .collect()
    }

    /// Returns `true` if any entity sits at `pos`.
    pub fn is_position_occupied(&self, pos: Position) -> bool {
        sync::read(&self.state).occupancy.contains_key(&pos)
    }

    /// Whether `entity` could be placed at `pos` right now.
    pub fn can_place_entity(&self, entity: &dyn Entity, pos: Position) -> bool {
        let state = sync::read(&self.state);
        self.grid.is_valid_position(pos) && !state.blocked_for(entity.id(), pos)
    }

    /// Whether a sight-blocking occupant sits strictly between `from` and
    /// `to` on the grid's line of sight.
    pub fn is_line_of_sight_blocked(&self, from: Position, to: Position) -> bool {
        let line = self.grid.line_of_sight(from, to);
        if line.len() < 3 {
            return false;
        }
        let state = sync::read(&self.state);
        line[1..line.len() - 1].iter().any(|p| state.blocks_sight(*p))
    }

    /// Number of placed entities.
    pub fn entity_count(&self) -> usize {
        sync::read(&self.state).entities.len()
    }

    /// Cells with at least one occupant.
    pub fn occupied_positions(&self) -> Vec<Position> {
        sync::read(&self.state).occupancy.keys().copied().collect()
    }

    /// Grid positions within `radius` of `center`.
    pub fn positions_in_range(&self, center: Position, radius: f64) -> Vec<Position> {
        self.grid.positions_in_range(center, radius)
    }

    /// Grid line of sight from `from` to `to`.
    pub fn line_of_sight(&self, from: Position, to: Position) -> Vec<Position> {
        self.grid.line_of_sight(from, to)
    }

    fn check_target(&self, state: &Placements, id: &EntityId, pos: Position) -> Result<(), RoomError> {
        if !self.grid.is_valid_position(pos) {
            return Err(RoomError::InvalidPosition {
                room_id: self.id.clone(),
                position: pos,
            });
        }
        if state.blocked_for(id, pos) {
            return Err(RoomError::Blocked {
                room_id: self.id.clone(),
                entity_id: id.clone(),
                position: pos,
            });
        }
        Ok(())
    }

    fn not_found(&self, id: &EntityId) -> RoomError {
        RoomError::EntityNotFound {
            room_id: self.id.clone(),
            entity_id: id.clone(),
        }
    }
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("room_type", &self.room_type)
            .field("grid", &self.grid)
            .field("entities", &self.entity_count())
            .field("bus", &self.bus)
            .finish()
    }
}
