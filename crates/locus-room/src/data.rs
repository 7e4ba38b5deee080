//! Persisted room shape and reconstruction.
//!
//! [`RoomData`] is the serializable snapshot produced by [`Room::to_data`].
//! [`load_room`] turns one back into a live room bound to an event bus,
//! placing each recorded entity as a [`PlacedRecord`].

use crate::error::LoadError;
use crate::room::{Room, RoomConfig};
use indexmap::IndexMap;
use locus_core::{footprint, Entity, EntityId, EventBus, Footprint, HexOrientation, Placeable, Position, RoomId};
use locus_grid::{
    AnyGrid, Grid, GridShape, GridlessConfig, GridlessGrid, HexGrid, HexGridConfig, SquareGrid,
    SquareGridConfig,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tag for square grids.
pub const GRID_TYPE_SQUARE: &str = "square";
/// Tag for hex grids whose orientation comes from `hex_orientation`.
pub const GRID_TYPE_HEX: &str = "hex";
/// Tag for pointy-top hex grids.
pub const GRID_TYPE_HEX_POINTY: &str = "hex_pointy";
/// Tag for flat-top hex grids.
pub const GRID_TYPE_HEX_FLAT: &str = "hex_flat";
/// Tag for gridless rooms.
pub const GRID_TYPE_GRIDLESS: &str = "gridless";

/// A parsed grid type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridType {
    /// Square cells.
    Square,
    /// Hex cells in the given orientation.
    Hex(HexOrientation),
    /// Continuous space.
    Gridless,
}

impl GridType {
    /// Parse a persisted tag.
    ///
    /// `hex_orientation` (`true` for pointy-top) only matters for the
    /// plain `"hex"` tag, which defaults to pointy-top.
    ///
    /// # Errors
    ///
    /// [`LoadError::UnknownGridType`] for any other tag.
    pub fn parse(tag: &str, hex_orientation: Option<bool>) -> Result<Self, LoadError> {
        match tag {
            GRID_TYPE_SQUARE => Ok(Self::Square),
            GRID_TYPE_HEX => Ok(Self::Hex(match hex_orientation {
                Some(false) => HexOrientation::FlatTop,
                Some(true) | None => HexOrientation::PointyTop,
            })),
            GRID_TYPE_HEX_POINTY => Ok(Self::Hex(HexOrientation::PointyTop)),
            GRID_TYPE_HEX_FLAT => Ok(Self::Hex(HexOrientation::FlatTop)),
            GRID_TYPE_GRIDLESS => Ok(Self::Gridless),
            other => Err(LoadError::UnknownGridType {
                grid_type: other.to_owned(),
            }),
        }
    }

    /// Build a grid of this type.
    pub fn build(self, width: f64, height: f64) -> AnyGrid {
        match self {
            Self::Square => SquareGrid::new(SquareGridConfig::new(width, height)).into(),
            Self::Hex(orientation) => {
                HexGrid::new(HexGridConfig::new(width, height).with_orientation(orientation)).into()
            }
            Self::Gridless => GridlessGrid::new(GridlessConfig::new(width, height)).into(),
        }
    }
}

/// Serializable snapshot of a room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomData {
    /// Room id.
    pub id: RoomId,
    /// Room category.
    #[serde(rename = "type")]
    pub room_type: String,
    /// Grid width.
    pub width: f64,
    /// Grid height.
    pub height: f64,
    /// One of the `GRID_TYPE_*` tags.
    pub grid_type: String,
    /// `true` for pointy-top, only meaningful with the `"hex"` tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex_orientation: Option<bool>,
    /// Placed entities keyed by id.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub entities: IndexMap<EntityId, EntityPlacement>,
}

/// One recorded placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityPlacement {
    /// The entity's id.
    pub entity_id: EntityId,
    /// The entity's type tag.
    pub entity_type: String,
    /// Where it was placed.
    pub position: Position,
    /// Side length in cells.
    #[serde(default = "default_size")]
    pub size: u32,
    /// Whether it blocked movement.
    #[serde(default)]
    pub blocks_movement: bool,
    /// Whether it blocked line of sight.
    #[serde(default)]
    pub blocks_line_of_sight: bool,
}

fn default_size() -> u32 {
    1
}

impl EntityPlacement {
    fn record(entity: &dyn Entity, position: Position) -> Self {
        let fp = footprint(entity);
        Self {
            entity_id: entity.id().clone(),
            entity_type: entity.entity_type().to_owned(),
            position,
            size: fp.size,
            blocks_movement: fp.blocks_movement,
            blocks_line_of_sight: fp.blocks_line_of_sight,
        }
    }
}

/// An entity rebuilt from an [`EntityPlacement`].
///
/// It carries only what was recorded; game state lives elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedRecord {
    id: EntityId,
    entity_type: String,
    footprint: Footprint,
}

impl PlacedRecord {
    /// Rebuild the entity described by `placement`.
    pub fn new(placement: &EntityPlacement) -> Self {
        Self {
            id: placement.entity_id.clone(),
            entity_type: placement.entity_type.clone(),
            footprint: Footprint {
                size: placement.size.max(1),
                blocks_movement: placement.blocks_movement,
                blocks_line_of_sight: placement.blocks_line_of_sight,
            },
        }
    }
}

impl Entity for PlacedRecord {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn placeable(&self) -> Option<&dyn Placeable> {
        Some(&self.footprint)
    }
}

/// Data paired with the bus the rebuilt object should publish to.
#[derive(Clone)]
pub struct LoadContext<T> {
    data: T,
    bus: Arc<dyn EventBus>,
}

impl<T> LoadContext<T> {
    /// Pair `data` with `bus`.
    pub fn new(data: T, bus: Arc<dyn EventBus>) -> Self {
        Self { data, bus }
    }

    /// The persisted data.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// The bus to bind to.
    pub fn bus(&self) -> &Arc<dyn EventBus> {
        &self.bus
    }
}

impl<T: fmt::Debug> fmt::Debug for LoadContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadContext").field("data", &self.data).finish_non_exhaustive()
    }
}

impl Room {
    /// Snapshot the room's grid and placements.
    pub fn to_data(&self) -> RoomData {
        let grid = self.grid();
        let (grid_type, hex_orientation) = match grid {
            AnyGrid::Hex(hex) => (GRID_TYPE_HEX, Some(hex.orientation().is_pointy_top())),
            other => match other.shape() {
                GridShape::Gridless => (GRID_TYPE_GRIDLESS, None),
                _ => (GRID_TYPE_SQUARE, None),
            },
        };
        let dims = grid.dimensions();

        let entities = self.all_entities();
        let entities = self
            .all_positions()
            .into_iter()
            .filter_map(|(id, pos)| {
                let entity = entities.get(&id)?;
                Some((id, EntityPlacement::record(entity.as_ref(), pos)))
            })
            .collect();

        RoomData {
            id: self.id().clone(),
            room_type: self.room_type().to_owned(),
            width: dims.width,
            height: dims.height,
            grid_type: grid_type.to_owned(),
            hex_orientation,
            entities,
        }
    }
}

/// Rebuild a room from persisted data and bind it to the context's bus.
///
/// Placements that fail (invalid position, blocked cell, empty id) are
/// skipped with a warning rather than failing the load.
///
/// # Errors
///
/// [`LoadError::UnknownGridType`] if the grid tag is not recognised.
pub fn load_room(ctx: LoadContext<RoomData>) -> Result<Room, LoadError> {
    let LoadContext { data, bus } = ctx;
    let grid = GridType::parse(&data.grid_type, data.hex_orientation)?.build(data.width, data.height);
    let room = Room::new(RoomConfig::new(data.id, data.room_type, grid));
    room.connect_bus(bus);

    let total = data.entities.len();
    for placement in data.entities.values() {
        let record = Arc::new(PlacedRecord::new(placement));
        if let Err(err) = room.place_entity(record, placement.position) {
            warn!(
                room = %room.id(),
                entity = %placement.entity_id,
                %err,
                "skipping placement while loading room"
            );
        }
    }
    debug!(room = %room.id(), placed = room.entity_count(), total, "room loaded");
    Ok(room)
}

#[cfg(test)]
mod tests {
    use super::*;
    use locus_core::ErrorKind;
    use locus_test_utils::RecordingBus;

    fn data(grid_type: &str) -> RoomData {
        RoomData {
            id: "vault".into(),
            room_type: "dungeon".to_owned(),
            width: 8.0,
            height: 6.0,
            grid_type: grid_type.to_owned(),
            hex_orientation: None,
            entities: IndexMap::new(),
        }
    }

    fn placement(id: &str, x: f64, y: f64, blocks: bool) -> EntityPlacement {
        EntityPlacement {
            entity_id: id.into(),
            entity_type: "wall".to_owned(),
            position: Position::new(x, y),
            size: 1,
            blocks_movement: blocks,
            blocks_line_of_sight: blocks,
        }
    }

    #[test]
    fn grid_tags_parse() {
        assert_eq!(GridType::parse("square", None).unwrap(), GridType::Square);
        assert_eq!(
            GridType::parse("hex", None).unwrap(),
            GridType::Hex(HexOrientation::PointyTop)
        );
        assert_eq!(
            GridType::parse("hex", Some(false)).unwrap(),
            GridType::Hex(HexOrientation::FlatTop)
        );
        assert_eq!(
            GridType::parse("hex_flat", Some(true)).unwrap(),
            GridType::Hex(HexOrientation::FlatTop)
        );
        assert_eq!(GridType::parse("gridless", None).unwrap(), GridType::Gridless);
    }

    #[test]
    fn unknown_grid_tag_aborts_the_load() {
        let err = load_room(LoadContext::new(data("triangle"), Arc::new(RecordingBus::new())))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GridConstruction);
        assert!(err.to_string().contains("triangle"));
    }

    #[test]
    fn bad_placements_are_skipped() {
        let mut d = data("square");
        d.entities.insert("a".into(), placement("a", 1.0, 1.0, true));
        d.entities.insert("b".into(), placement("b", 1.0, 1.0, false));
        d.entities.insert("c".into(), placement("c", 20.0, 1.0, false));
        d.entities.insert("d".into(), placement("d", 2.0, 2.0, false));

        let bus = Arc::new(RecordingBus::new());
        let room = load_room(LoadContext::new(d, bus.clone())).unwrap();
        assert_eq!(room.entity_count(), 2);
        assert!(room.contains_entity(&"a".into()));
        assert!(room.contains_entity(&"d".into()));
        assert_eq!(
            bus.topics(),
            vec!["spatial.room.created", "spatial.entity.placed", "spatial.entity.placed"]
        );
    }

    #[test]
    fn snapshot_records_orientation_and_footprints() {
        let mut d = data("hex_flat");
        d.entities.insert("w".into(), placement("w", 2.0, 3.0, true));
        let room = load_room(LoadContext::new(d, Arc::new(RecordingBus::new()))).unwrap();

        let snap = room.to_data();
        assert_eq!(snap.grid_type, "hex");
        assert_eq!(snap.hex_orientation, Some(false));
        assert_eq!(snap.entities["w"], placement("w", 2.0, 3.0, true));
    }

    #[test]
    fn json_shape_uses_type_key() {
        let json = r#"{
            "id": "inn",
            "type": "tavern",
            "width": 5,
            "height": 5,
            "grid_type": "gridless",
            "entities": {
                "bard": {
                    "entity_id": "bard",
                    "entity_type": "character",
                    "position": {"x": 2.5, "y": 1.25}
                }
            }
        }"#;
        let parsed: RoomData = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.room_type, "tavern");
        assert_eq!(parsed.entities["bard"].size, 1);
        assert!(!parsed.entities["bard"].blocks_movement);

        let room = load_room(LoadContext::new(parsed, Arc::new(RecordingBus::new()))).unwrap();
        assert_eq!(room.entity_position(&"bard".into()), Some(Position::new(2.5, 1.25)));
        let back = serde_json::to_value(room.to_data()).unwrap();
        assert_eq!(back["type"], "tavern");
        assert!(back.get("hex_orientation").is_none());
    }
}
