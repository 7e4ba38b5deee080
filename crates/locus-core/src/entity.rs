//! Entity capabilities consumed by rooms.
//!
//! Rooms hold entities as shared references and never own their state.
//! The only thing a room needs is a stable id and type tag ([`Entity`]);
//! blocking behaviour is an optional second capability ([`Placeable`])
//! that rooms ask for explicitly through [`Entity::placeable`].

use crate::id::EntityId;
use serde::{Deserialize, Serialize};

/// Something that can be placed in a room.
///
/// Implementations must be `Send + Sync`: rooms are shared across threads
/// and hand out `Arc<dyn Entity>` clones from their read methods.
pub trait Entity: Send + Sync {
    /// Stable identifier, unique within a room.
    fn id(&self) -> &EntityId;

    /// Free-form type tag ("character", "monster", "wall", ...).
    fn entity_type(&self) -> &str;

    /// The entity's spatial properties, if it has any.
    ///
    /// Entities returning `None` are treated as size 1 and non-blocking.
    fn placeable(&self) -> Option<&dyn Placeable> {
        None
    }
}

/// Spatial properties an entity may opt into.
pub trait Placeable {
    /// How many grid cells the entity spans along one side. Default: 1.
    fn size(&self) -> u32 {
        1
    }

    /// Whether the entity prevents others from sharing its cell.
    fn blocks_movement(&self) -> bool;

    /// Whether the entity interrupts line of sight through its cell.
    fn blocks_line_of_sight(&self) -> bool;
}

/// Resolved spatial properties of an entity.
///
/// [`footprint`] produces one for any entity, substituting
/// [`Footprint::NON_BLOCKING`] when the entity is not [`Placeable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    /// Side length in cells, never below 1.
    pub size: u32,
    /// Gates placement and movement into the cell.
    pub blocks_movement: bool,
    /// Gates line of sight through the cell.
    pub blocks_line_of_sight: bool,
}

impl Footprint {
    /// Size 1, blocks nothing.
    pub const NON_BLOCKING: Footprint = Footprint {
        size: 1,
        blocks_movement: false,
        blocks_line_of_sight: false,
    };
}

impl Default for Footprint {
    fn default() -> Self {
        Self::NON_BLOCKING
    }
}

impl Placeable for Footprint {
    fn size(&self) -> u32 {
        self.size.max(1)
    }

    fn blocks_movement(&self) -> bool {
        self.blocks_movement
    }

    fn blocks_line_of_sight(&self) -> bool {
        self.blocks_line_of_sight
    }
}

/// Resolve an entity's spatial properties.
pub fn footprint(entity: &dyn Entity) -> Footprint {
    match entity.placeable() {
        Some(p) => Footprint {
            size: p.size().max(1),
            blocks_movement: p.blocks_movement(),
            blocks_line_of_sight: p.blocks_line_of_sight(),
        },
        None => Footprint::NON_BLOCKING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ghost(EntityId);

    impl Entity for Ghost {
        fn id(&self) -> &EntityId {
            &self.0
        }
        fn entity_type(&self) -> &str {
            "ghost"
        }
    }

    struct Pillar {
        id: EntityId,
        props: Footprint,
    }

    impl Entity for Pillar {
        fn id(&self) -> &EntityId {
            &self.id
        }
        fn entity_type(&self) -> &str {
            "pillar"
        }
        fn placeable(&self) -> Option<&dyn Placeable> {
            Some(&self.props)
        }
    }

    #[test]
    fn entities_without_placeable_default_to_non_blocking() {
        let ghost = Ghost("g".into());
        assert_eq!(footprint(&ghost), Footprint::NON_BLOCKING);
    }

    #[test]
    fn placeable_properties_are_read() {
        let pillar = Pillar {
            id: "p".into(),
            props: Footprint {
                size: 0,
                blocks_movement: true,
                blocks_line_of_sight: true,
            },
        };
        let fp = footprint(&pillar);
        assert_eq!(fp.size, 1);
        assert!(fp.blocks_movement);
        assert!(fp.blocks_line_of_sight);
    }
}
