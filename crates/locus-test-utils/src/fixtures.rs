//! Entity fixtures.
//!
//! - [`creature`]: a `"character"` that blocks nothing.
//! - [`monster`] / [`item`]: type-tagged non-blockers for filter tests.
//! - [`wall`]: blocks movement and sight.
//! - [`window`]: blocks movement, not sight.
//! - [`marker`]: a `"marker"` with an explicit non-blocking footprint.

use locus_core::{Entity, EntityId, Footprint, Placeable};
use std::sync::Arc;

/// A minimal entity with an optional footprint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestEntity {
    pub id: EntityId,
    pub entity_type: String,
    pub footprint: Option<Footprint>,
}

impl TestEntity {
    pub fn new(id: &str, entity_type: &str) -> Self {
        Self {
            id: EntityId::from(id),
            entity_type: entity_type.to_owned(),
            footprint: None,
        }
    }

    pub fn with_footprint(mut self, blocks_movement: bool, blocks_line_of_sight: bool) -> Self {
        self.footprint = Some(Footprint {
            size: 1,
            blocks_movement,
            blocks_line_of_sight,
        });
        self
    }

    pub fn shared(self) -> Arc<dyn Entity> {
        Arc::new(self)
    }
}

impl Entity for TestEntity {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn placeable(&self) -> Option<&dyn Placeable> {
        self.footprint.as_ref().map(|f| f as &dyn Placeable)
    }
}

pub fn creature(id: &str) -> Arc<dyn Entity> {
    TestEntity::new(id, "character").shared()
}

pub fn monster(id: &str) -> Arc<dyn Entity> {
    TestEntity::new(id, "monster").shared()
}

pub fn item(id: &str) -> Arc<dyn Entity> {
    TestEntity::new(id, "item").shared()
}

pub fn wall(id: &str) -> Arc<dyn Entity> {
    TestEntity::new(id, "wall").with_footprint(true, true).shared()
}

pub fn window(id: &str) -> Arc<dyn Entity> {
    TestEntity::new(id, "window").with_footprint(true, false).shared()
}

pub fn marker(id: &str) -> Arc<dyn Entity> {
    TestEntity::new(id, "marker").with_footprint(false, false).shared()
}
