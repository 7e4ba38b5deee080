//! Test utilities for Locus development.
//!
//! Provides entity fixtures ([`fixtures`]) and [`RecordingBus`], an
//! [`EventBus`] that keeps every event in memory.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{creature, item, marker, monster, wall, window, TestEntity};

use locus_core::{EventBus, PublishError, SpatialEvent};
use std::sync::Mutex;

/// Records every published event in order.
///
/// A bus built with [`failing`](RecordingBus::failing) records nothing
/// and rejects every publish, for exercising error paths.
#[derive(Debug, Default)]
pub struct RecordingBus {
    events: Mutex<Vec<SpatialEvent>>,
    fail: bool,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus whose every publish fails.
    pub fn failing() -> Self {
        Self {
            events: Mutex::default(),
            fail: true,
        }
    }

    /// Copy of the recorded events.
    pub fn events(&self) -> Vec<SpatialEvent> {
        self.lock().clone()
    }

    /// Topics of the recorded events, in publish order.
    pub fn topics(&self) -> Vec<&'static str> {
        self.lock().iter().map(SpatialEvent::topic).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SpatialEvent>> {
        self.events.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl EventBus for RecordingBus {
    fn publish(&self, event: SpatialEvent) -> Result<(), PublishError> {
        if self.fail {
            return Err(PublishError::new(event.topic(), "recording bus set to fail"));
        }
        self.lock().push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locus_core::{LayoutChangedEvent, OrchestratorId};
    use std::time::SystemTime;

    fn layout_event() -> SpatialEvent {
        LayoutChangedEvent {
            orchestrator_id: OrchestratorId::from("o"),
            old_layout: "organic".into(),
            new_layout: "tower".into(),
            changed_at: SystemTime::now(),
        }
        .into()
    }

    #[test]
    fn recording_bus_keeps_order() {
        let bus = RecordingBus::new();
        bus.publish(layout_event()).unwrap();
        assert_eq!(bus.topics(), vec!["spatial.orchestrator.layout_changed"]);
        bus.clear();
        assert!(bus.is_empty());
    }

    #[test]
    fn failing_bus_rejects() {
        let bus = RecordingBus::failing();
        assert!(bus.publish(layout_event()).is_err());
        assert_eq!(bus.len(), 0);
    }
}
