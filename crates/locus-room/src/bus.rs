//! Event bus plumbing: the late-bound slot rooms and orchestrators publish
//! through, and a channel-backed bus for consuming events on another thread.

use crate::sync;
use crossbeam_channel::{Receiver, Sender};
use locus_core::{EventBus, PublishError, SpatialEvent};
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::warn;

/// Holds the bus a publisher was connected to, if any.
#[derive(Default)]
pub(crate) struct BusSlot {
    bus: RwLock<Option<Arc<dyn EventBus>>>,
}

impl BusSlot {
    pub(crate) fn connect(&self, bus: Arc<dyn EventBus>) {
        *sync::write(&self.bus) = Some(bus);
    }

    pub(crate) fn is_connected(&self) -> bool {
        sync::read(&self.bus).is_some()
    }

    pub(crate) fn current(&self) -> Option<Arc<dyn EventBus>> {
        sync::read(&self.bus).clone()
    }

    /// Publish if connected. Failures are logged and swallowed.
    pub(crate) fn publish(&self, event: impl Into<SpatialEvent>) {
        let Some(bus) = self.current() else {
            return;
        };
        let event = event.into();
        let topic = event.topic();
        if let Err(err) = bus.publish(event) {
            warn!(topic, %err, "event publication failed");
        }
    }
}

impl fmt::Debug for BusSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusSlot")
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Forwards events to a crossbeam channel.
///
/// Connect rooms and their orchestrator to clones of one bus and hand the
/// receiver to [`RoomOrchestrator::follow_events`](crate::RoomOrchestrator::follow_events)
/// to keep memberships in step with direct room edits. Publishing fails
/// once the receiver has been dropped.
#[derive(Clone, Debug)]
pub struct ChannelBus {
    tx: Sender<SpatialEvent>,
}

impl ChannelBus {
    /// An unbounded bus and the receiver draining it.
    pub fn unbounded() -> (Self, Receiver<SpatialEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }

    /// A bus holding at most `cap` undelivered events.
    ///
    /// Publishing blocks while the channel is full, and publishers hold
    /// their own lock while they publish. Do not feed a bounded bus to a
    /// consumer that takes orchestrator or room locks.
    pub fn bounded(cap: usize) -> (Self, Receiver<SpatialEvent>) {
        let (tx, rx) = crossbeam_channel::bounded(cap);
        (Self { tx }, rx)
    }
}

impl EventBus for ChannelBus {
    fn publish(&self, event: SpatialEvent) -> Result<(), PublishError> {
        let topic = event.topic();
        self.tx
            .send(event)
            .map_err(|_| PublishError::new(topic, "receiver disconnected"))
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
    fn channel_bus_fails_after_receiver_drop() {
        let (bus, rx) = ChannelBus::unbounded();
        bus.publish(layout_event()).unwrap();
        assert_eq!(rx.try_recv().unwrap().topic(), "spatial.orchestrator.layout_changed");
        drop(rx);
        assert!(bus.publish(layout_event()).is_err());
    }

    #[test]
    fn slot_publish_failure_is_swallowed() {
        let (bus, rx) = ChannelBus::bounded(1);
        let slot = BusSlot::default();
        assert!(!slot.is_connected());
        slot.connect(Arc::new(bus));
        drop(rx);
        slot.publish(layout_event());
        assert!(slot.is_connected());
    }
}
