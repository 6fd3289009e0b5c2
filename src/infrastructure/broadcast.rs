use crate::domain::event::BikeEvent;
use crate::domain::ports::EventBus;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

const DEFAULT_CAPACITY: usize = 1024;

/// In-process event bus.
///
/// Keeps every emitted event and fans it out to the current subscribers.
/// Emitting with no subscriber is not an error. Clones share the channel and
/// the history.
#[derive(Clone)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<BikeEvent>,
    history: Arc<RwLock<Vec<BikeEvent>>>,
}

impl BroadcastEventBus {
    /// `capacity` bounds how far a subscriber may lag before it misses events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            history: Arc::default(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BikeEvent> {
        self.sender.subscribe()
    }

    /// All events emitted so far, oldest first.
    pub async fn events(&self) -> Vec<BikeEvent> {
        self.history.read().await.clone()
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl EventBus for BroadcastEventBus {
    async fn emit(&self, event: BikeEvent) -> Result<()> {
        self.history.write().await.push(event.clone());
        match self.sender.send(event) {
            Ok(listeners) => debug!(listeners, "event delivered"),
            Err(_) => debug!("event emitted with no listener"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bike::{Bike, BikeStatus};
    use crate::domain::participant::ParticipantRef;
    use crate::domain::transaction::Transaction;

    fn event(tx_id: &str) -> BikeEvent {
        let bike =
            Bike::new("B1", ParticipantRef::provider("P1")).with_status(BikeStatus::Available);
        let tx = Transaction::release(tx_id, bike.id.clone(), ParticipantRef::provider("P1"));
        BikeEvent::for_transition(&tx, &bike)
    }

    #[tokio::test]
    async fn test_emit_without_listener_is_recorded() {
        let bus = BroadcastEventBus::default();
        bus.emit(event("t1")).await.unwrap();

        let events = bus.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_id, "t1#0");
    }

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let bus = BroadcastEventBus::default();
        let mut receiver = bus.subscribe();

        bus.emit(event("t1")).await.unwrap();
        bus.emit(event("t2")).await.unwrap();

        assert_eq!(receiver.recv().await.unwrap().event_id, "t1#0");
        assert_eq!(receiver.recv().await.unwrap().event_id, "t2#0");
    }

    #[tokio::test]
    async fn test_receiver_closes_when_bus_dropped() {
        let bus = BroadcastEventBus::default();
        let mut receiver = bus.subscribe();
        bus.emit(event("t1")).await.unwrap();
        drop(bus);

        assert!(receiver.recv().await.is_ok());
        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }
}
