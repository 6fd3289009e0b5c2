use super::bike::{Bike, BikeId, BikeStatus};
use super::namespace;
use super::transaction::Transaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification describing a completed transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BikeEvent {
    pub event_id: String,
    pub bike: BikeId,
    pub status: BikeStatus,
    pub time: DateTime<Utc>,
    pub transaction_id: String,
}

impl BikeEvent {
    /// Builds the event for `tx` having moved `bike` into its current state.
    pub fn for_transition(tx: &Transaction, bike: &Bike) -> Self {
        Self {
            event_id: format!("{}#0", tx.id),
            bike: bike.id.clone(),
            status: bike.status,
            time: tx.time,
            transaction_id: tx.fully_qualified_id(),
        }
    }

    pub fn fully_qualified_id(&self) -> String {
        namespace::qualify(namespace::BIKE_EVENT, &self.event_id)
    }
}
