#![allow(dead_code)]

use bikeledger::application::engine::TransitionEngine;
use bikeledger::domain::bike::{Bike, BikeId, BikeStatus};
use bikeledger::domain::participant::ParticipantRef;
use bikeledger::domain::ports::{BikeStore, UserStore};
use bikeledger::domain::user::{BikeUser, UserId};
use bikeledger::infrastructure::broadcast::BroadcastEventBus;
use bikeledger::infrastructure::in_memory::{InMemoryBikeStore, InMemoryUserStore};
use std::io::Write;
use tempfile::NamedTempFile;

/// An engine wired to in-memory adapters the test can inspect.
pub struct Ledger {
    pub bikes: InMemoryBikeStore,
    pub users: InMemoryUserStore,
    pub bus: BroadcastEventBus,
    pub engine: TransitionEngine,
}

impl Ledger {
    pub async fn new(bikes: Vec<Bike>, users: Vec<BikeUser>) -> Self {
        let bike_store = InMemoryBikeStore::new();
        let user_store = InMemoryUserStore::new();
        for bike in bikes {
            bike_store.update(bike).await.unwrap();
        }
        for user in users {
            user_store.update(user).await.unwrap();
        }
        let bus = BroadcastEventBus::default();
        let engine = TransitionEngine::new(
            Box::new(bike_store.clone()),
            Box::new(user_store.clone()),
            Box::new(bus.clone()),
        );
        Self {
            bikes: bike_store,
            users: user_store,
            bus,
            engine,
        }
    }

    pub async fn bike(&self, id: &str) -> Bike {
        self.bikes.get(&BikeId::new(id)).await.unwrap().unwrap()
    }

    pub async fn user(&self, id: &str) -> BikeUser {
        self.users.get(&UserId::new(id)).await.unwrap().unwrap()
    }
}

pub fn provider() -> ParticipantRef {
    ParticipantRef::provider("P1")
}

pub fn bike(id: &str, status: BikeStatus) -> Bike {
    Bike::new(id, provider()).with_status(status)
}

/// A bike already rented by `user`, with the matching user record.
pub fn rented(id: &str, user: &str) -> (Bike, BikeUser) {
    let mut bike = bike(id, BikeStatus::Available);
    bike.rent(ParticipantRef::user(user)).unwrap();
    let mut renter = BikeUser::new(user);
    renter.active_bike_ids.insert(&bike.id);
    (bike, renter)
}

/// Writes a transaction CSV with the standard header followed by `rows`.
pub fn transactions_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "type, tx, bike, participant, time").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

pub fn registry_json(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{json}").unwrap();
    file
}
