use super::bike::{Bike, BikeId};
use super::event::BikeEvent;
use super::participant::ParticipantRef;
use super::user::{BikeUser, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Bike records, kept under the `org.bikesharing.biznet.Bike` namespace.
#[async_trait]
pub trait BikeStore: Send + Sync {
    async fn get(&self, id: &BikeId) -> Result<Option<Bike>>;
    /// Replaces the whole record, inserting it if absent.
    async fn update(&self, bike: Bike) -> Result<()>;
    async fn all(&self) -> Result<Vec<Bike>>;
}

/// Bike user records, kept under the `org.bikesharing.biznet.BikeUser` namespace.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: &UserId) -> Result<Option<BikeUser>>;
    /// Replaces the whole record, inserting it if absent.
    async fn update(&self, user: BikeUser) -> Result<()>;
    async fn all(&self) -> Result<Vec<BikeUser>>;
}

/// Resolves the participant invoking the current transaction.
pub trait IdentityService: Send + Sync {
    fn current_participant(&self) -> Option<ParticipantRef>;
}

/// Publishes events to external listeners.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn emit(&self, event: BikeEvent) -> Result<()>;
}

pub type BikeStoreBox = Box<dyn BikeStore>;
pub type UserStoreBox = Box<dyn UserStore>;
pub type IdentityServiceBox = Box<dyn IdentityService>;
pub type EventBusBox = Box<dyn EventBus>;
