use crate::domain::bike::{Bike, BikeId};
use crate::domain::participant::ParticipantRef;
use crate::domain::ports::{BikeStore, IdentityService, UserStore};
use crate::domain::user::{BikeUser, UserId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for bike records.
///
/// Uses `Arc<RwLock<HashMap<BikeId, Bike>>>` so clones share the same records.
#[derive(Default, Clone)]
pub struct InMemoryBikeStore {
    bikes: Arc<RwLock<HashMap<BikeId, Bike>>>,
}

impl InMemoryBikeStore {
    /// Creates a new, empty in-memory bike store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BikeStore for InMemoryBikeStore {
    async fn get(&self, id: &BikeId) -> Result<Option<Bike>> {
        let bikes = self.bikes.read().await;
        Ok(bikes.get(id).cloned())
    }

    async fn update(&self, bike: Bike) -> Result<()> {
        let mut bikes = self.bikes.write().await;
        bikes.insert(bike.id.clone(), bike);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Bike>> {
        let bikes = self.bikes.read().await;
        Ok(bikes.values().cloned().collect())
    }
}

/// A thread-safe in-memory store for bike user records.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<UserId, BikeUser>>>,
}

impl InMemoryUserStore {
    /// Creates a new, empty in-memory user store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, id: &UserId) -> Result<Option<BikeUser>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn update(&self, user: BikeUser) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<BikeUser>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }
}

/// Identity service that always answers with the same participant.
#[derive(Debug, Default, Clone)]
pub struct StaticIdentity {
    participant: Option<ParticipantRef>,
}

impl StaticIdentity {
    pub fn new(participant: ParticipantRef) -> Self {
        Self {
            participant: Some(participant),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl IdentityService for StaticIdentity {
    fn current_participant(&self) -> Option<ParticipantRef> {
        self.participant.clone()
    }
}
