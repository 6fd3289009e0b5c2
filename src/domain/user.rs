use super::bike::BikeId;
use super::participant::ParticipantRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local identifier of a bike user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully-qualified ids of the bikes a user is renting, in rental order.
///
/// Behaves as an ordered set: inserting a present id and removing an absent
/// one are both no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveBikes(Vec<String>);

impl ActiveBikes {
    /// Returns `true` if the bike was not present yet.
    pub fn insert(&mut self, bike: &BikeId) -> bool {
        let id = bike.fully_qualified();
        if self.0.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Returns `true` if the bike was present.
    pub fn remove(&mut self, bike: &BikeId) -> bool {
        let id = bike.fully_qualified();
        let before = self.0.len();
        self.0.retain(|b| *b != id);
        self.0.len() != before
    }

    pub fn contains(&self, bike: &BikeId) -> bool {
        self.0.contains(&bike.fully_qualified())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// A participant capable of renting bikes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BikeUser {
    pub id: UserId,
    #[serde(default)]
    pub active_bike_ids: ActiveBikes,
}

impl BikeUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            active_bike_ids: ActiveBikes::default(),
        }
    }

    pub fn participant(&self) -> ParticipantRef {
        ParticipantRef::user(self.id.as_str())
    }
}
