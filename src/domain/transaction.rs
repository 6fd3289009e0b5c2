use super::bike::BikeId;
use super::namespace;
use super::participant::ParticipantRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Release,
    Callback,
    Rent,
    Return,
}

impl TransactionKind {
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Release => namespace::RELEASE_TRANSACTION,
            Self::Callback => namespace::CALLBACK_TRANSACTION,
            Self::Rent => namespace::RENT_TRANSACTION,
            Self::Return => namespace::RETURN_TRANSACTION,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Release => "release",
            Self::Callback => "callback",
            Self::Rent => "rent",
            Self::Return => "return",
        };
        f.write_str(name)
    }
}

/// A transaction delivered by the dispatcher. Consumed once, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub id: String,
    pub bike: BikeId,
    /// The invoking participant: the provider for release and callback, the
    /// renting user for rent and return. When absent the engine falls back
    /// to its identity service.
    pub participant: Option<ParticipantRef>,
    pub time: DateTime<Utc>,
}

impl Transaction {
    pub fn new(kind: TransactionKind, id: impl Into<String>, bike: BikeId) -> Self {
        Self {
            kind,
            id: id.into(),
            bike,
            participant: None,
            time: Utc::now(),
        }
    }

    pub fn release(id: impl Into<String>, bike: BikeId, provider: ParticipantRef) -> Self {
        Self::new(TransactionKind::Release, id, bike).by(provider)
    }

    pub fn callback(id: impl Into<String>, bike: BikeId, provider: ParticipantRef) -> Self {
        Self::new(TransactionKind::Callback, id, bike).by(provider)
    }

    pub fn rent(id: impl Into<String>, bike: BikeId, user: ParticipantRef) -> Self {
        Self::new(TransactionKind::Rent, id, bike).by(user)
    }

    pub fn give_back(id: impl Into<String>, bike: BikeId, user: ParticipantRef) -> Self {
        Self::new(TransactionKind::Return, id, bike).by(user)
    }

    pub fn by(mut self, participant: ParticipantRef) -> Self {
        self.participant = Some(participant);
        self
    }

    pub fn at(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    pub fn fully_qualified_id(&self) -> String {
        namespace::qualify(self.kind.namespace(), &self.id)
    }
}
