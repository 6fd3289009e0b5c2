use super::namespace;
use super::participant::ParticipantRef;
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local identifier of a bike asset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BikeId(String);

impl BikeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn fully_qualified(&self) -> String {
        namespace::qualify(namespace::BIKE, &self.0)
    }
}

impl fmt::Display for BikeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BikeStatus {
    InStore,
    Available,
    InUse,
    Callback,
}

impl BikeStatus {
    pub const ALL: [BikeStatus; 4] = [
        BikeStatus::InStore,
        BikeStatus::Available,
        BikeStatus::InUse,
        BikeStatus::Callback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStore => "INSTORE",
            Self::Available => "AVAILABLE",
            Self::InUse => "INUSE",
            Self::Callback => "CALLBACK",
        }
    }
}

impl fmt::Display for BikeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rentable bike asset.
///
/// `active_user` is set exactly while the bike is `INUSE`; the transition
/// methods below keep the two fields in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bike {
    pub id: BikeId,
    pub status: BikeStatus,
    /// The provider owning the bike; only it may release or call it back.
    #[serde(default)]
    pub provider: Option<ParticipantRef>,
    /// The bike user currently renting the bike.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_user: Option<ParticipantRef>,
}

impl Bike {
    /// Registers a new bike in the store of its provider.
    pub fn new(id: impl Into<String>, provider: ParticipantRef) -> Self {
        Self {
            id: BikeId::new(id),
            status: BikeStatus::InStore,
            provider: Some(provider),
            active_user: None,
        }
    }

    pub fn with_status(mut self, status: BikeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn fully_qualified_id(&self) -> String {
        self.id.fully_qualified()
    }

    /// Makes the bike available for rent. A bike in use cannot be released.
    pub fn release(&mut self) -> Result<()> {
        if self.status == BikeStatus::InUse {
            return Err(LedgerError::IllegalState(format!(
                "You cannot release a bike which is already \"INUSE\": {}",
                self.id
            )));
        }
        self.status = BikeStatus::Available;
        Ok(())
    }

    /// Calls the bike back to its provider. Allowed from any status; a
    /// running rental ends and the former renter is returned.
    pub fn call_back(&mut self) -> Option<ParticipantRef> {
        self.status = BikeStatus::Callback;
        self.active_user.take()
    }

    /// Fails unless the bike is `AVAILABLE`.
    pub fn ensure_rentable(&self) -> Result<()> {
        if self.status != BikeStatus::Available {
            return Err(LedgerError::IllegalState(format!(
                "You cannot rent a bike which is not \"AVAILABLE\": {} is {}",
                self.id, self.status
            )));
        }
        Ok(())
    }

    /// Hands the bike over to `user`.
    pub fn rent(&mut self, user: ParticipantRef) -> Result<()> {
        self.ensure_rentable()?;
        self.status = BikeStatus::InUse;
        self.active_user = Some(user);
        Ok(())
    }

    /// Ends the current rental and returns the former renter.
    pub fn end_rental(&mut self) -> Option<ParticipantRef> {
        self.status = BikeStatus::Available;
        self.active_user.take()
    }

    /// Checks that `active_user` and `status` agree and that only a bike
    /// user can hold the bike.
    pub fn validate(&self) -> Result<()> {
        match (self.status, &self.active_user) {
            (_, Some(user)) if user.user_id().is_none() => {
                Err(LedgerError::InvalidRecord(format!(
                    "bike {} has active user {} which is not a bike user",
                    self.id, user
                )))
            }
            (BikeStatus::InUse, None) => Err(LedgerError::InvalidRecord(format!(
                "bike {} is INUSE without an active user",
                self.id
            ))),
            (status, Some(user)) if status != BikeStatus::InUse => {
                Err(LedgerError::InvalidRecord(format!(
                    "bike {} is {} but has active user {}",
                    self.id, status, user
                )))
            }
            _ => Ok(()),
        }
    }
}
