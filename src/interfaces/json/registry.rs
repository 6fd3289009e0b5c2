use crate::domain::bike::{Bike, BikeStatus};
use crate::domain::ports::{BikeStore, UserStore};
use crate::domain::user::BikeUser;
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use tracing::info;

/// Initial records to register before processing transactions.
///
/// ```json
/// {
///   "bikes": [{ "id": "B1", "status": "AVAILABLE", "provider": "BikeProvider#P1" }],
///   "users": [{ "id": "U1" }]
/// }
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub bikes: Vec<Bike>,
    #[serde(default)]
    pub users: Vec<BikeUser>,
}

impl Registry {
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let registry: Self = serde_json::from_reader(source)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Rejects duplicate records, bikes whose status and active user
    /// disagree, and rentals that are not mirrored on both sides.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for bike in &self.bikes {
            if !seen.insert(&bike.id) {
                return Err(LedgerError::InvalidRecord(format!(
                    "bike {} is registered twice",
                    bike.id
                )));
            }
            bike.validate()?;
            if let Some(user_id) = bike.active_user.as_ref().and_then(|u| u.user_id()) {
                let mirrored = self
                    .users
                    .iter()
                    .any(|u| u.id == user_id && u.active_bike_ids.contains(&bike.id));
                if !mirrored {
                    return Err(LedgerError::InvalidRecord(format!(
                        "bike {} is rented by {} but missing from their active bikes",
                        bike.id, user_id
                    )));
                }
            }
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if !seen.insert(&user.id) {
                return Err(LedgerError::InvalidRecord(format!(
                    "user {} is registered twice",
                    user.id
                )));
            }
            let participant = user.participant();
            for fq_id in user.active_bike_ids.iter() {
                let rented = self.bikes.iter().any(|b| {
                    b.fully_qualified_id() == fq_id
                        && b.status == BikeStatus::InUse
                        && b.active_user.as_ref() == Some(&participant)
                });
                if !rented {
                    return Err(LedgerError::InvalidRecord(format!(
                        "user {} lists {} which they are not renting",
                        user.id, fq_id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Upserts every record into the stores.
    pub async fn load_into(self, bikes: &dyn BikeStore, users: &dyn UserStore) -> Result<()> {
        let (bike_count, user_count) = (self.bikes.len(), self.users.len());
        for bike in self.bikes {
            bikes.update(bike).await?;
        }
        for user in self.users {
            users.update(user).await?;
        }
        info!(bikes = bike_count, users = user_count, "registry loaded");
        Ok(())
    }
}
