use crate::domain::authorization::{authorize_renter, check_participant};
use crate::domain::bike::{Bike, BikeId};
use crate::domain::event::BikeEvent;
use crate::domain::participant::ParticipantRef;
use crate::domain::ports::{BikeStoreBox, EventBusBox, IdentityServiceBox, UserStoreBox};
use crate::domain::transaction::{Transaction, TransactionKind};
use crate::domain::user::{BikeUser, UserId};
use crate::error::{LedgerError, Result};
use tracing::{debug, error, warn};

/// Records as they were before the transaction touched them.
struct Snapshot {
    bike: Bike,
    user: Option<BikeUser>,
}

/// Applies release, callback, rent and return transactions to the ledger.
///
/// Each handler validates the transition against the current records,
/// authorizes the invoking participant, writes the mutated records back and
/// emits a `BikeEvent`. Handlers run one at a time; the host serializes
/// transactions before they reach the engine.
pub struct TransitionEngine {
    bike_store: BikeStoreBox,
    user_store: UserStoreBox,
    event_bus: EventBusBox,
    identity: Option<IdentityServiceBox>,
}

impl TransitionEngine {
    /// Creates a new `TransitionEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `bike_store` - The store for bike records.
    /// * `user_store` - The store for bike user records.
    /// * `event_bus` - Where completed transitions are published.
    pub fn new(bike_store: BikeStoreBox, user_store: UserStoreBox, event_bus: EventBusBox) -> Self {
        Self {
            bike_store,
            user_store,
            event_bus,
            identity: None,
        }
    }

    /// Sets the identity service consulted for transactions that carry no
    /// participant.
    pub fn with_identity(mut self, identity: IdentityServiceBox) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Dispatches a transaction to the handler for its kind.
    pub async fn process_transaction(&self, tx: Transaction) -> Result<()> {
        let outcome = match tx.kind {
            TransactionKind::Release => self.handle_release(&tx).await,
            TransactionKind::Callback => self.handle_callback(&tx).await,
            TransactionKind::Rent => self.handle_rent(&tx).await,
            TransactionKind::Return => self.handle_return(&tx).await,
        };
        if let Err(err) = &outcome {
            warn!(
                tx = %tx.fully_qualified_id(),
                bike = %tx.bike,
                error = %err,
                "transaction rejected"
            );
        }
        outcome
    }

    /// Puts a bike up for rent. Only its provider may do so, and not while
    /// the bike is in use.
    pub async fn handle_release(&self, tx: &Transaction) -> Result<()> {
        let invoker = self.invoking_participant(tx);
        let mut bike = self.load_bike(&tx.bike).await?;
        let original = bike.clone();

        bike.release()?;
        check_participant(invoker.as_ref(), original.provider.as_ref())?;

        self.commit(tx, Snapshot { bike: original, user: None }, bike, None)
            .await
    }

    /// Calls a bike back to its provider, whatever its status. Calling back a
    /// rented bike ends the rental.
    pub async fn handle_callback(&self, tx: &Transaction) -> Result<()> {
        let invoker = self.invoking_participant(tx);
        let mut bike = self.load_bike(&tx.bike).await?;
        let original = bike.clone();

        check_participant(invoker.as_ref(), original.provider.as_ref())?;
        let former_renter = bike.call_back().and_then(|renter| renter.user_id());

        let mut snapshot = Snapshot {
            bike: original,
            user: None,
        };
        let mut user = None;
        if let Some(user_id) = former_renter {
            match self.user_store.get(&user_id).await? {
                Some(mut renter) => {
                    snapshot.user = Some(renter.clone());
                    renter.active_bike_ids.remove(&bike.id);
                    user = Some(renter);
                }
                None => warn!(user = %user_id, bike = %bike.id, "renter of called back bike not found"),
            }
        }
        self.commit(tx, snapshot, bike, user).await
    }

    /// Rents an available bike to the invoking bike user.
    pub async fn handle_rent(&self, tx: &Transaction) -> Result<()> {
        let mut bike = self.load_bike(&tx.bike).await?;
        bike.ensure_rentable()?;
        let renter = self.invoking_participant(tx);
        let user_id = authorize_renter(renter.as_ref())?;
        let original_bike = bike.clone();
        bike.rent(ParticipantRef::user(user_id.as_str()))?;

        let mut user = self.load_user(&user_id).await?;
        let original_user = user.clone();
        user.active_bike_ids.insert(&bike.id);

        let snapshot = Snapshot {
            bike: original_bike,
            user: Some(original_user),
        };
        self.commit(tx, snapshot, bike, Some(user)).await
    }

    /// Ends a rental. Only the bike's active user may return it.
    pub async fn handle_return(&self, tx: &Transaction) -> Result<()> {
        let invoker = self.invoking_participant(tx);
        let mut bike = self.load_bike(&tx.bike).await?;
        let original_bike = bike.clone();

        let returning = check_participant(invoker.as_ref(), bike.active_user.as_ref())?;
        let user_id = authorize_renter(Some(&returning))?;
        let mut user = self.load_user(&user_id).await?;
        let original_user = user.clone();

        bike.end_rental();
        user.active_bike_ids.remove(&bike.id);

        let snapshot = Snapshot {
            bike: original_bike,
            user: Some(original_user),
        };
        self.commit(tx, snapshot, bike, Some(user)).await
    }

    /// Consumes the engine and returns every bike record, sorted by id.
    pub async fn into_results(self) -> Result<Vec<Bike>> {
        let mut bikes = self.bike_store.all().await?;
        bikes.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(bikes)
    }

    fn invoking_participant(&self, tx: &Transaction) -> Option<ParticipantRef> {
        tx.participant.clone().or_else(|| {
            self.identity
                .as_ref()
                .and_then(|identity| identity.current_participant())
        })
    }

    async fn load_bike(&self, id: &BikeId) -> Result<Bike> {
        self.bike_store
            .get(id)
            .await?
            .ok_or_else(|| LedgerError::BikeNotFound(id.clone()))
    }

    async fn load_user(&self, id: &UserId) -> Result<BikeUser> {
        self.user_store
            .get(id)
            .await?
            .ok_or_else(|| LedgerError::UserNotFound(id.clone()))
    }

    /// Writes the mutated records and publishes the event. Any failure after
    /// the first write puts the snapshot back before the error is returned.
    async fn commit(
        &self,
        tx: &Transaction,
        snapshot: Snapshot,
        bike: Bike,
        user: Option<BikeUser>,
    ) -> Result<()> {
        let event = BikeEvent::for_transition(tx, &bike);
        let status = bike.status;

        self.update_bike(bike).await?;
        if let Some(user) = user
            && let Err(err) = self.update_bike_user(user).await
        {
            self.restore(tx, snapshot.bike, None).await;
            return Err(err);
        }
        if let Err(err) = self.event_bus.emit(event).await {
            self.restore(tx, snapshot.bike, snapshot.user).await;
            return Err(err);
        }

        debug!(
            tx = %tx.fully_qualified_id(),
            bike = %tx.bike,
            %status,
            "transition applied"
        );
        Ok(())
    }

    async fn update_bike(&self, bike: Bike) -> Result<()> {
        debug!(bike = %bike.id, status = %bike.status, "updating bike");
        self.bike_store.update(bike).await
    }

    async fn update_bike_user(&self, user: BikeUser) -> Result<()> {
        debug!(user = %user.id, active_bikes = user.active_bike_ids.len(), "updating bike user");
        self.user_store.update(user).await
    }

    async fn restore(&self, tx: &Transaction, bike: Bike, user: Option<BikeUser>) {
        warn!(tx = %tx.fully_qualified_id(), bike = %bike.id, "restoring records");
        let bike_id = bike.id.clone();
        if let Err(err) = self.bike_store.update(bike).await {
            error!(bike = %bike_id, error = %err, "failed to restore bike");
        }
        if let Some(user) = user {
            let user_id = user.id.clone();
            if let Err(err) = self.user_store.update(user).await {
                error!(user = %user_id, error = %err, "failed to restore bike user");
            }
        }
    }
}
