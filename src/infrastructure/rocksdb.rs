use crate::domain::bike::{Bike, BikeId};
use crate::domain::namespace;
use crate::domain::ports::{BikeStore, UserStore};
use crate::domain::user::{BikeUser, UserId};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Column Family holding bike records.
pub const CF_BIKES: &str = namespace::BIKE;
/// Column Family holding bike user records.
pub const CF_USERS: &str = namespace::BIKE_USER;

/// A persistent record store backed by RocksDB.
///
/// Bikes and users live in separate Column Families named after their
/// namespaces, keyed by local id, with JSON values.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, creating
    /// the bike and user Column Families if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_bikes = ColumnFamilyDescriptor::new(CF_BIKES, Options::default());
        let cf_users = ColumnFamilyDescriptor::new(CF_USERS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_bikes, cf_users])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn column_family(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            LedgerError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn put<T: Serialize>(&self, cf_name: &str, key: &str, value: &T) -> Result<()> {
        let cf = self.column_family(cf_name)?;
        let bytes = serde_json::to_vec(value)?;
        self.db.put_cf(cf, key.as_bytes(), bytes)?;
        debug!(cf = cf_name, key, "record written");
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(&self, cf_name: &str, key: &str) -> Result<Option<T>> {
        let cf = self.column_family(cf_name)?;
        match self.db.get_pinned_cf(cf, key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.column_family(cf_name)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }
}

#[async_trait]
impl BikeStore for RocksDBStore {
    async fn get(&self, id: &BikeId) -> Result<Option<Bike>> {
        self.fetch(CF_BIKES, id.as_str())
    }

    async fn update(&self, bike: Bike) -> Result<()> {
        self.put(CF_BIKES, bike.id.as_str(), &bike)
    }

    async fn all(&self) -> Result<Vec<Bike>> {
        self.scan(CF_BIKES)
    }
}

#[async_trait]
impl UserStore for RocksDBStore {
    async fn get(&self, id: &UserId) -> Result<Option<BikeUser>> {
        self.fetch(CF_USERS, id.as_str())
    }

    async fn update(&self, user: BikeUser) -> Result<()> {
        self.put(CF_USERS, user.id.as_str(), &user)
    }

    async fn all(&self) -> Result<Vec<BikeUser>> {
        self.scan(CF_USERS)
    }
}
