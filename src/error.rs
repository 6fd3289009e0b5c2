use crate::domain::bike::BikeId;
use crate::domain::user::UserId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Illegal state: {0}")]
    IllegalState(String),
    #[error("Authorization error: {0}")]
    Authorization(String),
    #[error("Bike not found: {0}")]
    BikeNotFound(BikeId),
    #[error("Bike user not found: {0}")]
    UserNotFound(UserId),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Event bus error: {0}")]
    EventBus(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
