use crate::domain::bike::BikeId;
use crate::domain::participant::ParticipantRef;
use crate::domain::transaction::{Transaction, TransactionKind};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::io::Read;

/// One row of a transaction CSV: `type, tx, bike, participant, time`.
#[derive(Debug, Deserialize)]
struct TransactionRecord {
    #[serde(rename = "type")]
    kind: TransactionKind,
    tx: String,
    bike: BikeId,
    participant: Option<ParticipantRef>,
    time: Option<DateTime<Utc>>,
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        let mut tx = Transaction::new(record.kind, record.tx, record.bike);
        tx.participant = record.participant;
        if let Some(time) = record.time {
            tx.time = time;
        }
        tx
    }
}

/// Reads transactions from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<Transaction>`.
/// It handles whitespace trimming and flexible record lengths automatically.
/// Empty `participant` and `time` fields are allowed; a missing time is taken
/// as the moment the row is read.
pub struct TransactionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TransactionReader<R> {
    /// Creates a new `TransactionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes transactions.
    pub fn transactions(self) -> impl Iterator<Item = Result<Transaction>> {
        self.reader
            .into_deserialize::<TransactionRecord>()
            .map(|result| result.map(Transaction::from).map_err(LedgerError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "type, tx, bike, participant, time\n\
                    release, t1, B1, BikeProvider#P1, 2024-05-01T10:00:00Z\n\
                    rent, t2, B1, org.bikesharing.biznet.BikeUser#U1, 2024-05-01T10:05:00Z";
        let reader = TransactionReader::new(data.as_bytes());
        let results: Vec<Result<Transaction>> = reader.transactions().collect();

        assert_eq!(results.len(), 2);
        let release = results[0].as_ref().unwrap();
        assert_eq!(release.kind, TransactionKind::Release);
        assert_eq!(release.bike, BikeId::new("B1"));
        assert_eq!(release.participant, Some(ParticipantRef::provider("P1")));
        assert_eq!(release.time.to_rfc3339(), "2024-05-01T10:00:00+00:00");

        let rent = results[1].as_ref().unwrap();
        assert_eq!(rent.kind, TransactionKind::Rent);
        assert_eq!(rent.participant, Some(ParticipantRef::user("U1")));
    }

    #[test]
    fn test_reader_optional_fields() {
        let data = "type, tx, bike, participant, time\ncallback, t1, B1, ,";
        let reader = TransactionReader::new(data.as_bytes());
        let results: Vec<Result<Transaction>> = reader.transactions().collect();

        let tx = results[0].as_ref().unwrap();
        assert_eq!(tx.kind, TransactionKind::Callback);
        assert_eq!(tx.participant, None);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "type, tx, bike, participant, time\n\
                    steal, t1, B1, BikeUser#U1,\n\
                    rent, t2, B1, U1,\n\
                    return, t3, B1, BikeUser#U1,";
        let reader = TransactionReader::new(data.as_bytes());
        let results: Vec<Result<Transaction>> = reader.transactions().collect();

        assert!(results[0].is_err());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
