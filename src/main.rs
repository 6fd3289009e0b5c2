use bikeledger::application::engine::TransitionEngine;
use bikeledger::domain::event::BikeEvent;
use bikeledger::domain::ports::{BikeStoreBox, UserStoreBox};
use bikeledger::infrastructure::broadcast::BroadcastEventBus;
use bikeledger::infrastructure::in_memory::{InMemoryBikeStore, InMemoryUserStore};
use bikeledger::interfaces::csv::bike_writer::BikeWriter;
use bikeledger::interfaces::csv::transaction_reader::TransactionReader;
use bikeledger::interfaces::json::registry::Registry;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input transactions CSV file
    input: PathBuf,

    /// JSON registry of bikes and users to load before processing
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Print every emitted event to stderr
    #[arg(long)]
    listen: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let (bike_store, user_store) = open_stores(cli.db_path.as_deref())?;

    if let Some(seed) = &cli.seed {
        let file = File::open(seed).into_diagnostic()?;
        Registry::from_reader(file)
            .into_diagnostic()?
            .load_into(bike_store.as_ref(), user_store.as_ref())
            .await
            .into_diagnostic()?;
    }

    let event_bus = BroadcastEventBus::default();
    let listener = cli
        .listen
        .then(|| tokio::spawn(print_events(event_bus.subscribe())));

    let engine = TransitionEngine::new(bike_store, user_store, Box::new(event_bus));

    // Process transactions
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = TransactionReader::new(file);
    let (mut applied, mut rejected) = (0usize, 0usize);
    for tx_result in reader.transactions() {
        match tx_result {
            Ok(tx) => match engine.process_transaction(tx).await {
                Ok(()) => applied += 1,
                Err(e) => {
                    rejected += 1;
                    eprintln!("Error processing transaction: {}", e);
                }
            },
            Err(e) => {
                eprintln!("Error reading transaction: {}", e);
            }
        }
    }
    info!(applied, rejected, "transactions processed");

    // Dropping the engine closes the event channel, which ends the listener.
    let bikes = engine.into_results().await.into_diagnostic()?;
    if let Some(listener) = listener {
        listener.await.into_diagnostic()?;
    }

    let stdout = io::stdout();
    let mut writer = BikeWriter::new(stdout.lock());
    writer.write_bikes(bikes).into_diagnostic()?;

    Ok(())
}

fn in_memory_stores() -> (BikeStoreBox, UserStoreBox) {
    (
        Box::new(InMemoryBikeStore::new()),
        Box::new(InMemoryUserStore::new()),
    )
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<&Path>) -> Result<(BikeStoreBox, UserStoreBox)> {
    use bikeledger::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            let store = RocksDBStore::open(path).into_diagnostic()?;
            info!(path = %path.display(), "opened RocksDB store");
            Ok((Box::new(store.clone()), Box::new(store)))
        }
        None => Ok(in_memory_stores()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<&Path>) -> Result<(BikeStoreBox, UserStoreBox)> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_stores())
}

async fn print_events(mut events: Receiver<BikeEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => eprintln!(
                "event {} bike={} time={} tx={}",
                event.fully_qualified_id(),
                event.bike.fully_qualified(),
                event.time.to_rfc3339(),
                event.transaction_id
            ),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "event listener lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}
