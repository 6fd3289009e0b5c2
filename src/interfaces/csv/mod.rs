pub mod bike_writer;
pub mod transaction_reader;
