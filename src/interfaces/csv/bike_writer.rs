use crate::domain::bike::{Bike, BikeStatus};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BikeRow {
    bike: String,
    status: BikeStatus,
    provider: String,
    active_user: String,
}

impl From<Bike> for BikeRow {
    fn from(bike: Bike) -> Self {
        Self {
            bike: bike.id.to_string(),
            status: bike.status,
            provider: bike.provider.map(String::from).unwrap_or_default(),
            active_user: bike.active_user.map(String::from).unwrap_or_default(),
        }
    }
}

/// Writes the bike listing as CSV: `bike,status,provider,active_user`.
pub struct BikeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BikeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_bikes(&mut self, bikes: impl IntoIterator<Item = Bike>) -> Result<()> {
        for bike in bikes {
            self.writer.serialize(BikeRow::from(bike))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
