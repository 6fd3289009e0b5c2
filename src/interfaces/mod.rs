//! Host-facing formats: CSV transactions and listings, JSON seed registries.

pub mod csv;
pub mod json;
