//! Domain layer: records, transitions and the ports to the outside world.

pub mod authorization;
pub mod bike;
pub mod event;
pub mod namespace;
pub mod participant;
pub mod ports;
pub mod transaction;
pub mod user;
