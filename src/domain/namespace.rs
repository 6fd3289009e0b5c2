//! Fixed namespaces of the bike-sharing business network.
//!
//! Every record is addressed by a fully-qualified identifier of the form
//! `<namespace>#<id>`.

pub const PACKAGE: &str = "org.bikesharing.biznet";

pub const BIKE: &str = "org.bikesharing.biznet.Bike";
pub const BIKE_USER: &str = "org.bikesharing.biznet.BikeUser";
pub const BIKE_PROVIDER: &str = "org.bikesharing.biznet.BikeProvider";
pub const BIKE_EVENT: &str = "org.bikesharing.biznet.BikeEvent";

pub const RELEASE_TRANSACTION: &str = "org.bikesharing.biznet.BikeReleaseTransaction";
pub const CALLBACK_TRANSACTION: &str = "org.bikesharing.biznet.BikeCallbackTransaction";
pub const RENT_TRANSACTION: &str = "org.bikesharing.biznet.BikeRentTransaction";
pub const RETURN_TRANSACTION: &str = "org.bikesharing.biznet.BikeReturnTransaction";

/// Joins a namespace and a local id into a fully-qualified identifier.
pub fn qualify(namespace: &str, id: &str) -> String {
    format!("{namespace}#{id}")
}
