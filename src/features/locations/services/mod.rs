mod location_repository;
mod location_store;

pub use location_repository::{InMemoryLocationRepository, LocationRepository};
pub use location_store::{LocationStore, StoreRejection};
