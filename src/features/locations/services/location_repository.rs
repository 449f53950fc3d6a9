use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::locations::models::{Location, LocationId};

/// Persistence seam behind the map surfaces.
///
/// A surface loads once with `fetch_all` at mount and writes through after each
/// applied mutation. The surface stays locked until the write has answered.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Location>>;

    /// Store a location and return it as persisted. A temporary id is replaced
    /// by a permanent one.
    async fn persist(&self, location: &Location) -> Result<Location>;

    /// Remove a location. Removing an absent id is not an error.
    async fn remove(&self, id: &LocationId) -> Result<()>;
}

/// Volatile repository shared by every surface of the process
#[derive(Default)]
pub struct InMemoryLocationRepository {
    records: RwLock<HashMap<LocationId, Location>>,
}

impl InMemoryLocationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locations(locations: impl IntoIterator<Item = Location>) -> Self {
        let records = locations
            .into_iter()
            .map(|location| (location.id.clone(), location))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn fetch_all(&self) -> Result<Vec<Location>> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn persist(&self, location: &Location) -> Result<Location> {
        let mut persisted = location.clone();
        if persisted.id.is_temporary() {
            persisted.id = LocationId::permanent(Uuid::new_v4());
        }

        let mut records = self.records.write().await;
        records.insert(persisted.id.clone(), persisted.clone());

        tracing::debug!("Persisted location {} (submitted as {})", persisted.id, location.id);

        Ok(persisted)
    }

    async fn remove(&self, id: &LocationId) -> Result<()> {
        let mut records = self.records.write().await;
        if records.remove(id).is_none() {
            tracing::debug!("Remove of unknown location {} ignored", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::locations::models::demo_locations;

    #[tokio::test]
    async fn test_fetch_all_returns_seeded_records() {
        let repository = InMemoryLocationRepository::with_locations(demo_locations());
        let all = repository.fetch_all().await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn test_persist_assigns_permanent_id_to_temporary_record() {
        let repository = InMemoryLocationRepository::new();
        let mut location = demo_locations().remove(0);
        location.id = LocationId::temporary();

        let persisted = repository.persist(&location).await.unwrap();

        assert!(!persisted.id.is_temporary());
        assert_eq!(persisted.name, location.name);
        let all = repository.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, persisted.id);
    }

    #[tokio::test]
    async fn test_persist_keeps_permanent_id() {
        let repository = InMemoryLocationRepository::with_locations(demo_locations());
        let mut location = demo_locations().remove(1);
        location.name = "Cairo Rd".to_string();

        let persisted = repository.persist(&location).await.unwrap();

        assert_eq!(persisted.id, LocationId::from("2"));
        assert_eq!(repository.fetch_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_ok() {
        let repository = InMemoryLocationRepository::with_locations(demo_locations());
        repository.remove(&LocationId::from("missing")).await.unwrap();
        repository.remove(&LocationId::from("1")).await.unwrap();
        assert_eq!(repository.fetch_all().await.unwrap().len(), 4);
    }
}
