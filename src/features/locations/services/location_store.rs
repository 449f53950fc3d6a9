use std::collections::HashMap;

use chrono::Utc;
use thiserror::Error;

use crate::features::locations::models::{
    Location, LocationCategory, LocationId, LocationStatus, NewLocation,
};

/// Placeholder values for a freshly placed pin, replaced when the contributor saves the form
pub const NEW_LOCATION_NAME: &str = "New Location";
pub const NEW_LOCATION_DESCRIPTION: &str = "Click to edit details";

/// Why a store mutation left the collection untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreRejection {
    #[error("Location {0} not found")]
    NotFound(LocationId),

    #[error("Status transition {from} -> {to} is not permitted")]
    InvalidTransition {
        from: LocationStatus,
        to: LocationStatus,
    },

    #[error("Location {0} already exists")]
    DuplicateId(LocationId),
}

pub type StoreResult<T> = std::result::Result<T, StoreRejection>;

/// Canonical in-memory collection of locations for one map surface.
///
/// Records live in a `Vec` with an id index next to it, so lookups, updates and
/// deletes are O(1). Deletion swaps the last record into the hole; callers must
/// not rely on insertion order. Every mutation that changes a record bumps
/// `revision`, which downstream filtered views use to detect staleness.
#[derive(Debug, Default)]
pub struct LocationStore {
    records: Vec<Location>,
    index: HashMap<LocationId, usize>,
    revision: u64,
}

impl LocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a one-shot load. A repeated id keeps the last record.
    pub fn from_locations(locations: impl IntoIterator<Item = Location>) -> Self {
        let mut store = Self::new();
        for location in locations {
            match store.index.get(&location.id) {
                Some(&idx) => store.records[idx] = location,
                None => {
                    store.index.insert(location.id.clone(), store.records.len());
                    store.records.push(location);
                }
            }
        }
        store
    }

    pub fn list(&self) -> &[Location] {
        &self.records
    }

    pub fn get(&self, id: &LocationId) -> Option<&Location> {
        self.index.get(id).map(|&idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Append a new pending location with a fresh temporary id
    pub fn add(&mut self, candidate: NewLocation) -> Location {
        let location = Location {
            id: LocationId::temporary(),
            name: candidate
                .name
                .unwrap_or_else(|| NEW_LOCATION_NAME.to_string()),
            description: Some(
                candidate
                    .description
                    .unwrap_or_else(|| NEW_LOCATION_DESCRIPTION.to_string()),
            ),
            category: candidate.category.unwrap_or(LocationCategory::Business),
            status: LocationStatus::Pending,
            lat: candidate.lat,
            lng: candidate.lng,
            contributor: candidate.contributor,
            contributor_id: candidate.contributor_id,
            date_added: Utc::now(),
            images: Vec::new(),
        };

        self.index.insert(location.id.clone(), self.records.len());
        self.records.push(location.clone());
        self.bump();

        tracing::debug!("Added location {} at ({}, {})", location.id, location.lat, location.lng);

        location
    }

    /// Replace the editable fields of the record matching `location.id`.
    ///
    /// Only name, description and category are taken from the submitted value.
    /// Coordinates, ownership and creation date are fixed at creation, status
    /// only moves through `set_status`, and images are accepted only when the
    /// submitted list extends the stored one.
    pub fn update(&mut self, location: Location) -> StoreResult<&Location> {
        let idx = *self
            .index
            .get(&location.id)
            .ok_or_else(|| StoreRejection::NotFound(location.id.clone()))?;

        let current = &mut self.records[idx];
        let mut changed = false;

        if current.name != location.name {
            current.name = location.name;
            changed = true;
        }
        if current.description != location.description {
            current.description = location.description;
            changed = true;
        }
        if current.category != location.category {
            current.category = location.category;
            changed = true;
        }
        if location.images.len() > current.images.len()
            && location.images.starts_with(&current.images)
        {
            current.images = location.images;
            changed = true;
        }

        if changed {
            self.bump();
        }

        Ok(&self.records[idx])
    }

    pub fn delete(&mut self, id: &LocationId) -> StoreResult<Location> {
        let idx = self
            .index
            .remove(id)
            .ok_or_else(|| StoreRejection::NotFound(id.clone()))?;

        let removed = self.records.swap_remove(idx);
        if let Some(moved) = self.records.get(idx) {
            self.index.insert(moved.id.clone(), idx);
        }
        self.bump();

        Ok(removed)
    }

    /// Moderation-only status change
    pub fn set_status(&mut self, id: &LocationId, status: LocationStatus) -> StoreResult<&Location> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| StoreRejection::NotFound(id.clone()))?;

        let current = self.records[idx].status;
        if !current.can_transition_to(status) {
            return Err(StoreRejection::InvalidTransition {
                from: current,
                to: status,
            });
        }

        self.records[idx].status = status;
        self.bump();

        Ok(&self.records[idx])
    }

    /// Swap a temporary id for the permanent one assigned by the repository
    pub fn rekey(&mut self, from: &LocationId, to: LocationId) -> StoreResult<&Location> {
        if self.index.contains_key(&to) {
            return Err(StoreRejection::DuplicateId(to));
        }
        let idx = self
            .index
            .remove(from)
            .ok_or_else(|| StoreRejection::NotFound(from.clone()))?;

        self.records[idx].id = to.clone();
        self.index.insert(to, idx);
        self.bump();

        Ok(&self.records[idx])
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::locations::models::{demo_locations, Coordinates};

    fn demo_store() -> LocationStore {
        LocationStore::from_locations(demo_locations())
    }

    #[test]
    fn test_add_creates_pending_location_with_fresh_id() {
        let mut store = demo_store();
        let before = store.len();

        let added = store.add(NewLocation::at(Coordinates::new(-15.41, 28.28), "u1"));

        assert_eq!(added.status, LocationStatus::Pending);
        assert!(added.id.is_temporary());
        assert_eq!(added.contributor_id, "u1");
        assert_eq!(added.name, NEW_LOCATION_NAME);
        assert_eq!(store.len(), before + 1);
        assert!(store.get(&added.id).is_some());

        let other = store.add(NewLocation::at(Coordinates::new(-15.41, 28.28), "u1"));
        assert_ne!(other.id, added.id);
    }

    #[test]
    fn test_update_missing_id_is_rejected_without_change() {
        let mut store = demo_store();
        let revision = store.revision();

        let mut ghost = store.list()[0].clone();
        ghost.id = LocationId::from("does-not-exist");
        ghost.name = "Ghost".to_string();

        let result = store.update(ghost);

        assert!(matches!(result, Err(StoreRejection::NotFound(_))));
        assert_eq!(store.revision(), revision);
        assert!(store.list().iter().all(|l| l.name != "Ghost"));
    }

    #[test]
    fn test_update_keeps_immutable_fields() {
        let mut store = demo_store();
        let id = LocationId::from("4");
        let original = store.get(&id).unwrap().clone();

        let mut edited = original.clone();
        edited.name = "Renamed".to_string();
        edited.category = LocationCategory::Landmark;
        edited.lat = 0.0;
        edited.contributor_id = "someone-else".to_string();
        edited.status = LocationStatus::Verified;

        let updated = store.update(edited).unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.category, LocationCategory::Landmark);
        assert_eq!(updated.lat, original.lat);
        assert_eq!(updated.contributor_id, original.contributor_id);
        assert_eq!(updated.status, LocationStatus::Pending);
        assert_eq!(updated.date_added, original.date_added);
    }

    #[test]
    fn test_update_images_are_append_only() {
        let mut store = demo_store();
        let id = LocationId::from("1");

        let mut extended = store.get(&id).unwrap().clone();
        extended.images.push("a.jpg".to_string());
        store.update(extended).unwrap();
        let appended = store.get(&id).unwrap().images.clone();
        assert_eq!(appended.last().map(String::as_str), Some("a.jpg"));

        let mut replaced = store.get(&id).unwrap().clone();
        replaced.images = vec!["b.jpg".to_string()];
        store.update(replaced).unwrap();
        assert_eq!(store.get(&id).unwrap().images, appended);
    }

    #[test]
    fn test_delete_keeps_index_consistent() {
        let mut store = demo_store();

        let removed = store.delete(&LocationId::from("1")).unwrap();
        assert_eq!(removed.name, "Cosmopolitan Mall");
        assert!(store.get(&LocationId::from("1")).is_none());

        for location in store.list() {
            assert_eq!(store.get(&location.id).unwrap().id, location.id);
        }

        assert!(matches!(
            store.delete(&LocationId::from("1")),
            Err(StoreRejection::NotFound(_))
        ));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_set_status_only_moves_pending() {
        let mut store = demo_store();

        let verified = store
            .set_status(&LocationId::from("3"), LocationStatus::Verified)
            .unwrap();
        assert_eq!(verified.status, LocationStatus::Verified);

        let result = store.set_status(&LocationId::from("3"), LocationStatus::Pending);
        assert_eq!(
            result.unwrap_err(),
            StoreRejection::InvalidTransition {
                from: LocationStatus::Verified,
                to: LocationStatus::Pending,
            }
        );
    }

    #[test]
    fn test_rekey_moves_record_to_permanent_id() {
        let mut store = LocationStore::new();
        let added = store.add(NewLocation::at(Coordinates::new(1.0, 2.0), "u1"));
        let permanent = LocationId::from("perm-1");

        store.rekey(&added.id, permanent.clone()).unwrap();

        assert!(store.get(&added.id).is_none());
        assert_eq!(store.get(&permanent).unwrap().lat, 1.0);
        assert!(matches!(
            store.rekey(&permanent, LocationId::from("perm-1")),
            Err(StoreRejection::DuplicateId(_))
        ));
    }
}
