use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::locations::models::{LocationCategory, LocationStatus};

/// User-adjustable visibility filter of one map surface.
///
/// Both sets are positive membership tests: an empty set hides everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapFilters {
    pub categories: BTreeSet<LocationCategory>,
    pub status: BTreeSet<LocationStatus>,
    pub only_mine: bool,
}

impl Default for MapFilters {
    fn default() -> Self {
        Self {
            categories: LocationCategory::ALL.into_iter().collect(),
            status: LocationStatus::ALL.into_iter().collect(),
            only_mine: false,
        }
    }
}

impl MapFilters {
    /// Flip membership of one category. Returns whether it is now selected.
    pub fn toggle_category(&mut self, category: LocationCategory) -> bool {
        toggle(&mut self.categories, category)
    }

    /// Flip membership of one status. Returns whether it is now selected.
    pub fn toggle_status(&mut self, status: LocationStatus) -> bool {
        toggle(&mut self.status, status)
    }

    pub fn toggle_only_mine(&mut self) -> bool {
        self.only_mine = !self.only_mine;
        self.only_mine
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}
