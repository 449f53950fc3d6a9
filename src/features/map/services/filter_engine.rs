use crate::features::locations::models::Location;
use crate::features::map::models::MapFilters;

/// Evaluates the user-chosen filter of a map surface
pub struct FilterEngine;

impl FilterEngine {
    /// Conjunction of category membership, status membership and ownership
    /// when `only_mine` is set.
    pub fn passes(location: &Location, filters: &MapFilters, current_user_id: &str) -> bool {
        filters.categories.contains(&location.category)
            && filters.status.contains(&location.status)
            && (!filters.only_mine || location.is_owned_by(current_user_id))
    }
}
