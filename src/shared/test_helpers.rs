#[cfg(test)]
use chrono::Utc;
#[cfg(test)]
use fake::{faker::company::en::CompanyName, Fake};

#[cfg(test)]
use crate::features::locations::models::{Location, LocationCategory, LocationId, LocationStatus};
#[cfg(test)]
use crate::features::sessions::models::SessionUser;
#[cfg(test)]
use crate::shared::constants::ROLE_MODERATOR;

#[cfg(test)]
#[allow(dead_code)]
pub fn location(
    id: &str,
    category: LocationCategory,
    status: LocationStatus,
    contributor_id: &str,
) -> Location {
    Location {
        id: LocationId::from(id),
        name: format!("Location {}", id),
        description: None,
        category,
        status,
        lat: -15.41,
        lng: 28.28,
        contributor: contributor_id.to_string(),
        contributor_id: contributor_id.to_string(),
        date_added: Utc::now(),
        images: Vec::new(),
    }
}

/// Location with random category, status, owner (`u1`..`u3`) and position
#[cfg(test)]
#[allow(dead_code)]
pub fn random_location() -> Location {
    let category = LocationCategory::ALL[(0..3usize).fake::<usize>()];
    let status = LocationStatus::ALL[(0..3usize).fake::<usize>()];
    let owner = format!("u{}", (1..4u8).fake::<u8>());

    Location {
        id: LocationId::temporary(),
        name: CompanyName().fake(),
        description: None,
        category,
        status,
        lat: (-16.0..-15.0).fake::<f64>(),
        lng: (28.0..29.0).fake::<f64>(),
        contributor: owner.clone(),
        contributor_id: owner,
        date_added: Utc::now(),
        images: Vec::new(),
    }
}

#[cfg(test)]
#[allow(dead_code)]
pub fn contributor(id: &str) -> SessionUser {
    SessionUser {
        id: id.to_string(),
        display_name: format!("Contributor {}", id),
        roles: vec![],
    }
}

#[cfg(test)]
#[allow(dead_code)]
pub fn moderator(id: &str) -> SessionUser {
    SessionUser {
        id: id.to_string(),
        display_name: format!("Moderator {}", id),
        roles: vec![ROLE_MODERATOR.to_string()],
    }
}
