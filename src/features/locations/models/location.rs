use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Prefix carried by client-generated ids until the record is persisted
pub const TEMPORARY_ID_PREFIX: &str = "temp-";

/// Location category
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum LocationCategory {
    Business,
    Road,
    Landmark,
}

impl LocationCategory {
    pub const ALL: [LocationCategory; 3] = [
        LocationCategory::Business,
        LocationCategory::Road,
        LocationCategory::Landmark,
    ];

    /// Human readable label used in detail views
    pub fn label(&self) -> &'static str {
        match self {
            LocationCategory::Business => "Business",
            LocationCategory::Road => "Road",
            LocationCategory::Landmark => "Landmark",
        }
    }
}

impl std::fmt::Display for LocationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationCategory::Business => write!(f, "business"),
            LocationCategory::Road => write!(f, "road"),
            LocationCategory::Landmark => write!(f, "landmark"),
        }
    }
}

/// Moderation status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    Verified,
    Pending,
    Rejected,
}

impl LocationStatus {
    pub const ALL: [LocationStatus; 3] = [
        LocationStatus::Verified,
        LocationStatus::Pending,
        LocationStatus::Rejected,
    ];

    /// Human readable label used in detail views
    pub fn label(&self) -> &'static str {
        match self {
            LocationStatus::Verified => "Verified",
            LocationStatus::Pending => "Pending",
            LocationStatus::Rejected => "Rejected",
        }
    }

    /// Only moderation of a pending location moves it, and only forward.
    pub fn can_transition_to(self, next: LocationStatus) -> bool {
        matches!(
            (self, next),
            (LocationStatus::Pending, LocationStatus::Verified)
                | (LocationStatus::Pending, LocationStatus::Rejected)
        )
    }
}

impl std::fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationStatus::Verified => write!(f, "verified"),
            LocationStatus::Pending => write!(f, "pending"),
            LocationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Location identifier
///
/// Temporary ids (`temp-…`) are generated on the client side of the store and
/// replaced by a permanent id once the repository has accepted the record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh temporary id. UUID v7 keeps ids unique even within one millisecond.
    pub fn temporary() -> Self {
        Self(format!("{}{}", TEMPORARY_ID_PREFIX, Uuid::now_v7().simple()))
    }

    pub fn permanent(id: Uuid) -> Self {
        Self(id.to_string())
    }

    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMPORARY_ID_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LocationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Geographic point in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A point of interest submitted by a contributor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: LocationCategory,
    pub status: LocationStatus,
    pub lat: f64,
    pub lng: f64,
    pub contributor: String,
    pub contributor_id: String,
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.contributor_id == user_id
    }
}

/// Data for placing a new location
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub lat: f64,
    pub lng: f64,
    pub contributor_id: String,
    pub contributor: String,
    pub name: Option<String>,
    pub category: Option<LocationCategory>,
    pub description: Option<String>,
}

impl NewLocation {
    pub fn at(point: Coordinates, contributor_id: impl Into<String>) -> Self {
        Self {
            lat: point.lat,
            lng: point.lng,
            contributor_id: contributor_id.into(),
            contributor: String::new(),
            name: None,
            category: None,
            description: None,
        }
    }

    pub fn contributor(mut self, label: impl Into<String>) -> Self {
        self.contributor = label.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions_only_leave_pending() {
        assert!(LocationStatus::Pending.can_transition_to(LocationStatus::Verified));
        assert!(LocationStatus::Pending.can_transition_to(LocationStatus::Rejected));
        assert!(!LocationStatus::Verified.can_transition_to(LocationStatus::Pending));
        assert!(!LocationStatus::Rejected.can_transition_to(LocationStatus::Verified));
        assert!(!LocationStatus::Pending.can_transition_to(LocationStatus::Pending));
    }

    #[test]
    fn test_temporary_ids_are_unique() {
        let a = LocationId::temporary();
        let b = LocationId::temporary();
        assert!(a.is_temporary());
        assert_ne!(a, b);
        assert!(!LocationId::permanent(Uuid::new_v4()).is_temporary());
    }

    #[test]
    fn test_location_serializes_camel_case() {
        let location = Location {
            id: LocationId::from("1"),
            name: "Cairo Road".to_string(),
            description: None,
            category: LocationCategory::Road,
            status: LocationStatus::Verified,
            lat: -15.4167,
            lng: 28.2833,
            contributor: "Jane Smith".to_string(),
            contributor_id: "user2".to_string(),
            date_added: Utc::now(),
            images: vec![],
        };

        let value = serde_json::to_value(&location).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["contributorId"], "user2");
        assert_eq!(value["category"], "road");
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(-15.41, 28.28).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }
}
