use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::locations::models::{Location, LocationCategory, LocationId, LocationStatus};

/// Response DTO for location
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponseDto {
    pub id: LocationId,
    /// True until the repository has assigned a permanent id
    pub temporary: bool,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: LocationCategory,
    pub status: LocationStatus,
    pub lat: f64,
    pub lng: f64,
    pub contributor: String,
    pub contributor_id: String,
    pub date_added: NaiveDate,
    pub images: Vec<String>,
}

impl From<Location> for LocationResponseDto {
    fn from(l: Location) -> Self {
        Self {
            temporary: l.id.is_temporary(),
            id: l.id,
            name: l.name,
            description: l.description,
            category: l.category,
            status: l.status,
            lat: l.lat,
            lng: l.lng,
            contributor: l.contributor,
            contributor_id: l.contributor_id,
            date_added: l.date_added.date_naive(),
            images: l.images,
        }
    }
}

impl From<&Location> for LocationResponseDto {
    fn from(l: &Location) -> Self {
        l.clone().into()
    }
}

/// Request DTO for the location edit form
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveLocationDto {
    #[validate(
        length(max = 120, message = "Name must not exceed 120 characters"),
        custom(function = "crate::shared::validation::validate_not_blank", message = "Name is required")
    )]
    pub name: String,

    #[validate(
        length(max = 1000, message = "Description must not exceed 1000 characters"),
        custom(function = "crate::shared::validation::validate_not_blank", message = "Description is required")
    )]
    pub description: String,

    pub category: LocationCategory,

    /// Full image list; only lists extending the stored one are accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl SaveLocationDto {
    /// Apply the form values on top of the stored record
    pub fn apply_to(self, base: &Location) -> Location {
        let mut location = base.clone();
        location.name = self.name.trim().to_string();
        location.description = Some(self.description.trim().to_string());
        location.category = self.category;
        if let Some(images) = self.images {
            location.images = images;
        }
        location
    }
}
