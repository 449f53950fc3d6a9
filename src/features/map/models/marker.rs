use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::locations::models::{
    Coordinates, Location, LocationCategory, LocationId, LocationStatus,
};

/// Visual key of a marker. Determines glyph and badge, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct MarkerKey {
    pub category: LocationCategory,
    pub status: LocationStatus,
}

impl MarkerKey {
    pub fn of(location: &Location) -> Self {
        Self {
            category: location.category,
            status: location.status,
        }
    }
}

/// Icon drawn inside the marker, one per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerGlyph {
    Building,
    Road,
    Landmark,
}

impl MarkerGlyph {
    /// Icon name in the front-end icon set
    pub fn icon(&self) -> &'static str {
        match self {
            MarkerGlyph::Building => "building-2",
            MarkerGlyph::Road => "route",
            MarkerGlyph::Landmark => "landmark",
        }
    }
}

impl From<LocationCategory> for MarkerGlyph {
    fn from(category: LocationCategory) -> Self {
        match category {
            LocationCategory::Business => MarkerGlyph::Building,
            LocationCategory::Road => MarkerGlyph::Road,
            LocationCategory::Landmark => MarkerGlyph::Landmark,
        }
    }
}

/// Colored dot in the marker corner, one per status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StatusBadge {
    Verified,
    Pending,
    Rejected,
}

impl StatusBadge {
    /// Theme color token
    pub fn color_token(&self) -> &'static str {
        match self {
            StatusBadge::Verified => "map-verified",
            StatusBadge::Pending => "map-pending",
            StatusBadge::Rejected => "map-rejected",
        }
    }
}

impl From<LocationStatus> for StatusBadge {
    fn from(status: LocationStatus) -> Self {
        match status {
            LocationStatus::Verified => StatusBadge::Verified,
            LocationStatus::Pending => StatusBadge::Pending,
            LocationStatus::Rejected => StatusBadge::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub key: MarkerKey,
    pub glyph: MarkerGlyph,
    pub icon: String,
    pub badge: StatusBadge,
    pub color: String,
}

impl MarkerStyle {
    pub fn for_key(key: MarkerKey) -> Self {
        let glyph = MarkerGlyph::from(key.category);
        let badge = StatusBadge::from(key.status);
        Self {
            key,
            glyph,
            icon: glyph.icon().to_string(),
            badge,
            color: badge.color_token().to_string(),
        }
    }

    /// Every style a marker can take, category-major
    pub fn legend() -> Vec<MarkerStyle> {
        LocationCategory::ALL
            .into_iter()
            .flat_map(|category| {
                LocationStatus::ALL
                    .into_iter()
                    .map(move |status| MarkerStyle::for_key(MarkerKey { category, status }))
            })
            .collect()
    }
}

/// Popup content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDetail {
    pub name: String,
    pub category_label: String,
    pub status_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub contributor: String,
}

impl From<&Location> for MarkerDetail {
    fn from(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            category_label: location.category.label().to_string(),
            status_label: location.status.label().to_string(),
            description: location.description.clone(),
            contributor: location.contributor.clone(),
        }
    }
}

/// Button offered in a marker popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MarkerAction {
    Details,
    Approve,
    Reject,
    Edit,
    Delete,
}

/// Popup actions together with the location state they were computed from.
///
/// Actions reference the location by marker id only; the binding is rebuilt
/// whenever the status or owner it was computed from changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionBinding {
    pub status: LocationStatus,
    pub contributor_id: String,
    pub actions: Vec<MarkerAction>,
}

/// Rendered overlay entry for one visible location. Plain data; the rendering
/// adapter owns no business logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: LocationId,
    pub position: Coordinates,
    pub title: String,
    pub style: MarkerStyle,
    pub detail: MarkerDetail,
    pub binding: ActionBinding,
}

impl Marker {
    pub fn new(location: &Location, actions: Vec<MarkerAction>) -> Self {
        Self {
            id: location.id.clone(),
            position: location.coordinates(),
            title: location.name.clone(),
            style: MarkerStyle::for_key(MarkerKey::of(location)),
            detail: MarkerDetail::from(location),
            binding: ActionBinding {
                status: location.status,
                contributor_id: location.contributor_id.clone(),
                actions,
            },
        }
    }

    pub fn key(&self) -> MarkerKey {
        self.style.key
    }
}
