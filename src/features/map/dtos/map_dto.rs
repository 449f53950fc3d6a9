use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::locations::dtos::LocationResponseDto;
use crate::features::locations::models::{Coordinates, LocationCategory, LocationId, LocationStatus};
use crate::features::map::models::{
    MapFilters, Marker, MarkerAction, MarkerDetail, OverlayPatch, ViewContext, Viewport,
};
use crate::features::map::services::{ActionOutcome, LocateError, LocationChange, LocationDetail};

/// Request DTO for mounting a map surface
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MountSurfaceDto {
    pub context: ViewContext,
}

/// Full state of a mounted surface
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceSnapshotDto {
    pub surface_id: Uuid,
    pub context: ViewContext,
    /// Heading shown above the map
    pub title: String,
    pub viewport: Viewport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_position: Option<Coordinates>,
    pub filters: MapFilters,
    /// Whether the "only mine" switch is offered in this context
    pub only_mine_toggle: bool,
    pub placement_active: bool,
    pub markers: Vec<Marker>,
    pub visible_count: usize,
    pub total_count: usize,
}

/// Request DTO for toggling one filter entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "filter", rename_all = "camelCase")]
pub enum FilterToggleDto {
    Category { value: LocationCategory },
    Status { value: LocationStatus },
    OnlyMine,
}

/// Request DTO for a coordinate selection on the map
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SelectPointDto {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: f64,
}

impl SelectPointDto {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Request DTO for repositioning the viewport
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CenterViewportDto {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: f64,
    /// Target zoom (default: keep current zoom)
    #[validate(range(max = 19, message = "Zoom must not exceed 19"))]
    pub zoom: Option<u8>,
}

/// Device location result reported by the platform
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeviceFixDto {
    Position { lat: f64, lng: f64 },
    PermissionDenied,
    Unavailable,
    Timeout,
}

impl DeviceFixDto {
    pub fn into_fix(self) -> Result<Coordinates, LocateError> {
        match self {
            DeviceFixDto::Position { lat, lng } => Ok(Coordinates::new(lat, lng)),
            DeviceFixDto::PermissionDenied => Err(LocateError::PermissionDenied),
            DeviceFixDto::Unavailable => Err(LocateError::Unavailable),
            DeviceFixDto::Timeout => Err(LocateError::Timeout),
        }
    }
}

/// Result of any surface action. Ignored actions still answer 200.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcomeDto {
    pub applied: bool,
    /// Machine-readable reason when `applied` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Created or updated location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationResponseDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_id: Option<LocationId>,
    pub patch: OverlayPatch,
    pub viewport: Viewport,
    pub placement_active: bool,
}

impl ActionOutcomeDto {
    pub fn from_outcome(outcome: ActionOutcome, viewport: Viewport, placement_active: bool) -> Self {
        match outcome {
            ActionOutcome::Applied { change, patch } => {
                let (location, deleted_id) = match change {
                    Some(LocationChange::Created(l)) | Some(LocationChange::Updated(l)) => {
                        (Some(l.into()), None)
                    }
                    Some(LocationChange::Deleted(id)) => (None, Some(id)),
                    None => (None, None),
                };
                Self {
                    applied: true,
                    reason: None,
                    message: None,
                    location,
                    deleted_id,
                    patch,
                    viewport,
                    placement_active,
                }
            }
            ActionOutcome::Ignored(reason) => Self {
                applied: false,
                reason: Some(reason.code().to_string()),
                message: Some(reason.to_string()),
                location: None,
                deleted_id: None,
                patch: OverlayPatch::new(),
                viewport,
                placement_active,
            },
        }
    }

    /// Outcome of a viewport-only action
    pub fn viewport(applied: bool, viewport: Viewport, placement_active: bool) -> Self {
        Self {
            applied,
            reason: (!applied).then(|| "unchanged".to_string()),
            message: None,
            location: None,
            deleted_id: None,
            patch: OverlayPatch::new(),
            viewport,
            placement_active,
        }
    }
}

/// Detail view of one location
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LocationDetailDto {
    pub location: LocationResponseDto,
    pub detail: MarkerDetail,
    /// Buttons offered to the current viewer
    pub actions: Vec<MarkerAction>,
}

impl From<LocationDetail> for LocationDetailDto {
    fn from(d: LocationDetail) -> Self {
        Self {
            detail: MarkerDetail::from(&d.location),
            location: d.location.into(),
            actions: d.actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::map::services::IgnoreReason;

    #[test]
    fn test_filter_toggle_wire_format() {
        let dto: FilterToggleDto =
            serde_json::from_str(r#"{"filter":"category","value":"road"}"#).unwrap();
        assert!(matches!(
            dto,
            FilterToggleDto::Category {
                value: LocationCategory::Road
            }
        ));

        let dto: FilterToggleDto = serde_json::from_str(r#"{"filter":"onlyMine"}"#).unwrap();
        assert!(matches!(dto, FilterToggleDto::OnlyMine));
    }

    #[test]
    fn test_device_fix_wire_format() {
        let dto: DeviceFixDto =
            serde_json::from_str(r#"{"outcome":"permission_denied"}"#).unwrap();
        assert_eq!(dto.into_fix(), Err(LocateError::PermissionDenied));

        let dto: DeviceFixDto =
            serde_json::from_str(r#"{"outcome":"position","lat":-15.4,"lng":28.3}"#).unwrap();
        assert_eq!(dto.into_fix(), Ok(Coordinates::new(-15.4, 28.3)));
    }

    #[test]
    fn test_out_of_range_selection_fails_validation() {
        let dto = SelectPointDto { lat: 95.0, lng: 0.0 };
        assert!(dto.validate().is_err());

        let dto = CenterViewportDto {
            lat: 0.0,
            lng: 0.0,
            zoom: Some(20),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_ignored_outcome_carries_reason() {
        let viewport = Viewport::new(Coordinates::new(0.0, 0.0), 13);
        let dto = ActionOutcomeDto::from_outcome(
            ActionOutcome::Ignored(IgnoreReason::NotPlacing),
            viewport,
            false,
        );

        assert!(!dto.applied);
        assert_eq!(dto.reason.as_deref(), Some("not_placing"));
        assert!(dto.patch.is_empty());
    }
}
