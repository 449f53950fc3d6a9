use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::locations::dtos::{LocationResponseDto, SaveLocationDto};
use crate::features::locations::models::{Coordinates, LocationId};
use crate::features::map::dtos::{
    ActionOutcomeDto, CenterViewportDto, DeviceFixDto, FilterToggleDto, LocationDetailDto,
    MountSurfaceDto, SelectPointDto, SurfaceSnapshotDto,
};
use crate::features::map::models::MarkerStyle;
use crate::features::map::services::MapService;
use crate::features::sessions::models::Session;
use crate::shared::types::{ApiResponse, Meta};

/// Mount a map surface
#[utoipa::path(
    post,
    path = "/api/surfaces",
    request_body = MountSurfaceDto,
    responses(
        (status = 201, description = "Surface mounted", body = ApiResponse<SurfaceSnapshotDto>),
        (status = 401, description = "Session required"),
        (status = 403, description = "Moderator role required for the admin context")
    ),
    security(("bearer_auth" = [])),
    tag = "surfaces"
)]
pub async fn mount_surface(
    session: Session,
    State(service): State<Arc<MapService>>,
    AppJson(dto): AppJson<MountSurfaceDto>,
) -> Result<(StatusCode, Json<ApiResponse<SurfaceSnapshotDto>>)> {
    let snapshot = service.mount(&session, dto.context).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(snapshot), None, None)),
    ))
}

/// Unmount a map surface
#[utoipa::path(
    delete,
    path = "/api/surfaces/{id}",
    params(
        ("id" = Uuid, Path, description = "Surface ID")
    ),
    responses(
        (status = 200, description = "Surface released"),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "surfaces"
)]
pub async fn unmount_surface(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.unmount(&session, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Surface released".to_string()),
        None,
    )))
}

/// Get the current state of a surface
#[utoipa::path(
    get,
    path = "/api/surfaces/{id}",
    params(
        ("id" = Uuid, Path, description = "Surface ID")
    ),
    responses(
        (status = 200, description = "Surface snapshot", body = ApiResponse<SurfaceSnapshotDto>),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "surfaces"
)]
pub async fn get_surface(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SurfaceSnapshotDto>>> {
    let snapshot = service.snapshot(&session, id).await?;
    Ok(Json(ApiResponse::success(Some(snapshot), None, None)))
}

/// List the locations currently visible on a surface
#[utoipa::path(
    get,
    path = "/api/surfaces/{id}/locations",
    params(
        ("id" = Uuid, Path, description = "Surface ID")
    ),
    responses(
        (status = 200, description = "Visible locations", body = ApiResponse<Vec<LocationResponseDto>>),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "surfaces"
)]
pub async fn list_visible_locations(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<LocationResponseDto>>>> {
    let locations = service.visible_locations(&session, id).await?;
    let total = locations.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(locations),
        None,
        Some(Meta { total }),
    )))
}

/// Toggle one filter entry
#[utoipa::path(
    patch,
    path = "/api/surfaces/{id}/filters",
    params(
        ("id" = Uuid, Path, description = "Surface ID")
    ),
    request_body = FilterToggleDto,
    responses(
        (status = 200, description = "Filter toggled", body = ApiResponse<ActionOutcomeDto>),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "surfaces"
)]
pub async fn toggle_filter(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<FilterToggleDto>,
) -> Result<Json<ApiResponse<ActionOutcomeDto>>> {
    let outcome = service.toggle_filter(&session, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}

/// Toggle placement mode
#[utoipa::path(
    post,
    path = "/api/surfaces/{id}/placement",
    params(
        ("id" = Uuid, Path, description = "Surface ID")
    ),
    responses(
        (status = 200, description = "Placement mode toggled", body = ApiResponse<ActionOutcomeDto>),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "surfaces"
)]
pub async fn toggle_placement(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ActionOutcomeDto>>> {
    let outcome = service.toggle_placement(&session, id).await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}

/// Report a coordinate selection on the map
///
/// Creates a pending location when placement mode is active.
#[utoipa::path(
    post,
    path = "/api/surfaces/{id}/select",
    params(
        ("id" = Uuid, Path, description = "Surface ID")
    ),
    request_body = SelectPointDto,
    responses(
        (status = 200, description = "Selection handled", body = ApiResponse<ActionOutcomeDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "surfaces"
)]
pub async fn select_point(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SelectPointDto>,
) -> Result<Json<ApiResponse<ActionOutcomeDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let outcome = service.select_point(&session, id, dto.coordinates()).await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}

/// Get a location's detail view and the actions offered for it
#[utoipa::path(
    get,
    path = "/api/surfaces/{id}/locations/{location_id}",
    params(
        ("id" = Uuid, Path, description = "Surface ID"),
        ("location_id" = String, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Location detail", body = ApiResponse<LocationDetailDto>),
        (status = 404, description = "Surface or location not found")
    ),
    security(("bearer_auth" = [])),
    tag = "surfaces"
)]
pub async fn get_location_detail(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path((id, location_id)): Path<(Uuid, LocationId)>,
) -> Result<Json<ApiResponse<LocationDetailDto>>> {
    let detail = service.detail(&session, id, &location_id).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Save the edit form of a location
#[utoipa::path(
    put,
    path = "/api/surfaces/{id}/locations/{location_id}",
    params(
        ("id" = Uuid, Path, description = "Surface ID"),
        ("location_id" = String, Path, description = "Location ID")
    ),
    request_body = SaveLocationDto,
    responses(
        (status = 200, description = "Save handled", body = ApiResponse<ActionOutcomeDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "surfaces"
)]
pub async fn save_location(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path((id, location_id)): Path<(Uuid, LocationId)>,
    AppJson(dto): AppJson<SaveLocationDto>,
) -> Result<Json<ApiResponse<ActionOutcomeDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let outcome = service.save(&session, id, &location_id, dto).await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}

/// Delete a location
#[utoipa::path(
    delete,
    path = "/api/surfaces/{id}/locations/{location_id}",
    params(
        ("id" = Uuid, Path, description = "Surface ID"),
        ("location_id" = String, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Delete handled", body = ApiResponse<ActionOutcomeDto>),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "surfaces"
)]
pub async fn delete_location(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path((id, location_id)): Path<(Uuid, LocationId)>,
) -> Result<Json<ApiResponse<ActionOutcomeDto>>> {
    let outcome = service.delete(&session, id, &location_id).await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}

/// Approve a pending location
#[utoipa::path(
    post,
    path = "/api/surfaces/{id}/locations/{location_id}/approve",
    params(
        ("id" = Uuid, Path, description = "Surface ID"),
        ("location_id" = String, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Approval handled", body = ApiResponse<ActionOutcomeDto>),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "surfaces"
)]
pub async fn approve_location(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path((id, location_id)): Path<(Uuid, LocationId)>,
) -> Result<Json<ApiResponse<ActionOutcomeDto>>> {
    let outcome = service.approve(&session, id, &location_id).await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}

/// Reject a pending location
#[utoipa::path(
    post,
    path = "/api/surfaces/{id}/locations/{location_id}/reject",
    params(
        ("id" = Uuid, Path, description = "Surface ID"),
        ("location_id" = String, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Rejection handled", body = ApiResponse<ActionOutcomeDto>),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "surfaces"
)]
pub async fn reject_location(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path((id, location_id)): Path<(Uuid, LocationId)>,
) -> Result<Json<ApiResponse<ActionOutcomeDto>>> {
    let outcome = service.reject(&session, id, &location_id).await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}

/// Jump to a location and open its popup
#[utoipa::path(
    post,
    path = "/api/surfaces/{id}/locations/{location_id}/focus",
    params(
        ("id" = Uuid, Path, description = "Surface ID"),
        ("location_id" = String, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Focus handled", body = ApiResponse<ActionOutcomeDto>),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "surfaces"
)]
pub async fn focus_location(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path((id, location_id)): Path<(Uuid, LocationId)>,
) -> Result<Json<ApiResponse<ActionOutcomeDto>>> {
    let outcome = service.focus(&session, id, &location_id).await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}

/// Center the viewport
#[utoipa::path(
    post,
    path = "/api/surfaces/{id}/viewport",
    params(
        ("id" = Uuid, Path, description = "Surface ID")
    ),
    request_body = CenterViewportDto,
    responses(
        (status = 200, description = "Viewport centered", body = ApiResponse<ActionOutcomeDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "viewport"
)]
pub async fn center_viewport(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CenterViewportDto>,
) -> Result<Json<ApiResponse<ActionOutcomeDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let outcome = service
        .center(&session, id, Coordinates::new(dto.lat, dto.lng), dto.zoom)
        .await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}

/// Report the device location fix
#[utoipa::path(
    post,
    path = "/api/surfaces/{id}/viewport/device-location",
    params(
        ("id" = Uuid, Path, description = "Surface ID")
    ),
    request_body = DeviceFixDto,
    responses(
        (status = 200, description = "Fix handled", body = ApiResponse<ActionOutcomeDto>),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "viewport"
)]
pub async fn report_device_location(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<DeviceFixDto>,
) -> Result<Json<ApiResponse<ActionOutcomeDto>>> {
    let outcome = service.report_device_location(&session, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}

/// Center on the last known user position
#[utoipa::path(
    post,
    path = "/api/surfaces/{id}/viewport/recenter",
    params(
        ("id" = Uuid, Path, description = "Surface ID")
    ),
    responses(
        (status = 200, description = "Recenter handled", body = ApiResponse<ActionOutcomeDto>),
        (status = 404, description = "Surface not found")
    ),
    security(("bearer_auth" = [])),
    tag = "viewport"
)]
pub async fn recenter_viewport(
    session: Session,
    State(service): State<Arc<MapService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ActionOutcomeDto>>> {
    let outcome = service.recenter(&session, id).await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}

/// Marker glyph and badge table
#[utoipa::path(
    get,
    path = "/api/legend",
    responses(
        (status = 200, description = "Marker legend", body = ApiResponse<Vec<MarkerStyle>>),
    ),
    tag = "legend"
)]
pub async fn get_legend() -> Result<Json<ApiResponse<Vec<MarkerStyle>>>> {
    Ok(Json(ApiResponse::success(
        Some(MarkerStyle::legend()),
        None,
        None,
    )))
}
