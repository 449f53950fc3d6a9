use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::map::services::MapService;
use crate::features::sessions::dtos::{LoginRequestDto, LogoutResponseDto, SessionResponseDto};
use crate::features::sessions::models::Session;
use crate::features::sessions::services::SessionService;
use crate::shared::types::ApiResponse;

/// Shared state for session handlers
#[derive(Clone)]
pub struct SessionState {
    pub sessions: Arc<SessionService>,
    pub maps: Arc<MapService>,
}

/// Start a session
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = LoginRequestDto,
    responses(
        (status = 201, description = "Session started", body = ApiResponse<SessionResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "sessions"
)]
pub async fn login(
    State(state): State<SessionState>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let session = state.sessions.login(dto).await;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(session.into()), None, None)),
    ))
}

/// End the current session and release its map surfaces
#[utoipa::path(
    delete,
    path = "/api/sessions",
    responses(
        (status = 200, description = "Session ended", body = ApiResponse<LogoutResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "sessions"
)]
pub async fn logout(
    session: Session,
    State(state): State<SessionState>,
) -> Result<Json<ApiResponse<LogoutResponseDto>>> {
    state.sessions.logout(&session.token).await?;
    let released_surfaces = state.maps.release_for_session(&session.token).await;

    Ok(Json(ApiResponse::success(
        Some(LogoutResponseDto { released_surfaces }),
        None,
        None,
    )))
}

/// Get the current session
#[utoipa::path(
    get,
    path = "/api/sessions/me",
    responses(
        (status = 200, description = "Current session", body = ApiResponse<SessionResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "sessions"
)]
pub async fn get_me(session: Session) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    Ok(Json(ApiResponse::success(Some(session.into()), None, None)))
}
