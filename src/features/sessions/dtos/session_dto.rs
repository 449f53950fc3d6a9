use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::sessions::models::{Session, SessionUser};

/// Request DTO for starting a session
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestDto {
    #[validate(regex(
        path = *crate::shared::validation::USER_ID_REGEX,
        message = "User id must be 1-64 letters, digits, '-' or '_'"
    ))]
    pub user_id: String,

    /// Label shown as contributor on new pins (default: "You")
    #[validate(length(min = 1, max = 80, message = "Display name must be 1-80 characters"))]
    pub display_name: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "crate::shared::validation::validate_roles"))]
    pub roles: Vec<String>,
}

/// Response DTO for login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponseDto {
    /// Bearer token for subsequent requests
    pub access_token: Uuid,
    /// Token type (always "Bearer")
    pub token_type: String,
    pub user: SessionUser,
    pub started_at: DateTime<Utc>,
}

impl From<Session> for SessionResponseDto {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.token,
            token_type: "Bearer".to_string(),
            user: session.user,
            started_at: session.started_at,
        }
    }
}

/// Response DTO for logout
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponseDto {
    /// Number of map surfaces released with the session
    pub released_surfaces: usize,
}
