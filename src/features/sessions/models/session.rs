use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::ROLE_MODERATOR;

/// The actor behind a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub display_name: String,
    pub roles: Vec<String>,
}

impl SessionUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Moderators may mount the admin map
    pub fn is_moderator(&self) -> bool {
        self.has_role(ROLE_MODERATOR)
    }
}

/// Explicit session value, set at login and cleared at logout
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub token: Uuid,
    pub user: SessionUser,
    pub started_at: DateTime<Utc>,
}
