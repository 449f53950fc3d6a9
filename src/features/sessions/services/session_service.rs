use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::sessions::dtos::LoginRequestDto;
use crate::features::sessions::models::{Session, SessionUser};
use crate::shared::constants::DEFAULT_DISPLAY_NAME;

/// Issues and resolves bearer sessions. Sessions live in memory only.
pub struct SessionService {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Session {
        let mut roles = dto.roles;
        roles.sort();
        roles.dedup();

        let session = Session {
            token: Uuid::new_v4(),
            user: SessionUser {
                display_name: dto
                    .display_name
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
                id: dto.user_id,
                roles,
            },
            started_at: Utc::now(),
        };

        self.sessions
            .write()
            .await
            .insert(session.token, session.clone());

        tracing::info!(
            "Session started for user {} (roles: {:?})",
            session.user.id,
            session.user.roles
        );

        session
    }

    /// Look up the session behind a bearer token
    pub async fn resolve(&self, token: &Uuid) -> Result<Session> {
        self.sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Session expired or unknown".to_string()))
    }

    pub async fn logout(&self, token: &Uuid) -> Result<Session> {
        let session = self
            .sessions
            .write()
            .await
            .remove(token)
            .ok_or_else(|| AppError::Unauthorized("Session expired or unknown".to_string()))?;

        tracing::info!("Session ended for user {}", session.user.id);

        Ok(session)
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_dto(user_id: &str) -> LoginRequestDto {
        LoginRequestDto {
            user_id: user_id.to_string(),
            display_name: None,
            roles: vec!["moderator".to_string(), "moderator".to_string()],
        }
    }

    #[tokio::test]
    async fn test_login_then_resolve() {
        let service = SessionService::new();
        let session = service.login(login_dto("u1")).await;

        let resolved = service.resolve(&session.token).await.unwrap();
        assert_eq!(resolved.user.id, "u1");
        assert_eq!(resolved.user.display_name, "You");
        assert_eq!(resolved.user.roles, vec!["moderator".to_string()]);
        assert!(resolved.user.is_moderator());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let service = SessionService::new();
        let session = service.login(login_dto("u1")).await;

        tokio_test::assert_ok!(service.logout(&session.token).await);

        assert!(matches!(
            service.resolve(&session.token).await,
            Err(AppError::Unauthorized(_))
        ));
        tokio_test::assert_err!(service.logout(&session.token).await);
    }
}
