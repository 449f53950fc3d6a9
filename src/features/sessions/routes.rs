use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::map::services::MapService;
use crate::features::sessions::handlers::{self, SessionState};
use crate::features::sessions::services::SessionService;

/// Public session routes (no session required)
pub fn public_routes(sessions: Arc<SessionService>, maps: Arc<MapService>) -> Router {
    Router::new()
        .route("/api/sessions", post(handlers::login))
        .with_state(SessionState { sessions, maps })
}

/// Protected session routes (require the session middleware)
pub fn protected_routes(sessions: Arc<SessionService>, maps: Arc<MapService>) -> Router {
    Router::new()
        .route("/api/sessions", axum::routing::delete(handlers::logout))
        .route("/api/sessions/me", get(handlers::get_me))
        .with_state(SessionState { sessions, maps })
}
