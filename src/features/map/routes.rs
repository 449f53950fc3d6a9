use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::map::handlers;
use crate::features::map::services::MapService;

/// Surface routes
///
/// Note: the caller applies the session middleware
pub fn routes(service: Arc<MapService>) -> Router {
    Router::new()
        .route("/api/surfaces", post(handlers::mount_surface))
        .route(
            "/api/surfaces/{id}",
            get(handlers::get_surface).delete(handlers::unmount_surface),
        )
        .route(
            "/api/surfaces/{id}/locations",
            get(handlers::list_visible_locations),
        )
        .route(
            "/api/surfaces/{id}/filters",
            axum::routing::patch(handlers::toggle_filter),
        )
        .route(
            "/api/surfaces/{id}/placement",
            post(handlers::toggle_placement),
        )
        .route("/api/surfaces/{id}/select", post(handlers::select_point))
        .route(
            "/api/surfaces/{id}/locations/{location_id}",
            get(handlers::get_location_detail)
                .put(handlers::save_location)
                .delete(handlers::delete_location),
        )
        .route(
            "/api/surfaces/{id}/locations/{location_id}/approve",
            post(handlers::approve_location),
        )
        .route(
            "/api/surfaces/{id}/locations/{location_id}/reject",
            post(handlers::reject_location),
        )
        .route(
            "/api/surfaces/{id}/locations/{location_id}/focus",
            post(handlers::focus_location),
        )
        .route("/api/surfaces/{id}/viewport", post(handlers::center_viewport))
        .route(
            "/api/surfaces/{id}/viewport/device-location",
            post(handlers::report_device_location),
        )
        .route(
            "/api/surfaces/{id}/viewport/recenter",
            post(handlers::recenter_viewport),
        )
        .with_state(service)
}

/// Public routes (no session required)
pub fn public_routes() -> Router {
    Router::new().route("/api/legend", get(handlers::get_legend))
}
