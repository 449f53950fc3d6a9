use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::locations::{dtos as locations_dtos, models as locations_models};
use crate::features::map::{dtos as map_dtos, handlers as map_handlers, models as map_models};
use crate::features::sessions::{
    dtos as sessions_dtos, handlers as sessions_handlers, models as sessions_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Sessions
        sessions_handlers::login,
        sessions_handlers::logout,
        sessions_handlers::get_me,
        // Surfaces
        map_handlers::mount_surface,
        map_handlers::unmount_surface,
        map_handlers::get_surface,
        map_handlers::list_visible_locations,
        map_handlers::toggle_filter,
        map_handlers::toggle_placement,
        map_handlers::select_point,
        map_handlers::get_location_detail,
        map_handlers::save_location,
        map_handlers::delete_location,
        map_handlers::approve_location,
        map_handlers::reject_location,
        map_handlers::focus_location,
        // Viewport
        map_handlers::center_viewport,
        map_handlers::report_device_location,
        map_handlers::recenter_viewport,
        // Legend
        map_handlers::get_legend,
    ),
    components(
        schemas(
            Meta,
            // Sessions
            sessions_models::SessionUser,
            sessions_dtos::LoginRequestDto,
            sessions_dtos::SessionResponseDto,
            sessions_dtos::LogoutResponseDto,
            ApiResponse<sessions_dtos::SessionResponseDto>,
            ApiResponse<sessions_dtos::LogoutResponseDto>,
            // Locations
            locations_models::LocationId,
            locations_models::LocationCategory,
            locations_models::LocationStatus,
            locations_models::Coordinates,
            locations_dtos::LocationResponseDto,
            locations_dtos::SaveLocationDto,
            ApiResponse<Vec<locations_dtos::LocationResponseDto>>,
            // Map
            map_models::ViewContext,
            map_models::Viewport,
            map_models::MapFilters,
            map_models::MarkerKey,
            map_models::MarkerGlyph,
            map_models::StatusBadge,
            map_models::MarkerStyle,
            map_models::MarkerDetail,
            map_models::MarkerAction,
            map_models::ActionBinding,
            map_models::Marker,
            map_models::OverlayOp,
            map_models::OverlayPatch,
            map_dtos::MountSurfaceDto,
            map_dtos::SurfaceSnapshotDto,
            map_dtos::FilterToggleDto,
            map_dtos::SelectPointDto,
            map_dtos::CenterViewportDto,
            map_dtos::DeviceFixDto,
            map_dtos::ActionOutcomeDto,
            map_dtos::LocationDetailDto,
            ApiResponse<map_dtos::SurfaceSnapshotDto>,
            ApiResponse<map_dtos::ActionOutcomeDto>,
            ApiResponse<map_dtos::LocationDetailDto>,
            ApiResponse<Vec<map_models::MarkerStyle>>,
        )
    ),
    tags(
        (name = "sessions", description = "Explicit login and logout"),
        (name = "surfaces", description = "Mounted map surfaces and their location actions"),
        (name = "viewport", description = "Map viewport and device location"),
        (name = "legend", description = "Marker glyph and badge table (public)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "StreetMapper API",
        version = "0.1.0",
        description = "Map state engine for community-contributed street locations",
    )
)]
pub struct ApiDoc;

/// Adds the session bearer scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("UUID")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
