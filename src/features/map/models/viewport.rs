use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::locations::models::Coordinates;
use crate::shared::constants::MAX_ZOOM;

/// Map center and zoom level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: u8,
}

impl Viewport {
    pub fn new(center: Coordinates, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.min(MAX_ZOOM),
        }
    }
}
