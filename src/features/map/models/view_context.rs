use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mode a map surface is mounted in. Fixed for the lifetime of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewContext {
    /// Public explorer
    Public,
    /// Personal contributions map
    Dashboard,
    /// Moderation console
    Admin,
}

impl ViewContext {
    pub fn title(&self) -> &'static str {
        match self {
            ViewContext::Public => "Explore Locations",
            ViewContext::Dashboard => "Your Contributions Map",
            ViewContext::Admin => "Admin Map View",
        }
    }
}

impl std::fmt::Display for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewContext::Public => write!(f, "public"),
            ViewContext::Dashboard => write!(f, "dashboard"),
            ViewContext::Admin => write!(f, "admin"),
        }
    }
}
