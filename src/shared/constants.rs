// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Moderator role - can mount the moderation map and approve or reject submissions
pub const ROLE_MODERATOR: &str = "moderator";

/// Contributor role - can place pins and manage their own submissions
pub const ROLE_CONTRIBUTOR: &str = "contributor";

/// Contributor label used when a session does not set a display name
pub const DEFAULT_DISPLAY_NAME: &str = "You";

// =============================================================================
// MAP CONSTANTS
// =============================================================================

/// Default map center (Lusaka, Zambia)
pub const DEFAULT_CENTER_LAT: f64 = -15.4167;
pub const DEFAULT_CENTER_LNG: f64 = 28.2833;

/// Zoom when a surface is mounted
pub const DEFAULT_ZOOM: u8 = 13;

/// Zoom used when centering on the device position
pub const USER_LOCATION_ZOOM: u8 = 15;

/// Zoom used when jumping to a single location
pub const FOCUS_LOCATION_ZOOM: u8 = 17;

/// Highest zoom offered by the tile layer
pub const MAX_ZOOM: u8 = 19;

/// Default wait for a device position fix, in milliseconds
pub const DEFAULT_GEOLOCATION_TIMEOUT_MS: u64 = 10_000;
