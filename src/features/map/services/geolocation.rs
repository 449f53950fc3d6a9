use async_trait::async_trait;
use thiserror::Error;

use crate::features::locations::models::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable")]
    Unavailable,

    #[error("Timed out waiting for a position fix")]
    Timeout,
}

/// Source of the device's current position
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocateError>;
}

/// A fix the platform already reported, e.g. posted by the browser after
/// `navigator.geolocation` answered.
#[derive(Debug, Clone, Copy)]
pub struct ReportedFix(pub Result<Coordinates, LocateError>);

#[async_trait]
impl DeviceLocator for ReportedFix {
    async fn current_position(&self) -> Result<Coordinates, LocateError> {
        match self.0 {
            Ok(point) if !point.is_valid() => Err(LocateError::Unavailable),
            other => other,
        }
    }
}
