use std::time::Duration;

use crate::features::locations::models::Coordinates;
use crate::features::map::models::Viewport;
use crate::features::map::services::{DeviceLocator, LocateError};
use crate::shared::constants::USER_LOCATION_ZOOM;

/// Center and zoom of one map surface, plus the pin placement toggle
#[derive(Debug, Clone)]
pub struct ViewportController {
    viewport: Viewport,
    user_position: Option<Coordinates>,
    placing: bool,
}

impl ViewportController {
    pub fn new(default_viewport: Viewport) -> Self {
        Self {
            viewport: default_viewport,
            user_position: None,
            placing: false,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn user_position(&self) -> Option<Coordinates> {
        self.user_position
    }

    pub fn center(&mut self, coordinates: Coordinates, zoom: u8) -> Viewport {
        self.viewport = Viewport::new(coordinates, zoom);
        self.viewport
    }

    /// Wait for a position fix. Takes no `self` so callers can await it
    /// without holding the surface.
    pub async fn locate(
        locator: &dyn DeviceLocator,
        timeout: Duration,
    ) -> Result<Coordinates, LocateError> {
        match tokio::time::timeout(timeout, locator.current_position()).await {
            Ok(result) => result,
            Err(_) => Err(LocateError::Timeout),
        }
    }

    /// Center on a successful fix. A failed fix leaves the viewport where it was.
    pub fn apply_fix(&mut self, fix: Result<Coordinates, LocateError>) -> Option<Viewport> {
        match fix {
            Ok(position) => {
                self.user_position = Some(position);
                Some(self.center(position, USER_LOCATION_ZOOM))
            }
            Err(e) => {
                tracing::warn!("Device location unavailable, keeping current center: {}", e);
                None
            }
        }
    }

    /// Center on the last known user position, if any
    pub fn recenter_on_user(&mut self) -> Option<Viewport> {
        let position = self.user_position?;
        Some(self.center(position, USER_LOCATION_ZOOM))
    }

    pub fn toggle_placement(&mut self) -> bool {
        self.placing = !self.placing;
        self.placing
    }

    pub fn placement_active(&self) -> bool {
        self.placing
    }

    /// Consume placement mode for a coordinate selection. Returns the point
    /// to place at, or `None` when placement mode is off.
    pub fn take_placement(&mut self, point: Coordinates) -> Option<Coordinates> {
        if !self.placing {
            return None;
        }
        self.placing = false;
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::features::map::services::ReportedFix;
    use crate::shared::constants::{DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG, DEFAULT_ZOOM, MAX_ZOOM};

    struct NeverAnswers;

    #[async_trait]
    impl DeviceLocator for NeverAnswers {
        async fn current_position(&self) -> Result<Coordinates, LocateError> {
            std::future::pending().await
        }
    }

    fn controller() -> ViewportController {
        ViewportController::new(Viewport::new(
            Coordinates::new(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG),
            DEFAULT_ZOOM,
        ))
    }

    #[tokio::test]
    async fn test_successful_fix_centers_at_user_zoom() {
        let mut vc = controller();
        let fix = ReportedFix(Ok(Coordinates::new(-15.39, 28.32)));

        let fix = ViewportController::locate(&fix, Duration::from_secs(1)).await;
        let view = vc.apply_fix(fix).unwrap();

        assert_eq!(view.center, Coordinates::new(-15.39, 28.32));
        assert_eq!(view.zoom, USER_LOCATION_ZOOM);
        assert_eq!(vc.user_position(), Some(Coordinates::new(-15.39, 28.32)));
    }

    #[tokio::test]
    async fn test_denied_fix_keeps_default_center() {
        let mut vc = controller();
        let before = vc.viewport();

        let fix = ViewportController::locate(
            &ReportedFix(Err(LocateError::PermissionDenied)),
            Duration::from_secs(1),
        )
        .await;
        let view = vc.apply_fix(fix);

        assert!(view.is_none());
        assert_eq!(vc.viewport(), before);
        assert!(vc.recenter_on_user().is_none());
    }

    #[tokio::test]
    async fn test_silent_platform_times_out() {
        let result = ViewportController::locate(&NeverAnswers, Duration::from_millis(20)).await;
        assert_eq!(result, Err(LocateError::Timeout));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vc = controller();
        let view = vc.center(Coordinates::new(0.0, 0.0), 42);
        assert_eq!(view.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_placement_is_consumed_by_one_selection() {
        let mut vc = controller();
        let point = Coordinates::new(-15.41, 28.28);

        assert!(vc.take_placement(point).is_none());
        assert!(vc.toggle_placement());
        assert_eq!(vc.take_placement(point), Some(point));
        assert!(!vc.placement_active());
        assert!(vc.take_placement(point).is_none());
    }
}
