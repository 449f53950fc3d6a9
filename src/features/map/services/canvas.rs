use std::collections::HashSet;

use crate::features::locations::models::LocationId;
use crate::features::map::models::{OverlayOp, Viewport};

/// Rendering adapter a map surface drives.
///
/// Implementations consume plain overlay ops and own no business logic.
pub trait MapCanvas: Send {
    fn apply(&mut self, op: &OverlayOp);

    fn set_view(&mut self, viewport: &Viewport);

    /// Free the map resource. Called once, when the surface is torn down.
    fn release(&mut self);
}

/// Server-side canvas. The browser renders from the emitted patches; this
/// keeps a mirror of what it should have attached.
#[derive(Debug, Default)]
pub struct HeadlessCanvas {
    attached: HashSet<LocationId>,
    released: bool,
}

impl HeadlessCanvas {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MapCanvas for HeadlessCanvas {
    fn apply(&mut self, op: &OverlayOp) {
        match op {
            OverlayOp::Attach { marker } => {
                self.attached.insert(marker.id.clone());
            }
            OverlayOp::Detach { id } => {
                self.attached.remove(id);
            }
            OverlayOp::Rekey { from, to } => {
                if self.attached.remove(from) {
                    self.attached.insert(to.clone());
                }
            }
            OverlayOp::Restyle { .. }
            | OverlayOp::Rebind { .. }
            | OverlayOp::UpdateDetail { .. }
            | OverlayOp::OpenPopup { .. } => {}
        }
    }

    fn set_view(&mut self, viewport: &Viewport) {
        tracing::trace!(
            "Canvas view at {},{} zoom {}",
            viewport.center.lat,
            viewport.center.lng,
            viewport.zoom
        );
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        tracing::trace!("Releasing canvas with {} markers", self.attached.len());
        self.attached.clear();
        self.released = true;
    }
}

#[cfg(test)]
pub use recording::{CanvasEvent, RecordingCanvas};


#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::locations::models::{LocationCategory, LocationStatus};
    use crate::features::map::models::{Marker, MarkerAction};
    use crate::shared::test_helpers::location;

    #[test]
    fn test_headless_canvas_mirrors_attach_detach_and_rekey() {
        let mut canvas = HeadlessCanvas::new();
        let loc = location("temp-1", LocationCategory::Road, LocationStatus::Pending, "u1");

        canvas.apply(&OverlayOp::Attach {
            marker: Marker::new(&loc, vec![MarkerAction::Details]),
        });
        canvas.apply(&OverlayOp::Rekey {
            from: LocationId::from("temp-1"),
            to: LocationId::from("7"),
        });
        assert!(canvas.attached.contains(&LocationId::from("7")));

        canvas.apply(&OverlayOp::Detach {
            id: LocationId::from("7"),
        });
        assert!(canvas.attached.is_empty());
    }

    #[test]
    fn test_release_clears_state() {
        let mut canvas = HeadlessCanvas::new();
        let loc = location("1", LocationCategory::Business, LocationStatus::Verified, "u1");
        canvas.apply(&OverlayOp::Attach {
            marker: Marker::new(&loc, vec![MarkerAction::Details]),
        });

        canvas.release();
        canvas.release();

        assert!(canvas.attached.is_empty());
        assert!(canvas.released);
    }
}
