mod canvas;
mod filter_engine;
mod geolocation;
mod map_service;
mod map_surface;
mod marker_synchronizer;
mod view_policy;
mod viewport_controller;

pub use canvas::{HeadlessCanvas, MapCanvas};
#[cfg(test)]
pub use canvas::{CanvasEvent, RecordingCanvas};
pub use filter_engine::FilterEngine;
pub use geolocation::{DeviceLocator, LocateError, ReportedFix};
pub use map_service::MapService;
pub use map_surface::{ActionOutcome, IgnoreReason, LocationChange, LocationDetail, MapSurface};
pub use marker_synchronizer::MarkerSynchronizer;
pub use view_policy::{Mutation, PolicyDenial, ViewPolicy};
pub use viewport_controller::ViewportController;
