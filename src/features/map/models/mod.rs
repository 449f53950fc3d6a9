mod filters;
mod marker;
mod overlay;
mod view_context;
mod viewport;

pub use filters::MapFilters;
pub use marker::{
    ActionBinding, Marker, MarkerAction, MarkerDetail, MarkerGlyph, MarkerKey, MarkerStyle,
    StatusBadge,
};
pub use overlay::{OverlayOp, OverlayPatch};
pub use view_context::ViewContext;
pub use viewport::Viewport;
