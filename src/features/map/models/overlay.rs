use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::marker::{ActionBinding, Marker, MarkerDetail, MarkerStyle};
use crate::features::locations::models::LocationId;

/// One mutation of the rendered overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum OverlayOp {
    /// Create and attach a marker
    Attach { marker: Marker },
    /// Detach and dispose a marker
    Detach { id: LocationId },
    /// Swap glyph and badge of an attached marker in place
    Restyle { id: LocationId, style: MarkerStyle },
    /// Rebuild the popup action buttons of an attached marker
    Rebind { id: LocationId, binding: ActionBinding },
    /// Refresh title and popup text of an attached marker
    #[serde(rename_all = "camelCase")]
    UpdateDetail {
        id: LocationId,
        title: String,
        detail: MarkerDetail,
    },
    /// Move an attached marker to the permanent id of its location
    Rekey { from: LocationId, to: LocationId },
    /// Open the popup of an attached marker
    OpenPopup { id: LocationId },
}

/// Ordered list of overlay mutations produced by one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OverlayPatch {
    ops: Vec<OverlayOp>,
}

impl OverlayPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: OverlayOp) {
        self.ops.push(op);
    }

    pub fn append(&mut self, other: OverlayPatch) {
        self.ops.extend(other.ops);
    }

    pub fn ops(&self) -> &[OverlayOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<OverlayOp> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn attached(&self) -> impl Iterator<Item = &LocationId> {
        self.ops.iter().filter_map(|op| match op {
            OverlayOp::Attach { marker } => Some(&marker.id),
            _ => None,
        })
    }

    pub fn detached(&self) -> impl Iterator<Item = &LocationId> {
        self.ops.iter().filter_map(|op| match op {
            OverlayOp::Detach { id } => Some(id),
            _ => None,
        })
    }
}

impl From<Vec<OverlayOp>> for OverlayPatch {
    fn from(ops: Vec<OverlayOp>) -> Self {
        Self { ops }
    }
}
