use std::collections::HashMap;

use crate::features::locations::models::{Location, LocationId};
use crate::features::map::models::{
    Marker, MarkerAction, MarkerDetail, MarkerKey, MarkerStyle, OverlayOp, OverlayPatch,
};
use crate::features::map::services::ViewPolicy;

/// Registry of rendered markers keyed by location id.
///
/// `reconcile` diffs the registry against the next visible sequence using
/// id lookups only, so a pass is linear in `rendered + visible`. A marker
/// whose location stays visible is never detached; its style, action binding
/// and popup text are patched in place.
#[derive(Debug, Default)]
pub struct MarkerSynchronizer {
    registry: HashMap<LocationId, Marker>,
}

impl MarkerSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconcile<'a, I>(&mut self, visible: I, policy: &ViewPolicy) -> OverlayPatch
    where
        I: IntoIterator<Item = &'a Location>,
    {
        let mut previous = std::mem::take(&mut self.registry);
        let mut next = HashMap::with_capacity(previous.len());
        let mut changes = OverlayPatch::new();

        for location in visible {
            let actions = policy.marker_actions(location);

            let marker = match previous.remove(&location.id) {
                Some(mut marker) => {
                    patch_in_place(&mut marker, location, actions, &mut changes);
                    marker
                }
                None => {
                    let marker = Marker::new(location, actions);
                    changes.push(OverlayOp::Attach {
                        marker: marker.clone(),
                    });
                    marker
                }
            };

            next.insert(location.id.clone(), marker);
        }

        // Whatever was not claimed by a visible location is gone
        let mut patch = OverlayPatch::new();
        for id in previous.into_keys() {
            patch.push(OverlayOp::Detach { id });
        }
        patch.append(changes);

        self.registry = next;

        tracing::debug!(
            "Reconciled overlay: {} markers, {} ops",
            self.registry.len(),
            patch.len()
        );

        patch
    }

    /// Move a marker to the permanent id of its location, keeping it attached
    pub fn rekey(&mut self, from: &LocationId, to: LocationId) -> Option<OverlayOp> {
        let mut marker = self.registry.remove(from)?;
        marker.id = to.clone();
        self.registry.insert(to.clone(), marker);

        Some(OverlayOp::Rekey {
            from: from.clone(),
            to,
        })
    }

    pub fn open_popup(&self, id: &LocationId) -> Option<OverlayOp> {
        self.registry
            .contains_key(id)
            .then(|| OverlayOp::OpenPopup { id: id.clone() })
    }

    /// Detach everything
    pub fn clear(&mut self) -> OverlayPatch {
        self.registry
            .drain()
            .map(|(id, _)| OverlayOp::Detach { id })
            .collect::<Vec<_>>()
            .into()
    }

    pub fn get(&self, id: &LocationId) -> Option<&Marker> {
        self.registry.get(id)
    }

    pub fn contains(&self, id: &LocationId) -> bool {
        self.registry.contains_key(id)
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.registry.values()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

fn patch_in_place(
    marker: &mut Marker,
    location: &Location,
    actions: Vec<MarkerAction>,
    patch: &mut OverlayPatch,
) {
    let key = MarkerKey::of(location);
    if marker.key() != key {
        marker.style = MarkerStyle::for_key(key);
        patch.push(OverlayOp::Restyle {
            id: marker.id.clone(),
            style: marker.style.clone(),
        });
    }

    let binding = &mut marker.binding;
    if binding.status != location.status
        || binding.contributor_id != location.contributor_id
        || binding.actions != actions
    {
        binding.status = location.status;
        binding.contributor_id = location.contributor_id.clone();
        binding.actions = actions;
        patch.push(OverlayOp::Rebind {
            id: marker.id.clone(),
            binding: binding.clone(),
        });
    }

    let detail = MarkerDetail::from(location);
    if marker.title != location.name || marker.detail != detail {
        marker.title = location.name.clone();
        marker.detail = detail;
        patch.push(OverlayOp::UpdateDetail {
            id: marker.id.clone(),
            title: marker.title.clone(),
            detail: marker.detail.clone(),
        });
    }
}
