use thiserror::Error;

use crate::features::locations::models::{
    Coordinates, Location, LocationCategory, LocationId, LocationStatus, NewLocation,
};
use crate::features::locations::services::StoreRejection;
use crate::features::locations::LocationStore;
use crate::features::map::models::{
    MapFilters, Marker, MarkerAction, OverlayOp, OverlayPatch, ViewContext, Viewport,
};
use crate::features::map::services::{
    FilterEngine, LocateError, MapCanvas, MarkerSynchronizer, Mutation, PolicyDenial,
    ViewPolicy, ViewportController,
};
use crate::shared::constants::FOCUS_LOCATION_ZOOM;

/// Why an action left the surface unchanged
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IgnoreReason {
    #[error("Location {0} not found")]
    NotFound(LocationId),

    #[error(transparent)]
    Denied(#[from] PolicyDenial),

    #[error("Cannot move a location from {from} to {to}")]
    InvalidTransition {
        from: LocationStatus,
        to: LocationStatus,
    },

    #[error("Placement mode is off")]
    NotPlacing,

    #[error("This filter is fixed on the {0} map")]
    FilterLocked(ViewContext),

    #[error("Location id {0} is already taken")]
    Conflict(LocationId),
}

impl IgnoreReason {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            IgnoreReason::NotFound(_) => "not_found",
            IgnoreReason::Denied(_) => "denied",
            IgnoreReason::InvalidTransition { .. } => "invalid_transition",
            IgnoreReason::NotPlacing => "not_placing",
            IgnoreReason::FilterLocked(_) => "filter_locked",
            IgnoreReason::Conflict(_) => "conflict",
        }
    }
}

impl From<StoreRejection> for IgnoreReason {
    fn from(rejection: StoreRejection) -> Self {
        match rejection {
            StoreRejection::NotFound(id) => IgnoreReason::NotFound(id),
            StoreRejection::InvalidTransition { from, to } => {
                IgnoreReason::InvalidTransition { from, to }
            }
            StoreRejection::DuplicateId(id) => IgnoreReason::Conflict(id),
        }
    }
}

/// Store effect of an applied action, for the persistence seam
#[derive(Debug, Clone, PartialEq)]
pub enum LocationChange {
    Created(Location),
    Updated(Location),
    Deleted(LocationId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Applied {
        change: Option<LocationChange>,
        patch: OverlayPatch,
    },
    Ignored(IgnoreReason),
}

impl ActionOutcome {
    fn view_only(patch: OverlayPatch) -> Self {
        ActionOutcome::Applied {
            change: None,
            patch,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied { .. })
    }

    pub fn patch(&self) -> Option<&OverlayPatch> {
        match self {
            ActionOutcome::Applied { patch, .. } => Some(patch),
            ActionOutcome::Ignored(_) => None,
        }
    }

    pub fn change(&self) -> Option<&LocationChange> {
        match self {
            ActionOutcome::Applied { change, .. } => change.as_ref(),
            ActionOutcome::Ignored(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&IgnoreReason> {
        match self {
            ActionOutcome::Ignored(reason) => Some(reason),
            ActionOutcome::Applied { .. } => None,
        }
    }
}

/// A location as shown in its detail view, with the buttons the viewer gets
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDetail {
    pub location: Location,
    pub actions: Vec<MarkerAction>,
}

/// One mounted map: store, filters, viewport and rendered overlay for a
/// single viewer in a single context.
///
/// Every store mutation is followed by a reconciliation pass before the call
/// returns, so the canvas never lags the store. Dropping the surface detaches
/// all markers and releases the canvas.
pub struct MapSurface {
    policy: ViewPolicy,
    contributor_label: String,
    filters: MapFilters,
    store: LocationStore,
    markers: MarkerSynchronizer,
    viewport: ViewportController,
    canvas: Box<dyn MapCanvas>,
}

impl MapSurface {
    /// Load the one-shot location set and render it. Returns the surface and
    /// the initial patch.
    pub fn mount(
        policy: ViewPolicy,
        contributor_label: impl Into<String>,
        locations: Vec<Location>,
        default_viewport: Viewport,
        canvas: Box<dyn MapCanvas>,
    ) -> (Self, OverlayPatch) {
        let mut surface = Self {
            policy,
            contributor_label: contributor_label.into(),
            filters: MapFilters::default(),
            store: LocationStore::from_locations(locations),
            markers: MarkerSynchronizer::new(),
            viewport: ViewportController::new(default_viewport),
            canvas,
        };

        surface.canvas.set_view(&default_viewport);
        let patch = surface.commit();

        tracing::debug!(
            "Mounted {} map for {} with {} of {} locations visible",
            surface.policy.context(),
            surface.policy.viewer_id(),
            surface.markers.len(),
            surface.store.len()
        );

        (surface, patch)
    }

    pub fn context(&self) -> ViewContext {
        self.policy.context()
    }

    pub fn policy(&self) -> &ViewPolicy {
        &self.policy
    }

    pub fn filters(&self) -> &MapFilters {
        &self.filters
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    pub fn user_position(&self) -> Option<Coordinates> {
        self.viewport.user_position()
    }

    pub fn placement_active(&self) -> bool {
        self.viewport.placement_active()
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.markers()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    /// Locations passing both the user filter and the context override
    pub fn visible(&self) -> impl Iterator<Item = &Location> {
        let filters = &self.filters;
        let policy = &self.policy;
        self.store
            .list()
            .iter()
            .filter(move |l| is_visible(l, filters, policy))
    }

    pub fn toggle_category(&mut self, category: LocationCategory) -> ActionOutcome {
        self.filters.toggle_category(category);
        ActionOutcome::view_only(self.commit())
    }

    pub fn toggle_status(&mut self, status: LocationStatus) -> ActionOutcome {
        self.filters.toggle_status(status);
        ActionOutcome::view_only(self.commit())
    }

    pub fn toggle_only_mine(&mut self) -> ActionOutcome {
        if !self.policy.allows_only_mine_toggle() {
            return self.ignore(IgnoreReason::FilterLocked(self.context()));
        }
        self.filters.toggle_only_mine();
        ActionOutcome::view_only(self.commit())
    }

    pub fn toggle_placement(&mut self) -> ActionOutcome {
        if let Err(denial) = self.policy.authorize_place() {
            return self.ignore(denial.into());
        }
        self.viewport.toggle_placement();
        ActionOutcome::view_only(OverlayPatch::new())
    }

    /// Coordinate selection on the map. Places a pending location when
    /// placement mode is on and opens its popup; otherwise does nothing.
    pub fn select_point(&mut self, point: Coordinates) -> ActionOutcome {
        let Some(point) = self.viewport.take_placement(point) else {
            return self.ignore(IgnoreReason::NotPlacing);
        };
        if let Err(denial) = self.policy.authorize_place() {
            return self.ignore(denial.into());
        }

        let candidate = NewLocation::at(point, self.policy.viewer_id())
            .contributor(self.contributor_label.clone());
        let created = self.store.add(candidate);

        let mut patch = self.commit();
        if let Some(op) = self.markers.open_popup(&created.id) {
            self.canvas.apply(&op);
            patch.push(op);
        }

        ActionOutcome::Applied {
            change: Some(LocationChange::Created(created)),
            patch,
        }
    }

    pub fn detail(&self, id: &LocationId) -> Option<LocationDetail> {
        let location = self.store.get(id).filter(|l| self.policy.admits(l))?;
        Some(LocationDetail {
            location: location.clone(),
            actions: self.policy.marker_actions(location),
        })
    }

    /// Save the edit form. Authorization is checked against the stored record.
    pub fn save(&mut self, location: Location) -> ActionOutcome {
        if let Err(reason) = self.authorize(Mutation::Edit, &location.id) {
            return self.ignore(reason);
        }

        let updated = match self.store.update(location) {
            Ok(updated) => updated.clone(),
            Err(rejection) => return self.ignore(rejection.into()),
        };

        ActionOutcome::Applied {
            change: Some(LocationChange::Updated(updated)),
            patch: self.commit(),
        }
    }

    pub fn delete(&mut self, id: &LocationId) -> ActionOutcome {
        if let Err(reason) = self.authorize(Mutation::Delete, id) {
            return self.ignore(reason);
        }

        if let Err(rejection) = self.store.delete(id) {
            return self.ignore(rejection.into());
        }

        ActionOutcome::Applied {
            change: Some(LocationChange::Deleted(id.clone())),
            patch: self.commit(),
        }
    }

    pub fn approve(&mut self, id: &LocationId) -> ActionOutcome {
        self.set_status(id, LocationStatus::Verified)
    }

    pub fn reject(&mut self, id: &LocationId) -> ActionOutcome {
        self.set_status(id, LocationStatus::Rejected)
    }

    fn set_status(&mut self, id: &LocationId, status: LocationStatus) -> ActionOutcome {
        if let Err(reason) = self.authorize(Mutation::SetStatus(status), id) {
            return self.ignore(reason);
        }

        let updated = match self.store.set_status(id, status) {
            Ok(updated) => updated.clone(),
            Err(rejection) => return self.ignore(rejection.into()),
        };

        ActionOutcome::Applied {
            change: Some(LocationChange::Updated(updated)),
            patch: self.commit(),
        }
    }

    /// Jump to a visible location and open its popup
    pub fn focus(&mut self, id: &LocationId) -> ActionOutcome {
        let Some(op) = self.markers.open_popup(id) else {
            return self.ignore(IgnoreReason::NotFound(id.clone()));
        };
        let Some(position) = self.store.get(id).map(Location::coordinates) else {
            return self.ignore(IgnoreReason::NotFound(id.clone()));
        };

        self.center(position, FOCUS_LOCATION_ZOOM);
        self.canvas.apply(&op);
        ActionOutcome::view_only(vec![op].into())
    }

    /// Adopt the permanent id the repository assigned to a temporary location
    pub fn confirm_persisted(&mut self, temporary: &LocationId, permanent: LocationId) -> OverlayPatch {
        let mut patch = OverlayPatch::new();
        if temporary == &permanent {
            return patch;
        }

        if let Err(rejection) = self.store.rekey(temporary, permanent.clone()) {
            tracing::debug!("Skipping rekey of {}: {}", temporary, rejection);
            return patch;
        }
        if let Some(op) = self.markers.rekey(temporary, permanent) {
            self.canvas.apply(&op);
            patch.push(op);
        }
        patch
    }

    pub fn center(&mut self, coordinates: Coordinates, zoom: u8) -> Viewport {
        let viewport = self.viewport.center(coordinates, zoom);
        self.canvas.set_view(&viewport);
        viewport
    }

    /// Apply a device position fix. Failure keeps the current viewport.
    pub fn apply_device_fix(&mut self, fix: Result<Coordinates, LocateError>) -> Option<Viewport> {
        let viewport = self.viewport.apply_fix(fix)?;
        self.canvas.set_view(&viewport);
        Some(viewport)
    }

    pub fn recenter_on_user(&mut self) -> Option<Viewport> {
        let viewport = self.viewport.recenter_on_user()?;
        self.canvas.set_view(&viewport);
        Some(viewport)
    }

    /// Re-evaluate visibility, reconcile markers and push the patch to the canvas
    fn commit(&mut self) -> OverlayPatch {
        let filters = &self.filters;
        let policy = &self.policy;
        let visible = self
            .store
            .list()
            .iter()
            .filter(|l| is_visible(l, filters, policy));

        let patch = self.markers.reconcile(visible, policy);
        for op in patch.ops() {
            self.canvas.apply(op);
        }
        patch
    }

    fn authorize(&self, mutation: Mutation, id: &LocationId) -> Result<(), IgnoreReason> {
        let current = self
            .store
            .get(id)
            .ok_or_else(|| IgnoreReason::NotFound(id.clone()))?;
        self.policy.authorize(mutation, current)?;
        Ok(())
    }

    fn ignore(&self, reason: IgnoreReason) -> ActionOutcome {
        tracing::debug!(
            "Ignored action on {} map of {}: {}",
            self.policy.context(),
            self.policy.viewer_id(),
            reason
        );
        ActionOutcome::Ignored(reason)
    }
}

impl Drop for MapSurface {
    fn drop(&mut self) {
        for op in self.markers.clear().ops() {
            self.canvas.apply(op);
        }
        self.canvas.release();
        tracing::debug!(
            "Released {} map of {}",
            self.policy.context(),
            self.policy.viewer_id()
        );
    }
}

fn is_visible(location: &Location, filters: &MapFilters, policy: &ViewPolicy) -> bool {
    FilterEngine::passes(location, filters, policy.viewer_id()) && policy.admits(location)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::features::locations::models::{demo_locations, DEMO_USER_ID};
    use crate::features::map::services::{CanvasEvent, RecordingCanvas};
    use crate::shared::constants::{DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG, DEFAULT_ZOOM, USER_LOCATION_ZOOM};
    use crate::shared::test_helpers::{location, random_location};

    fn default_view() -> Viewport {
        Viewport::new(Coordinates::new(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG), DEFAULT_ZOOM)
    }

    fn mount(
        context: ViewContext,
        viewer: &str,
        locations: Vec<Location>,
    ) -> (MapSurface, RecordingCanvas) {
        let canvas = RecordingCanvas::new();
        let (surface, _) = MapSurface::mount(
            ViewPolicy::new(context, viewer),
            "You",
            locations,
            default_view(),
            Box::new(canvas.clone()),
        );
        (surface, canvas)
    }

    fn visible_ids(surface: &MapSurface) -> HashSet<LocationId> {
        surface.visible().map(|l| l.id.clone()).collect()
    }

    fn marker_ids(surface: &MapSurface) -> HashSet<LocationId> {
        surface.markers().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn test_mount_renders_visible_set() {
        let (surface, canvas) = mount(ViewContext::Public, DEMO_USER_ID, demo_locations());

        assert_eq!(surface.marker_count(), 5);
        assert_eq!(canvas.attached(), visible_ids(&surface));
        assert_eq!(canvas.last_view(), Some(default_view()));
    }

    #[test]
    fn test_dashboard_mount_shows_own_locations_only() {
        let (surface, _) = mount(ViewContext::Dashboard, DEMO_USER_ID, demo_locations());

        assert_eq!(
            marker_ids(&surface),
            HashSet::from([LocationId::from("4"), LocationId::from("5")])
        );
    }

    #[test]
    fn test_placing_a_pin_adds_one_pending_marker_and_opens_it() {
        let (mut surface, canvas) = mount(ViewContext::Public, "u1", demo_locations());
        let before = surface.marker_count();

        surface.toggle_placement();
        let outcome = surface.select_point(Coordinates::new(-15.41, 28.28));

        let Some(LocationChange::Created(created)) = outcome.change().cloned() else {
            panic!("expected a created location, got {:?}", outcome);
        };
        assert_eq!(created.status, LocationStatus::Pending);
        assert!(created.id.is_temporary());
        assert_eq!(created.contributor_id, "u1");
        assert_eq!(created.contributor, "You");
        assert_eq!(surface.marker_count(), before + 1);
        assert!(!surface.placement_active());

        let patch = outcome.patch().unwrap();
        assert_eq!(patch.attached().collect::<Vec<_>>(), vec![&created.id]);
        assert_eq!(
            patch.ops().last(),
            Some(&OverlayOp::OpenPopup { id: created.id.clone() })
        );
        assert!(canvas.attached().contains(&created.id));
    }

    #[test]
    fn test_selection_outside_placement_mode_is_ignored() {
        let (mut surface, _) = mount(ViewContext::Public, "u1", demo_locations());
        let revision = surface.store().revision();

        let outcome = surface.select_point(Coordinates::new(-15.41, 28.28));

        assert_eq!(outcome, ActionOutcome::Ignored(IgnoreReason::NotPlacing));
        assert_eq!(surface.store().revision(), revision);
    }

    #[test]
    fn test_admin_cannot_enter_placement_mode() {
        let (mut surface, _) = mount(ViewContext::Admin, "mod", demo_locations());

        assert!(!surface.toggle_placement().is_applied());
        assert!(!surface.placement_active());
    }

    #[test]
    fn test_admin_approval_hides_marker_but_keeps_location() {
        let pending = location("p", LocationCategory::Road, LocationStatus::Pending, "u1");
        let (mut surface, canvas) = mount(ViewContext::Admin, "mod", vec![pending]);
        let id = LocationId::from("p");
        assert!(canvas.attached().contains(&id));

        let outcome = surface.approve(&id);

        assert!(outcome.is_applied());
        assert_eq!(outcome.patch().unwrap().detached().collect::<Vec<_>>(), vec![&id]);
        assert_eq!(surface.store().get(&id).unwrap().status, LocationStatus::Verified);
        assert!(!canvas.attached().contains(&id));
        assert_eq!(surface.marker_count(), 0);
    }

    #[test]
    fn test_admin_cannot_approve_twice() {
        let pending = location("p", LocationCategory::Road, LocationStatus::Pending, "u1");
        let (mut surface, _) = mount(ViewContext::Admin, "mod", vec![pending]);
        let id = LocationId::from("p");

        surface.reject(&id);
        let outcome = surface.approve(&id);

        assert_eq!(
            outcome,
            ActionOutcome::Ignored(IgnoreReason::Denied(PolicyDenial::NotPending))
        );
        assert_eq!(surface.store().get(&id).unwrap().status, LocationStatus::Rejected);
    }

    #[test]
    fn test_dashboard_delete_of_foreign_location_leaves_store_unchanged() {
        let theirs = location("t", LocationCategory::Business, LocationStatus::Pending, "u2");
        let (mut surface, _) = mount(ViewContext::Dashboard, "u1", vec![theirs]);
        let revision = surface.store().revision();

        let outcome = surface.delete(&LocationId::from("t"));

        assert_eq!(
            outcome,
            ActionOutcome::Ignored(IgnoreReason::Denied(PolicyDenial::NotOwner))
        );
        assert_eq!(surface.store().len(), 1);
        assert_eq!(surface.store().revision(), revision);
    }

    #[test]
    fn test_stale_ids_are_ignored() {
        let (mut surface, _) = mount(ViewContext::Dashboard, DEMO_USER_ID, demo_locations());
        let ghost = LocationId::from("missing");

        assert_eq!(
            surface.delete(&ghost),
            ActionOutcome::Ignored(IgnoreReason::NotFound(ghost.clone()))
        );
        let mut edit = demo_locations().remove(3);
        edit.id = ghost.clone();
        assert!(!surface.save(edit).is_applied());
        assert!(!surface.focus(&ghost).is_applied());
    }

    #[test]
    fn test_dashboard_save_updates_marker_in_place() {
        let (mut surface, _) = mount(ViewContext::Dashboard, DEMO_USER_ID, demo_locations());
        let id = LocationId::from("5");
        let mut edit = surface.detail(&id).unwrap().location;
        edit.description = Some("Now with benches".to_string());

        let outcome = surface.save(edit);

        let patch = outcome.patch().unwrap();
        assert!(patch.attached().next().is_none());
        assert!(patch.detached().next().is_none());
        assert!(matches!(patch.ops(), [OverlayOp::UpdateDetail { .. }]));
    }

    #[test]
    fn test_overlay_tracks_store_through_mixed_actions() {
        let mut seed: Vec<Location> = (0..25).map(|_| random_location()).collect();
        seed.extend(demo_locations());
        let (mut surface, canvas) = mount(ViewContext::Dashboard, "u1", seed);

        for step in 0..120usize {
            let ids: Vec<LocationId> = surface.store().list().iter().map(|l| l.id.clone()).collect();
            let target = ids[step % ids.len()].clone();
            match step % 5 {
                0 => {
                    surface.toggle_placement();
                    surface.select_point(Coordinates::new(-15.4, 28.3));
                }
                1 => {
                    surface.delete(&target);
                }
                2 => {
                    if let Some(mut loc) = surface.store().get(&target).cloned() {
                        loc.category = LocationCategory::ALL[(step / 5) % 3];
                        surface.save(loc);
                    }
                }
                3 => {
                    surface.toggle_status(LocationStatus::ALL[(step / 5) % 3]);
                }
                _ => {
                    surface.toggle_category(LocationCategory::ALL[(step / 5) % 3]);
                }
            }

            assert_eq!(marker_ids(&surface), visible_ids(&surface), "step {}", step);
            assert_eq!(canvas.attached(), visible_ids(&surface), "step {}", step);
        }
    }

    #[test]
    fn test_only_mine_is_locked_outside_public() {
        let (mut surface, _) = mount(ViewContext::Admin, "mod", demo_locations());
        assert_eq!(
            surface.toggle_only_mine(),
            ActionOutcome::Ignored(IgnoreReason::FilterLocked(ViewContext::Admin))
        );

        let (mut surface, _) = mount(ViewContext::Public, DEMO_USER_ID, demo_locations());
        assert!(surface.toggle_only_mine().is_applied());
        assert_eq!(surface.marker_count(), 2);
    }

    #[test]
    fn test_focus_centers_and_opens_popup() {
        let (mut surface, canvas) = mount(ViewContext::Public, "u1", demo_locations());
        let id = LocationId::from("2");

        let outcome = surface.focus(&id);

        assert_eq!(
            outcome.patch().unwrap().ops(),
            &[OverlayOp::OpenPopup { id: id.clone() }]
        );
        assert_eq!(surface.viewport().zoom, FOCUS_LOCATION_ZOOM);
        assert_eq!(
            surface.viewport().center,
            surface.store().get(&id).unwrap().coordinates()
        );
        assert_eq!(canvas.last_view(), Some(surface.viewport()));
    }

    #[test]
    fn test_confirm_persisted_rekeys_without_reattaching() {
        let (mut surface, canvas) = mount(ViewContext::Public, "u1", vec![]);
        surface.toggle_placement();
        let created = match surface.select_point(Coordinates::new(-15.41, 28.28)).change() {
            Some(LocationChange::Created(l)) => l.clone(),
            other => panic!("unexpected {:?}", other),
        };

        let permanent = LocationId::from("1001");
        let patch = surface.confirm_persisted(&created.id, permanent.clone());

        assert_eq!(
            patch.ops(),
            &[OverlayOp::Rekey {
                from: created.id.clone(),
                to: permanent.clone()
            }]
        );
        assert!(surface.store().get(&permanent).is_some());
        assert_eq!(canvas.attached(), HashSet::from([permanent]));
    }

    #[test]
    fn test_failed_device_fix_keeps_default_view() {
        let (mut surface, _) = mount(ViewContext::Public, "u1", demo_locations());

        assert!(surface.apply_device_fix(Err(LocateError::PermissionDenied)).is_none());
        assert_eq!(surface.viewport(), default_view());
        assert!(surface.recenter_on_user().is_none());

        let fix = Coordinates::new(-15.39, 28.31);
        let view = surface.apply_device_fix(Ok(fix)).unwrap();
        assert_eq!(view.zoom, USER_LOCATION_ZOOM);
        assert_eq!(surface.user_position(), Some(fix));
    }

    #[test]
    fn test_drop_detaches_markers_and_releases_canvas() {
        let (surface, canvas) = mount(ViewContext::Public, "u1", demo_locations());
        assert_eq!(canvas.attached().len(), 5);

        drop(surface);

        assert!(canvas.attached().is_empty());
        assert!(canvas.released());
        assert_eq!(canvas.events().last(), Some(&CanvasEvent::Released));
    }
}
