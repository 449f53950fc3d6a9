use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::core::config::MapConfig;
use crate::core::error::{AppError, Result};
use crate::features::locations::dtos::{LocationResponseDto, SaveLocationDto};
use crate::features::locations::models::{Coordinates, LocationId};
use crate::features::locations::LocationRepository;
use crate::features::map::dtos::{
    ActionOutcomeDto, DeviceFixDto, FilterToggleDto, LocationDetailDto, SurfaceSnapshotDto,
};
use crate::features::map::models::{OverlayOp, OverlayPatch, ViewContext};
use crate::features::map::services::{
    ActionOutcome, HeadlessCanvas, IgnoreReason, LocationChange, MapSurface, ReportedFix,
    ViewPolicy, ViewportController,
};
use crate::features::sessions::models::Session;

struct SurfaceHandle {
    owner: Uuid,
    surface: Arc<Mutex<MapSurface>>,
}

/// Registry of mounted map surfaces.
///
/// Each surface sits behind its own mutex, so one action (store mutation,
/// filtering and reconciliation) completes before the next one on the same
/// surface starts. The repository write for an action completes inside the
/// same turn.
pub struct MapService {
    repository: Arc<dyn LocationRepository>,
    config: MapConfig,
    surfaces: RwLock<HashMap<Uuid, SurfaceHandle>>,
}

impl MapService {
    pub fn new(repository: Arc<dyn LocationRepository>, config: MapConfig) -> Self {
        Self {
            repository,
            config,
            surfaces: RwLock::new(HashMap::new()),
        }
    }

    pub async fn mount(&self, session: &Session, context: ViewContext) -> Result<SurfaceSnapshotDto> {
        if context == ViewContext::Admin && !session.user.is_moderator() {
            return Err(AppError::Forbidden(
                "Moderator role required for the admin map".to_string(),
            ));
        }

        let locations = self.repository.fetch_all().await?;
        let (surface, _) = MapSurface::mount(
            ViewPolicy::new(context, session.user.id.clone()),
            session.user.display_name.clone(),
            locations,
            self.config.default_viewport(),
            Box::new(HeadlessCanvas::new()),
        );

        let surface_id = Uuid::now_v7();
        let snapshot = snapshot_of(surface_id, &surface);

        self.surfaces.write().await.insert(
            surface_id,
            SurfaceHandle {
                owner: session.token,
                surface: Arc::new(Mutex::new(surface)),
            },
        );

        tracing::info!(
            "Mounted {} surface {} for user {} ({} markers)",
            context,
            surface_id,
            session.user.id,
            snapshot.markers.len()
        );

        Ok(snapshot)
    }

    pub async fn unmount(&self, session: &Session, surface_id: Uuid) -> Result<()> {
        let mut surfaces = self.surfaces.write().await;
        match surfaces.get(&surface_id) {
            Some(handle) if handle.owner == session.token => {}
            _ => return Err(surface_not_found(surface_id)),
        }
        // Dropping the handle releases the surface once in-flight actions finish
        surfaces.remove(&surface_id);

        tracing::info!("Unmounted surface {} for user {}", surface_id, session.user.id);
        Ok(())
    }

    /// Release every surface mounted by a session. Returns how many were released.
    pub async fn release_for_session(&self, token: &Uuid) -> usize {
        let mut surfaces = self.surfaces.write().await;
        let before = surfaces.len();
        surfaces.retain(|_, handle| handle.owner != *token);
        let released = before - surfaces.len();

        if released > 0 {
            tracing::info!("Released {} surfaces with ended session", released);
        }
        released
    }

    pub async fn snapshot(&self, session: &Session, surface_id: Uuid) -> Result<SurfaceSnapshotDto> {
        let handle = self.handle(session, surface_id).await?;
        let surface = handle.lock().await;
        Ok(snapshot_of(surface_id, &surface))
    }

    pub async fn visible_locations(
        &self,
        session: &Session,
        surface_id: Uuid,
    ) -> Result<Vec<LocationResponseDto>> {
        let handle = self.handle(session, surface_id).await?;
        let surface = handle.lock().await;
        Ok(surface.visible().map(LocationResponseDto::from).collect())
    }

    pub async fn toggle_filter(
        &self,
        session: &Session,
        surface_id: Uuid,
        toggle: FilterToggleDto,
    ) -> Result<ActionOutcomeDto> {
        self.act(session, surface_id, |surface| match toggle {
            FilterToggleDto::Category { value } => surface.toggle_category(value),
            FilterToggleDto::Status { value } => surface.toggle_status(value),
            FilterToggleDto::OnlyMine => surface.toggle_only_mine(),
        })
        .await
    }

    pub async fn toggle_placement(&self, session: &Session, surface_id: Uuid) -> Result<ActionOutcomeDto> {
        self.act(session, surface_id, |surface| surface.toggle_placement())
            .await
    }

    pub async fn select_point(
        &self,
        session: &Session,
        surface_id: Uuid,
        point: Coordinates,
    ) -> Result<ActionOutcomeDto> {
        self.act(session, surface_id, |surface| surface.select_point(point))
            .await
    }

    pub async fn detail(
        &self,
        session: &Session,
        surface_id: Uuid,
        location_id: &LocationId,
    ) -> Result<LocationDetailDto> {
        let handle = self.handle(session, surface_id).await?;
        let surface = handle.lock().await;
        surface
            .detail(location_id)
            .map(LocationDetailDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Location {} not found", location_id)))
    }

    pub async fn save(
        &self,
        session: &Session,
        surface_id: Uuid,
        location_id: &LocationId,
        dto: SaveLocationDto,
    ) -> Result<ActionOutcomeDto> {
        self.act(session, surface_id, |surface| {
            let current = surface.store().get(location_id).cloned();
            match current {
                Some(current) => surface.save(dto.apply_to(&current)),
                None => ActionOutcome::Ignored(IgnoreReason::NotFound(location_id.clone())),
            }
        })
        .await
    }

    pub async fn delete(
        &self,
        session: &Session,
        surface_id: Uuid,
        location_id: &LocationId,
    ) -> Result<ActionOutcomeDto> {
        self.act(session, surface_id, |surface| surface.delete(location_id))
            .await
    }

    pub async fn approve(
        &self,
        session: &Session,
        surface_id: Uuid,
        location_id: &LocationId,
    ) -> Result<ActionOutcomeDto> {
        self.act(session, surface_id, |surface| surface.approve(location_id))
            .await
    }

    pub async fn reject(
        &self,
        session: &Session,
        surface_id: Uuid,
        location_id: &LocationId,
    ) -> Result<ActionOutcomeDto> {
        self.act(session, surface_id, |surface| surface.reject(location_id))
            .await
    }

    pub async fn focus(
        &self,
        session: &Session,
        surface_id: Uuid,
        location_id: &LocationId,
    ) -> Result<ActionOutcomeDto> {
        self.act(session, surface_id, |surface| surface.focus(location_id))
            .await
    }

    pub async fn center(
        &self,
        session: &Session,
        surface_id: Uuid,
        point: Coordinates,
        zoom: Option<u8>,
    ) -> Result<ActionOutcomeDto> {
        let handle = self.handle(session, surface_id).await?;
        let mut surface = handle.lock().await;
        let zoom = zoom.unwrap_or(surface.viewport().zoom);
        let viewport = surface.center(point, zoom);
        Ok(ActionOutcomeDto::viewport(true, viewport, surface.placement_active()))
    }

    /// Apply a platform-reported position. The fix is awaited before the
    /// surface is locked; failures keep the current viewport.
    pub async fn report_device_location(
        &self,
        session: &Session,
        surface_id: Uuid,
        fix: DeviceFixDto,
    ) -> Result<ActionOutcomeDto> {
        let handle = self.handle(session, surface_id).await?;

        let locator = ReportedFix(fix.into_fix());
        let fix = ViewportController::locate(&locator, self.config.geolocation_timeout).await;

        let mut surface = handle.lock().await;
        let centered = surface.apply_device_fix(fix);
        Ok(ActionOutcomeDto::viewport(
            centered.is_some(),
            surface.viewport(),
            surface.placement_active(),
        ))
    }

    pub async fn recenter(&self, session: &Session, surface_id: Uuid) -> Result<ActionOutcomeDto> {
        let handle = self.handle(session, surface_id).await?;
        let mut surface = handle.lock().await;
        let centered = surface.recenter_on_user();
        Ok(ActionOutcomeDto::viewport(
            centered.is_some(),
            surface.viewport(),
            surface.placement_active(),
        ))
    }

    /// Run one action and write its effect through to the repository.
    ///
    /// The surface lock is held until the repository has answered and any
    /// temporary id has been swapped, so the next action on the surface sees
    /// the persisted ids.
    async fn act<F>(&self, session: &Session, surface_id: Uuid, action: F) -> Result<ActionOutcomeDto>
    where
        F: FnOnce(&mut MapSurface) -> ActionOutcome,
    {
        let handle = self.handle(session, surface_id).await?;
        let mut surface = handle.lock().await;

        let outcome = match action(&mut *surface) {
            ActionOutcome::Applied { change, mut patch } => {
                if let Some(change) = &change {
                    patch.append(self.write_through(&mut *surface, change).await);
                }
                adopt_rekeyed(ActionOutcome::Applied { change, patch }, &*surface)
            }
            ignored => ignored,
        };

        Ok(ActionOutcomeDto::from_outcome(
            outcome,
            surface.viewport(),
            surface.placement_active(),
        ))
    }

    /// Persist one store effect. A repository failure is logged and leaves
    /// the overlay as it is.
    async fn write_through(&self, surface: &mut MapSurface, change: &LocationChange) -> OverlayPatch {
        match change {
            LocationChange::Created(location) | LocationChange::Updated(location) => {
                match self.repository.persist(location).await {
                    Ok(persisted) if persisted.id != location.id => {
                        surface.confirm_persisted(&location.id, persisted.id)
                    }
                    Ok(_) => OverlayPatch::new(),
                    Err(e) => {
                        tracing::warn!("Failed to persist location {}: {}", location.id, e);
                        OverlayPatch::new()
                    }
                }
            }
            LocationChange::Deleted(id) => {
                if let Err(e) = self.repository.remove(id).await {
                    tracing::warn!("Failed to remove location {}: {}", id, e);
                }
                OverlayPatch::new()
            }
        }
    }

    async fn handle(&self, session: &Session, surface_id: Uuid) -> Result<Arc<Mutex<MapSurface>>> {
        let surfaces = self.surfaces.read().await;
        surfaces
            .get(&surface_id)
            .filter(|handle| handle.owner == session.token)
            .map(|handle| Arc::clone(&handle.surface))
            .ok_or_else(|| surface_not_found(surface_id))
    }
}

fn surface_not_found(surface_id: Uuid) -> AppError {
    AppError::NotFound(format!("Surface {} not found", surface_id))
}

/// Report a created or updated location under its current id after a rekey
fn adopt_rekeyed(outcome: ActionOutcome, surface: &MapSurface) -> ActionOutcome {
    match outcome {
        ActionOutcome::Applied { change, patch } => {
            let rekeyed = patch.ops().iter().find_map(|op| match op {
                OverlayOp::Rekey { from, to } => Some((from.clone(), to.clone())),
                _ => None,
            });

            let change = match (change, rekeyed) {
                (Some(LocationChange::Created(l)), Some((from, to))) if l.id == from => surface
                    .store()
                    .get(&to)
                    .cloned()
                    .map(LocationChange::Created),
                (Some(LocationChange::Updated(l)), Some((from, to))) if l.id == from => surface
                    .store()
                    .get(&to)
                    .cloned()
                    .map(LocationChange::Updated),
                (change, _) => change,
            };

            ActionOutcome::Applied { change, patch }
        }
        ignored => ignored,
    }
}

fn snapshot_of(surface_id: Uuid, surface: &MapSurface) -> SurfaceSnapshotDto {
    let mut markers: Vec<_> = surface.markers().cloned().collect();
    markers.sort_by(|a, b| a.id.cmp(&b.id));

    SurfaceSnapshotDto {
        surface_id,
        context: surface.context(),
        title: surface.context().title().to_string(),
        viewport: surface.viewport(),
        user_position: surface.user_position(),
        filters: surface.filters().clone(),
        only_mine_toggle: surface.policy().allows_only_mine_toggle(),
        placement_active: surface.placement_active(),
        visible_count: markers.len(),
        markers,
        total_count: surface.store().len(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::features::locations::models::{
        demo_locations, Location, LocationCategory, LocationStatus, DEMO_USER_ID,
    };
    use crate::features::locations::InMemoryLocationRepository;
    use crate::shared::test_helpers::{contributor, moderator};

    fn service() -> (MapService, Arc<InMemoryLocationRepository>) {
        let repository = Arc::new(InMemoryLocationRepository::with_locations(demo_locations()));
        let service = MapService::new(repository.clone(), MapConfig::default());
        (service, repository)
    }

    fn session(user: crate::features::sessions::models::SessionUser) -> Session {
        Session {
            token: Uuid::new_v4(),
            user,
            started_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_admin_mount_requires_moderator() {
        let (service, _) = service();

        let result = service.mount(&session(contributor("u1")), ViewContext::Admin).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let snapshot = service
            .mount(&session(moderator("m1")), ViewContext::Admin)
            .await
            .unwrap();
        assert_eq!(snapshot.visible_count, 2);
        assert!(!snapshot.only_mine_toggle);
        assert_eq!(snapshot.title, "Admin Map View");
    }

    #[tokio::test]
    async fn test_surfaces_are_private_to_their_session() {
        let (service, _) = service();
        let owner = session(contributor("u1"));
        let stranger = session(contributor("u2"));

        let snapshot = service.mount(&owner, ViewContext::Public).await.unwrap();

        assert!(matches!(
            service.snapshot(&stranger, snapshot.surface_id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(service.snapshot(&owner, snapshot.surface_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_placed_pin_is_persisted_and_rekeyed() {
        let (service, repository) = service();
        let owner = session(contributor("u1"));
        let id = service.mount(&owner, ViewContext::Public).await.unwrap().surface_id;

        service.toggle_placement(&owner, id).await.unwrap();
        let outcome = service
            .select_point(&owner, id, Coordinates::new(-15.41, 28.28))
            .await
            .unwrap();

        assert!(outcome.applied);
        let location = outcome.location.unwrap();
        assert!(!location.temporary);
        assert_eq!(location.status, LocationStatus::Pending);
        assert!(outcome
            .patch
            .ops()
            .iter()
            .any(|op| matches!(op, OverlayOp::Rekey { to, .. } if *to == location.id)));

        let stored = repository.fetch_all().await.unwrap();
        assert_eq!(stored.len(), 6);
        assert!(stored.iter().any(|l| l.id == location.id));

        let snapshot = service.snapshot(&owner, id).await.unwrap();
        assert!(snapshot.markers.iter().any(|m| m.id == location.id));
    }

    /// Repository whose persist of a temporary id parks until released
    struct GatedRepository {
        inner: InMemoryLocationRepository,
        submitted: tokio::sync::mpsc::UnboundedSender<LocationId>,
        gate: tokio::sync::Notify,
    }

    #[async_trait::async_trait]
    impl LocationRepository for GatedRepository {
        async fn fetch_all(&self) -> Result<Vec<Location>> {
            self.inner.fetch_all().await
        }

        async fn persist(&self, location: &Location) -> Result<Location> {
            if location.id.is_temporary() {
                let _ = self.submitted.send(location.id.clone());
                self.gate.notified().await;
            }
            self.inner.persist(location).await
        }

        async fn remove(&self, id: &LocationId) -> Result<()> {
            self.inner.remove(id).await
        }
    }

    fn gated_service() -> (
        Arc<MapService>,
        Arc<GatedRepository>,
        tokio::sync::mpsc::UnboundedReceiver<LocationId>,
    ) {
        let (submitted, rx) = tokio::sync::mpsc::unbounded_channel();
        let repository = Arc::new(GatedRepository {
            inner: InMemoryLocationRepository::with_locations(demo_locations()),
            submitted,
            gate: tokio::sync::Notify::new(),
        });
        let service = Arc::new(MapService::new(repository.clone(), MapConfig::default()));
        (service, repository, rx)
    }

    #[tokio::test]
    async fn test_delete_during_pending_persist_does_not_resurrect_pin() {
        let (service, repository, mut rx) = gated_service();
        let owner = session(contributor(DEMO_USER_ID));
        let id = service.mount(&owner, ViewContext::Dashboard).await.unwrap().surface_id;
        service.toggle_placement(&owner, id).await.unwrap();

        let placing = tokio::spawn({
            let service = service.clone();
            let owner = owner.clone();
            async move {
                service
                    .select_point(&owner, id, Coordinates::new(-15.41, 28.28))
                    .await
            }
        });
        let temporary = rx.recv().await.unwrap();

        let deleting = tokio::spawn({
            let service = service.clone();
            let owner = owner.clone();
            async move { service.delete(&owner, id, &temporary).await }
        });
        tokio::task::yield_now().await;
        repository.gate.notify_one();

        let placed = placing.await.unwrap().unwrap();
        let stale_delete = deleting.await.unwrap().unwrap();
        let permanent = placed.location.unwrap().id;

        // The delete waited for the rekey and no longer finds the temporary id.
        assert!(!stale_delete.applied);
        assert_eq!(stale_delete.reason.as_deref(), Some("not_found"));

        let snapshot = service.snapshot(&owner, id).await.unwrap();
        let stored = repository.fetch_all().await.unwrap();
        assert_eq!(stored.len(), snapshot.total_count);
        assert!(stored.iter().all(|l| !l.id.is_temporary()));

        let deleted = service.delete(&owner, id, &permanent).await.unwrap();
        assert!(deleted.applied);

        let stored = repository.fetch_all().await.unwrap();
        assert!(stored.iter().all(|l| l.id != permanent));

        let fresh = service.mount(&owner, ViewContext::Dashboard).await.unwrap();
        assert_eq!(fresh.total_count, stored.len());
        assert!(fresh.markers.iter().all(|m| m.id != permanent));
    }

    #[tokio::test]
    async fn test_save_during_pending_persist_does_not_duplicate_pin() {
        let (service, repository, mut rx) = gated_service();
        let owner = session(contributor(DEMO_USER_ID));
        let id = service.mount(&owner, ViewContext::Public).await.unwrap().surface_id;
        service.toggle_placement(&owner, id).await.unwrap();

        let placing = tokio::spawn({
            let service = service.clone();
            let owner = owner.clone();
            async move {
                service
                    .select_point(&owner, id, Coordinates::new(-15.41, 28.28))
                    .await
            }
        });
        let temporary = rx.recv().await.unwrap();

        let saving = tokio::spawn({
            let service = service.clone();
            let owner = owner.clone();
            let form = SaveLocationDto {
                name: "Corner shop".to_string(),
                description: "Open late".to_string(),
                category: LocationCategory::Business,
                images: None,
            };
            async move { service.save(&owner, id, &temporary, form).await }
        });
        tokio::task::yield_now().await;
        repository.gate.notify_one();

        let placed = placing.await.unwrap().unwrap();
        let stale_save = saving.await.unwrap().unwrap();
        let permanent = placed.location.unwrap().id;

        assert!(!stale_save.applied);
        assert_eq!(stale_save.reason.as_deref(), Some("not_found"));

        let stored = repository.fetch_all().await.unwrap();
        assert_eq!(stored.len(), 6);
        assert_eq!(stored.iter().filter(|l| l.id == permanent).count(), 1);
        assert!(stored.iter().all(|l| !l.id.is_temporary()));
    }

    #[tokio::test]
    async fn test_denied_action_is_not_an_error() {
        let (service, repository) = service();
        let owner = session(contributor("u1"));
        let id = service.mount(&owner, ViewContext::Dashboard).await.unwrap().surface_id;

        let outcome = service
            .delete(&owner, id, &LocationId::from("4"))
            .await
            .unwrap();

        assert!(!outcome.applied);
        assert_eq!(outcome.reason.as_deref(), Some("denied"));
        assert_eq!(repository.fetch_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_own_delete_is_written_through() {
        let (service, repository) = service();
        let owner = session(contributor(DEMO_USER_ID));
        let id = service.mount(&owner, ViewContext::Dashboard).await.unwrap().surface_id;

        let outcome = service
            .delete(&owner, id, &LocationId::from("5"))
            .await
            .unwrap();

        assert!(outcome.applied);
        assert_eq!(outcome.deleted_id, Some(LocationId::from("5")));
        assert_eq!(repository.fetch_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_failed_device_fix_keeps_viewport() {
        let (service, _) = service();
        let owner = session(contributor("u1"));
        let snapshot = service.mount(&owner, ViewContext::Public).await.unwrap();

        let outcome = service
            .report_device_location(&owner, snapshot.surface_id, DeviceFixDto::PermissionDenied)
            .await
            .unwrap();

        assert!(!outcome.applied);
        assert_eq!(outcome.viewport, snapshot.viewport);
    }

    #[tokio::test]
    async fn test_logout_releases_session_surfaces() {
        let (service, _) = service();
        let owner = session(contributor("u1"));
        let other = session(contributor("u2"));
        service.mount(&owner, ViewContext::Public).await.unwrap();
        service.mount(&owner, ViewContext::Dashboard).await.unwrap();
        let kept = service.mount(&other, ViewContext::Public).await.unwrap();

        assert_eq!(service.release_for_session(&owner.token).await, 2);
        assert!(service.snapshot(&other, kept.surface_id).await.is_ok());
    }
}
