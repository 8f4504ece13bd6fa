use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use warpgate_config::WarpgateConfig;
use warpgate_util::math::position::BlockPos;

use super::{
    Portal, PortalId, PortalKind, PortalSnapshot, Target, linker,
    registry::PortalRegistry,
    scanner::{FrameDescriptor, scan_for_frames},
    target::TargetTable,
    teleport::{PortalStep, TeleportOrchestrator},
    validator::validate,
};
use crate::{
    error::PortalError,
    world::{BlockAccessor, EntityId, Orientation, PortalFeedback, RegionId, Relocator},
};

/// Ties frame detection, the registry, linking and teleport timing together. The registry
/// and target table can be shared with other threads; entity ticking needs `&mut self`.
pub struct PortalService {
    config: WarpgateConfig,
    registry: Arc<PortalRegistry>,
    targets: Arc<TargetTable>,
    teleports: TeleportOrchestrator,
}

impl PortalService {
    pub fn new(config: WarpgateConfig) -> Self {
        Self::with_tables(
            config,
            Arc::new(PortalRegistry::new()),
            Arc::new(TargetTable::new()),
        )
    }

    pub fn with_tables(
        config: WarpgateConfig,
        registry: Arc<PortalRegistry>,
        targets: Arc<TargetTable>,
    ) -> Self {
        let teleports = TeleportOrchestrator::new(&config.teleport);
        Self {
            config,
            registry,
            targets,
            teleports,
        }
    }

    pub fn config(&self) -> &WarpgateConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<PortalRegistry> {
        &self.registry
    }

    pub fn targets(&self) -> &Arc<TargetTable> {
        &self.targets
    }

    pub fn teleports(&self) -> &TeleportOrchestrator {
        &self.teleports
    }

    /// Checks whether placing a block at `pos` completed a frame, and registers it if so.
    /// `Ok(None)` means there is no frame there, or it is already a portal.
    pub fn on_block_placed(
        &self,
        world: &dyn BlockAccessor,
        region: &RegionId,
        pos: BlockPos,
        creator: Uuid,
    ) -> Result<Option<Arc<Portal>>, PortalError> {
        let Some(descriptor) = scan_for_frames(world, region, pos, None) else {
            return Ok(None);
        };
        if let Some(existing) = self.registered_frame(region, &descriptor) {
            log::debug!("Frame at {} is already portal {existing}", descriptor.origin());
            return Ok(None);
        }
        self.register(world, region, &descriptor, creator, PortalKind::Player, None)
            .map(Some)
    }

    /// Removes every portal whose frame included `pos`.
    pub fn on_block_broken(&self, region: &RegionId, pos: BlockPos) -> Vec<Arc<Portal>> {
        self.registry
            .portals_at(region, &pos)
            .into_iter()
            .filter_map(|portal| self.remove_portal(portal.id))
            .collect()
    }

    /// Registers a portal for a frame an operator built or picked by hand.
    pub fn create_portal(
        &self,
        world: &dyn BlockAccessor,
        region: &RegionId,
        descriptor: &FrameDescriptor,
        creator: Uuid,
        kind: PortalKind,
        name: Option<String>,
    ) -> Result<Arc<Portal>, PortalError> {
        let descriptor = descriptor.normalized();
        if let Some(existing) = self.registered_frame(region, &descriptor) {
            return Err(PortalError::AlreadyRegistered(existing));
        }
        self.register(world, region, &descriptor, creator, kind, name)
    }

    fn registered_frame(
        &self,
        region: &RegionId,
        descriptor: &FrameDescriptor,
    ) -> Option<PortalId> {
        self.registry
            .portals_at(region, &descriptor.origin())
            .into_iter()
            .find(|portal| {
                descriptor
                    .corners()
                    .iter()
                    .all(|corner| portal.corners.contains(corner))
            })
            .map(|portal| portal.id)
    }

    fn register(
        &self,
        world: &dyn BlockAccessor,
        region: &RegionId,
        descriptor: &FrameDescriptor,
        creator: Uuid,
        kind: PortalKind,
        name: Option<String>,
    ) -> Result<Arc<Portal>, PortalError> {
        let frame = validate(world, region, descriptor).inspect_err(|rejection| {
            log::debug!("Rejected frame at {}: {rejection}", descriptor.origin());
        })?;
        let portal = Portal::new(region.clone(), descriptor, frame, creator, kind).with_name(name);
        let portal = self.registry.add(portal);
        log::info!(
            "Created {} portal {} at {} in {}",
            portal.color,
            portal.id,
            portal.origin,
            portal.region
        );

        if self.config.linking.auto_link {
            let same_region = self.registry.portals_in(region);
            let all = if self.config.linking.cross_region {
                self.registry.all_portals()
            } else {
                Vec::new()
            };
            linker::auto_link(&portal, &same_region, &all, &self.targets);
        }
        Ok(portal)
    }

    /// Deletes a portal and its target. Portals that were sending entities to it lose
    /// their target as well.
    pub fn remove_portal(&self, id: PortalId) -> Option<Arc<Portal>> {
        let portal = self.registry.remove(id)?;
        self.targets.remove(id);
        let anchor = Target::of(&portal);
        self.targets.retain(|_, target| {
            !(target.region == anchor.region && target.position == anchor.position)
        });
        log::info!("Removed portal {} at {} in {}", id, portal.origin, portal.region);
        Some(portal)
    }

    /// Links two portals both ways by hand.
    pub fn link(&self, a: PortalId, b: PortalId) -> Result<(), PortalError> {
        if a == b {
            return Err(PortalError::SelfLink(a));
        }
        let first = self.registry.get(a).ok_or(PortalError::UnknownPortal(a))?;
        let second = self.registry.get(b).ok_or(PortalError::UnknownPortal(b))?;
        linker::link(&first, &second, &self.targets);
        Ok(())
    }

    /// Removes only this portal's own target.
    pub fn unlink(&self, id: PortalId) -> Option<Target> {
        self.targets.remove(id)
    }

    /// The destination of portal `id`. A target left behind by a deleted portal is dropped
    /// here and reported as missing.
    pub fn target_of(&self, id: PortalId) -> Option<Target> {
        if !self.registry.contains(id) {
            if self.targets.remove(id).is_some() {
                log::debug!("Dropped dangling target of deleted portal {id}");
            }
            return None;
        }
        self.targets.get(id)
    }

    pub fn is_linked(&self, id: PortalId) -> bool {
        self.target_of(id).is_some()
    }

    /// Feeds one tick of `entity` standing at `pos` into the teleport state machine and
    /// carries out whatever it decides.
    pub fn tick_entity(
        &mut self,
        now: u64,
        entity: EntityId,
        region: &RegionId,
        pos: BlockPos,
        relocator: &dyn Relocator,
        feedback: &dyn PortalFeedback,
    ) -> PortalStep {
        // Unlinked portals can't be entered, but an already running delay keeps going
        let occupied = self
            .registry
            .find_interior(region, &pos)
            .filter(|portal| self.teleports.is_pending(entity) || self.is_linked(portal.id));

        let step = self
            .teleports
            .step(entity, now, occupied.as_ref().map(|portal| portal.id));
        match step {
            PortalStep::Entered { .. } => {
                if let Some(portal) = &occupied {
                    feedback.entered(entity, portal);
                }
            }
            PortalStep::CoolingDown {
                remaining,
                notify: true,
            } => feedback.cooldown_notice(entity, remaining),
            PortalStep::Teleport { portal } => {
                return self.teleport(now, entity, portal, relocator, feedback);
            }
            _ => {}
        }
        step
    }

    fn teleport(
        &mut self,
        now: u64,
        entity: EntityId,
        portal: PortalId,
        relocator: &dyn Relocator,
        feedback: &dyn PortalFeedback,
    ) -> PortalStep {
        let Some(target) = self.target_of(portal) else {
            log::debug!("Portal {portal} lost its target before {entity} could use it");
            feedback.error(entity, "This portal is not linked to anything");
            return PortalStep::Cancelled;
        };

        let orientation = Orientation {
            yaw: target.yaw,
            pitch: 0.0,
        };
        match relocator.relocate(entity, &target.region, target.position, orientation) {
            Ok(()) => {
                self.teleports.start_cooldown(entity, now);
                if let Some(used) = self.registry.get(portal) {
                    self.registry.replace(used.with_last_used(Utc::now()));
                }
                feedback.teleported(entity, &target);
                PortalStep::Teleport { portal }
            }
            Err(err) => {
                log::warn!(
                    "Failed to move {entity} through portal {portal} to {} in {}: {err}",
                    target.position,
                    target.region
                );
                self.teleports.forget(entity);
                feedback.error(entity, &err.to_string());
                PortalStep::Cancelled
            }
        }
    }

    pub fn entity_disconnected(&mut self, entity: EntityId) {
        self.teleports.forget(entity);
    }

    /// Evicts entity timers that were not refreshed. Call once per tick after all entities
    /// were ticked.
    pub fn sweep(&mut self, now: u64) {
        let evicted = self.teleports.sweep(now);
        if evicted > 0 {
            log::debug!("Evicted {evicted} stale portal timers");
        }
    }

    /// Drops all per-entity state, e.g. when the world unloads.
    pub fn unload(&mut self) {
        self.teleports.clear();
    }

    /// Every portal in registry order, and the targets of those portals.
    pub fn export_all(&self) -> PortalSnapshot {
        let portals: Vec<Portal> = self
            .registry
            .all_portals()
            .iter()
            .map(|portal| Portal::clone(portal))
            .collect();
        let targets = portals
            .iter()
            .filter_map(|portal| Some((portal.id, self.targets.get(portal.id)?)))
            .collect();
        PortalSnapshot { portals, targets }
    }

    /// Replaces all portals and targets with the snapshot's.
    pub fn import_all(&mut self, snapshot: PortalSnapshot) {
        self.registry.clear();
        self.targets.clear();
        self.teleports.clear();

        let portal_count = snapshot.portals.len();
        for portal in snapshot.portals {
            self.registry.add(portal);
        }
        for (id, target) in snapshot.targets {
            self.targets.set(id, target);
        }
        log::info!(
            "Loaded {portal_count} portals and {} targets",
            self.targets.len()
        );
    }
}
