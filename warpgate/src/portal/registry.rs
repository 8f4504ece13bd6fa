use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use indexmap::IndexMap;
use itertools::Itertools;
use warpgate_util::math::{position::BlockPos, vector2::Vector2};

use super::{Portal, PortalId};
use crate::world::RegionId;

type ChunkBuckets = HashMap<Vector2<i32>, Vec<PortalId>>;

#[derive(Default)]
struct RegistryState {
    // Insertion order matters: auto linking picks the first matching candidate
    portals: IndexMap<PortalId, Arc<Portal>>,
    by_region: HashMap<RegionId, Vec<PortalId>>,
    // Only frame and corner cells are indexed, interiors are looked up per region
    by_chunk: HashMap<RegionId, ChunkBuckets>,
}

impl RegistryState {
    fn chunks_of(portal: &Portal) -> impl Iterator<Item = Vector2<i32>> + '_ {
        portal.outline().map(BlockPos::chunk_position).unique()
    }

    fn index(&mut self, portal: &Portal) {
        self.by_region
            .entry(portal.region.clone())
            .or_default()
            .push(portal.id);

        let buckets = self.by_chunk.entry(portal.region.clone()).or_default();
        for chunk in Self::chunks_of(portal) {
            buckets.entry(chunk).or_default().push(portal.id);
        }
    }

    fn unindex(&mut self, portal: &Portal) {
        if let Some(ids) = self.by_region.get_mut(&portal.region) {
            ids.retain(|id| *id != portal.id);
            if ids.is_empty() {
                self.by_region.remove(&portal.region);
            }
        }

        if let Some(buckets) = self.by_chunk.get_mut(&portal.region) {
            for chunk in Self::chunks_of(portal) {
                if let Some(ids) = buckets.get_mut(&chunk) {
                    ids.retain(|id| *id != portal.id);
                    if ids.is_empty() {
                        buckets.remove(&chunk);
                    }
                }
            }
            if buckets.is_empty() {
                self.by_chunk.remove(&portal.region);
            }
        }
    }
}

/// Every live portal, indexed three ways: by id, by region and by the chunks its frame
/// touches. All three views are updated under one lock, so readers never see a portal in
/// one view but not in another.
#[derive(Default)]
pub struct PortalRegistry {
    state: RwLock<RegistryState>,
}

impl PortalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `portal`. Adding an id that is already present keeps the existing value.
    pub fn add(&self, portal: Portal) -> Arc<Portal> {
        let mut state = self.write();
        if let Some(existing) = state.portals.get(&portal.id) {
            log::debug!("Portal {} is already registered", portal.id);
            return existing.clone();
        }
        let portal = Arc::new(portal);
        state.index(&portal);
        state.portals.insert(portal.id, portal.clone());
        portal
    }

    /// Swaps in a new value for an already registered id, keeping its position in the
    /// registry order. Returns the previous value, or `None` if the id is unknown.
    pub fn replace(&self, portal: Portal) -> Option<Arc<Portal>> {
        let mut state = self.write();
        let previous = state.portals.get(&portal.id)?.clone();
        state.unindex(&previous);
        let portal = Arc::new(portal);
        state.index(&portal);
        state.portals.insert(portal.id, portal);
        Some(previous)
    }

    /// Removing an unknown portal does nothing.
    pub fn remove(&self, id: PortalId) -> Option<Arc<Portal>> {
        let mut state = self.write();
        let portal = state.portals.shift_remove(&id)?;
        state.unindex(&portal);
        Some(portal)
    }

    pub fn clear(&self) {
        *self.write() = RegistryState::default();
    }

    pub fn get(&self, id: PortalId) -> Option<Arc<Portal>> {
        self.read().portals.get(&id).cloned()
    }

    pub fn contains(&self, id: PortalId) -> bool {
        self.read().portals.contains_key(&id)
    }

    /// The portal whose frame or corners include `pos`.
    pub fn find(&self, region: &RegionId, pos: &BlockPos) -> Option<Arc<Portal>> {
        self.portals_at(region, pos).into_iter().next()
    }

    /// All portals whose frame or corners include `pos`. More than one only when frames
    /// share a corner.
    pub fn portals_at(&self, region: &RegionId, pos: &BlockPos) -> Vec<Arc<Portal>> {
        let state = self.read();
        let Some(ids) = state
            .by_chunk
            .get(region)
            .and_then(|buckets| buckets.get(&pos.chunk_position()))
        else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| state.portals.get(id))
            .filter(|portal| portal.outline_contains(pos))
            .cloned()
            .collect()
    }

    /// The portal whose interior includes `pos`.
    pub fn find_interior(&self, region: &RegionId, pos: &BlockPos) -> Option<Arc<Portal>> {
        let state = self.read();
        state
            .by_region
            .get(region)?
            .iter()
            .filter_map(|id| state.portals.get(id))
            .find(|portal| portal.interior_contains(pos))
            .cloned()
    }

    pub fn all_portals(&self) -> Vec<Arc<Portal>> {
        self.read().portals.values().cloned().collect()
    }

    pub fn portals_in(&self, region: &RegionId) -> Vec<Arc<Portal>> {
        let state = self.read();
        state
            .by_region
            .get(region)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.portals.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.read().portals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().portals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use indexmap::IndexSet;
    use warpgate_data::{Axis, DyeColor, FrameMaterial, FrameShape, FrameType};
    use warpgate_util::math::position::BlockPos;

    use super::PortalRegistry;
    use crate::{
        portal::{
            Portal, PortalKind, builder::place_frame, scanner::FrameDescriptor,
            validator::validate,
        },
        test_world::{MemoryWorld, nether, overworld},
        world::RegionId,
    };

    fn portal_at(region: RegionId, origin: BlockPos) -> Portal {
        let world = MemoryWorld::default();
        let descriptor = FrameDescriptor::canonical(
            Axis::Z,
            origin,
            FrameType::new(FrameMaterial::Obsidian, FrameShape::Standard),
        );
        place_frame(&world, &region, &descriptor, DyeColor::Red);
        let frame = validate(&world, &region, &descriptor).unwrap();
        Portal::new(
            region,
            &descriptor,
            frame,
            uuid::Uuid::nil(),
            PortalKind::Player,
        )
    }

    #[test]
    fn find_covers_frame_and_corners_but_not_interior() {
        let registry = PortalRegistry::new();
        let portal = registry.add(portal_at(overworld(), BlockPos::new(0, 64, 0)));

        for cell in portal.outline() {
            assert_eq!(registry.find(&overworld(), cell).map(|p| p.id), Some(portal.id));
            assert!(registry.find(&nether(), cell).is_none());
        }
        for cell in &portal.interior {
            assert!(registry.find(&overworld(), cell).is_none());
            assert_eq!(
                registry.find_interior(&overworld(), cell).map(|p| p.id),
                Some(portal.id)
            );
        }
    }

    #[test]
    fn frame_across_chunk_border_is_found_on_both_sides() {
        let registry = PortalRegistry::new();
        let portal = registry.add(portal_at(overworld(), BlockPos::new(14, 64, 0)));

        assert!(registry.find(&overworld(), &BlockPos::new(14, 64, 0)).is_some());
        assert!(registry.find(&overworld(), &BlockPos::new(17, 64, 0)).is_some());
        assert_eq!(portal.outline().count(), 14);
    }

    #[test]
    fn remove_clears_every_view() {
        let registry = PortalRegistry::new();
        let portal = registry.add(portal_at(overworld(), BlockPos::new(-20, 70, 30)));
        let cells: Vec<_> = portal.outline().copied().collect();

        assert!(registry.remove(portal.id).is_some());

        for cell in &cells {
            assert!(registry.find(&overworld(), cell).is_none());
        }
        assert!(registry.portals_in(&overworld()).is_empty());
        assert!(registry.is_empty());
        let state = registry.read();
        assert!(state.by_chunk.is_empty());
        assert!(state.by_region.is_empty());
    }

    #[test]
    fn removing_unknown_portal_is_a_no_op() {
        let registry = PortalRegistry::new();
        registry.add(portal_at(overworld(), BlockPos::ZERO));

        assert!(
            registry
                .remove(portal_at(overworld(), BlockPos::ZERO).id)
                .is_none()
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_add_keeps_single_entry() {
        let registry = PortalRegistry::new();
        let portal = portal_at(overworld(), BlockPos::ZERO);

        registry.add(portal.clone());
        registry.add(portal.clone());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.portals_at(&overworld(), &BlockPos::ZERO).len(), 1);
    }

    #[test]
    fn replace_moves_index_entries() {
        let registry = PortalRegistry::new();
        let portal = registry.add(portal_at(overworld(), BlockPos::ZERO));
        let mut moved = (*portal).clone();
        moved.corners = IndexSet::from([BlockPos::new(100, 64, 100)]);
        moved.frame = IndexSet::new();

        assert!(registry.replace(moved).is_some());

        assert!(registry.find(&overworld(), &BlockPos::ZERO).is_none());
        assert_eq!(
            registry
                .find(&overworld(), &BlockPos::new(100, 64, 100))
                .map(|p| p.id),
            Some(portal.id)
        );
    }

    #[test]
    fn views_keep_insertion_order() {
        let registry = PortalRegistry::new();
        let first = registry.add(portal_at(overworld(), BlockPos::new(0, 64, 0)));
        let second = registry.add(portal_at(nether(), BlockPos::new(0, 64, 0)));
        let third = registry.add(portal_at(overworld(), BlockPos::new(40, 64, 0)));

        let all: Vec<_> = registry.all_portals().iter().map(|p| p.id).collect();
        let in_overworld: Vec<_> = registry
            .portals_in(&overworld())
            .iter()
            .map(|p| p.id)
            .collect();

        assert_eq!(all, vec![first.id, second.id, third.id]);
        assert_eq!(in_overworld, vec![first.id, third.id]);
    }

    #[test]
    fn concurrent_adds_and_removes_stay_consistent() {
        let registry = Arc::new(PortalRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|thread_index| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        let origin = BlockPos::new(thread_index * 8, 64, i * 8);
                        let portal = registry.add(portal_at(overworld(), origin));
                        if i % 2 == 0 {
                            registry.remove(portal.id);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 8 * 12);
        let state = registry.read();
        let indexed: usize = state.by_region.values().map(Vec::len).sum();
        assert_eq!(indexed, state.portals.len());
        for ids in state.by_chunk.values().flat_map(|buckets| buckets.values()) {
            for id in ids {
                assert!(state.portals.contains_key(id));
            }
        }
    }
}
