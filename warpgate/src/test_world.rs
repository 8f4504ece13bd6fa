use std::sync::Mutex;

use dashmap::DashMap;
use warpgate_data::BlockKind;
use warpgate_util::math::position::BlockPos;

use crate::{
    portal::{Portal, Target},
    world::{
        BlockAccessor, BlockMutator, EntityId, Orientation, PortalFeedback, RegionId,
        RelocationError, Relocator,
    },
};

pub fn overworld() -> RegionId {
    RegionId::from("minecraft:overworld")
}

pub fn nether() -> RegionId {
    RegionId::from("minecraft:the_nether")
}

/// Sparse world where every unset block is air.
#[derive(Default)]
pub struct MemoryWorld {
    blocks: DashMap<(RegionId, BlockPos), BlockKind>,
}

impl BlockAccessor for MemoryWorld {
    fn block_at(&self, region: &RegionId, position: &BlockPos) -> BlockKind {
        self.blocks
            .get(&(region.clone(), *position))
            .map(|kind| *kind)
            .unwrap_or_default()
    }
}

impl BlockMutator for MemoryWorld {
    fn set_block(&self, region: &RegionId, position: &BlockPos, kind: BlockKind) {
        let key = (region.clone(), *position);
        if kind == BlockKind::Air {
            self.blocks.remove(&key);
        } else {
            self.blocks.insert(key, kind);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Relocation {
    pub entity: EntityId,
    pub region: RegionId,
    pub position: BlockPos,
    pub orientation: Orientation,
}

/// Records every relocation and refuses destinations in `unknown_regions`.
#[derive(Default)]
pub struct RecordingRelocator {
    pub calls: Mutex<Vec<Relocation>>,
    pub unknown_regions: Vec<RegionId>,
}

impl RecordingRelocator {
    pub fn calls(&self) -> Vec<Relocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl Relocator for RecordingRelocator {
    fn relocate(
        &self,
        entity: EntityId,
        region: &RegionId,
        position: BlockPos,
        orientation: Orientation,
    ) -> Result<(), RelocationError> {
        if self.unknown_regions.contains(region) {
            return Err(RelocationError::UnknownRegion(region.clone()));
        }
        self.calls.lock().unwrap().push(Relocation {
            entity,
            region: region.clone(),
            position,
            orientation,
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingFeedback {
    pub entered: Mutex<Vec<EntityId>>,
    pub notices: Mutex<Vec<u64>>,
    pub teleported: Mutex<Vec<Target>>,
    pub errors: Mutex<Vec<String>>,
}

impl PortalFeedback for RecordingFeedback {
    fn entered(&self, entity: EntityId, _portal: &Portal) {
        self.entered.lock().unwrap().push(entity);
    }

    fn cooldown_notice(&self, _entity: EntityId, remaining_ticks: u64) {
        self.notices.lock().unwrap().push(remaining_ticks);
    }

    fn teleported(&self, _entity: EntityId, target: &Target) {
        self.teleported.lock().unwrap().push(target.clone());
    }

    fn error(&self, _entity: EntityId, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}
