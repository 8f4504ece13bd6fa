use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warpgate_data::BlockKind;
use warpgate_util::math::position::BlockPos;

use crate::portal::{Portal, Target};

pub type EntityId = uuid::Uuid;

/// An isolated world or dimension, e.g. `minecraft:the_nether`. Positions are only
/// meaningful together with the region they belong to.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

pub trait BlockAccessor: Send + Sync {
    fn block_at(&self, region: &RegionId, position: &BlockPos) -> BlockKind;

    fn is_passable(&self, region: &RegionId, position: &BlockPos) -> bool {
        self.block_at(region, position).is_passable()
    }
}

/// Only frame construction goes through this; detection and validation never mutate the world.
pub trait BlockMutator: BlockAccessor {
    fn set_block(&self, region: &RegionId, position: &BlockPos, kind: BlockKind);

    fn clear_block(&self, region: &RegionId, position: &BlockPos) {
        self.set_block(region, position, BlockKind::Air);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

#[derive(Error, Debug)]
pub enum RelocationError {
    #[error("Region {0} does not exist")]
    UnknownRegion(RegionId),
    #[error("Destination {0} can't be reached")]
    Unreachable(BlockPos),
    #[error("Entity {0} is no longer in the world")]
    UnknownEntity(EntityId),
}

pub trait Relocator {
    fn relocate(
        &self,
        entity: EntityId,
        region: &RegionId,
        position: BlockPos,
        orientation: Orientation,
    ) -> Result<(), RelocationError>;
}

/// Sounds, particles and chat messages shown while using portals. Everything is optional.
pub trait PortalFeedback {
    fn entered(&self, _entity: EntityId, _portal: &Portal) {}

    fn cooldown_notice(&self, _entity: EntityId, _remaining_ticks: u64) {}

    fn teleported(&self, _entity: EntityId, _target: &Target) {}

    fn error(&self, _entity: EntityId, _message: &str) {}
}

pub struct NoFeedback;

impl PortalFeedback for NoFeedback {}
