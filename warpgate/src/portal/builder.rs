use warpgate_data::{Axis, BlockKind, DyeColor, FrameType};
use warpgate_util::math::position::BlockPos;

use super::scanner::FrameDescriptor;
use crate::world::{BlockMutator, RegionId};

/// Builds a ready to validate frame: corner blocks, `color` markers along the sides and an
/// emptied interior.
pub fn place_frame(
    world: &dyn BlockMutator,
    region: &RegionId,
    descriptor: &FrameDescriptor,
    color: DyeColor,
) {
    let corner = BlockKind::Corner(descriptor.frame_type().material);
    for pos in descriptor.corners() {
        world.set_block(region, &pos, corner);
    }
    for pos in descriptor.sides() {
        world.set_block(region, &pos, BlockKind::Marker(color));
    }
    for pos in descriptor.interior() {
        world.clear_block(region, &pos);
    }
}

/// Places a frame with `origin` as its minimum corner, used when operators spawn portals.
pub fn build_frame(
    world: &dyn BlockMutator,
    region: &RegionId,
    origin: BlockPos,
    axis: Axis,
    frame_type: FrameType,
    color: DyeColor,
) -> FrameDescriptor {
    let descriptor = FrameDescriptor::canonical(axis, origin, frame_type);
    log::debug!("Building {frame_type:?} frame at {origin} in {region}");
    place_frame(world, region, &descriptor, color);
    descriptor
}
