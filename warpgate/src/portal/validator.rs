use indexmap::IndexSet;
use thiserror::Error;
use warpgate_data::{BlockKind, DyeColor};
use warpgate_util::math::position::BlockPos;

use super::scanner::FrameDescriptor;
use crate::world::{BlockAccessor, RegionId};

/// Why a geometrically complete frame can't become a portal. Shown to whoever built it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameRejection {
    #[error("The frame corner at {pos} is missing")]
    MissingCorner { pos: BlockPos },
    #[error("The block at {pos} is not a colored frame block")]
    NotAMarker { pos: BlockPos },
    #[error("The block at {pos} is {found}, but this frame is {expected}")]
    ColorMismatch {
        pos: BlockPos,
        expected: DyeColor,
        found: DyeColor,
    },
    #[error("The portal is blocked at {pos}")]
    Obstructed { pos: BlockPos },
}

/// The position sets and color of a frame that passed validation.
#[derive(Clone, Debug)]
pub struct ValidatedFrame {
    pub color: DyeColor,
    pub interior: IndexSet<BlockPos>,
    pub frame: IndexSet<BlockPos>,
    pub corners: IndexSet<BlockPos>,
}

pub fn validate(
    world: &dyn BlockAccessor,
    region: &RegionId,
    descriptor: &FrameDescriptor,
) -> Result<ValidatedFrame, FrameRejection> {
    let material = descriptor.frame_type().material;
    let corners: IndexSet<BlockPos> = descriptor.corners().into_iter().collect();
    if let Some(pos) = corners
        .iter()
        .find(|pos| world.block_at(region, pos) != BlockKind::Corner(material))
    {
        return Err(FrameRejection::MissingCorner { pos: *pos });
    }

    // The first border block decides which color the rest must have.
    let mut color = None;
    let mut frame = IndexSet::new();
    for pos in descriptor.sides() {
        let found = world
            .block_at(region, &pos)
            .marker_color()
            .ok_or(FrameRejection::NotAMarker { pos })?;
        match color {
            None => color = Some(found),
            Some(expected) if expected != found => {
                return Err(FrameRejection::ColorMismatch {
                    pos,
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }
        frame.insert(pos);
    }
    let Some(color) = color else {
        return Err(FrameRejection::NotAMarker {
            pos: descriptor.origin(),
        });
    };

    let mut interior = IndexSet::new();
    for pos in descriptor.interior() {
        if !world.is_passable(region, &pos) {
            return Err(FrameRejection::Obstructed { pos });
        }
        interior.insert(pos);
    }

    Ok(ValidatedFrame {
        color,
        interior,
        frame,
        corners,
    })
}
