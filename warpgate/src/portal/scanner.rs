use itertools::iproduct;
use warpgate_data::{Axis, BlockDirection, BlockKind, FrameShape, FrameType};
use warpgate_util::math::position::BlockPos;

use crate::world::{BlockAccessor, RegionId};

/// A rectangle spanned from `origin` by `vertical_length + 1` steps along `vertical` and
/// `horizontal_length + 1` steps along `horizontal`. The two directions are never parallel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameDescriptor {
    axis: Axis,
    origin: BlockPos,
    vertical: BlockDirection,
    horizontal: BlockDirection,
    vertical_length: i32,
    horizontal_length: i32,
    frame_type: FrameType,
}

/// The (vertical, horizontal) pair each frame axis is scanned with.
pub(crate) fn canonical_pair(axis: Axis) -> (BlockDirection, BlockDirection) {
    match axis {
        Axis::X => (BlockDirection::Up, BlockDirection::South),
        Axis::Y => (BlockDirection::South, BlockDirection::East),
        Axis::Z => (BlockDirection::Up, BlockDirection::East),
    }
}

impl FrameDescriptor {
    pub fn new(
        axis: Axis,
        origin: BlockPos,
        vertical: BlockDirection,
        horizontal: BlockDirection,
        frame_type: FrameType,
    ) -> Option<Self> {
        if vertical.to_axis() == horizontal.to_axis() {
            return None;
        }
        // The far corners have to exist, near the edge of the world they may not
        let (height, width) = (frame_type.height(), frame_type.width());
        if !within_range(origin, vertical, height + 1)
            || !within_range(origin, horizontal, width + 1)
        {
            return None;
        }
        Some(Self {
            axis,
            origin,
            vertical,
            horizontal,
            vertical_length: frame_type.height(),
            horizontal_length: frame_type.width(),
            frame_type,
        })
    }

    /// Descriptor with both directions pointing along the positive axes.
    pub fn canonical(axis: Axis, origin: BlockPos, frame_type: FrameType) -> Self {
        let (vertical, horizontal) = canonical_pair(axis);
        Self {
            axis,
            origin,
            vertical,
            horizontal,
            vertical_length: frame_type.height(),
            horizontal_length: frame_type.width(),
            frame_type,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn origin(&self) -> BlockPos {
        self.origin
    }

    pub fn vertical(&self) -> BlockDirection {
        self.vertical
    }

    pub fn horizontal(&self) -> BlockDirection {
        self.horizontal
    }

    pub fn vertical_length(&self) -> i32 {
        self.vertical_length
    }

    pub fn horizontal_length(&self) -> i32 {
        self.horizontal_length
    }

    pub fn frame_type(&self) -> FrameType {
        self.frame_type
    }

    fn at(&self, vertical_steps: i32, horizontal_steps: i32) -> BlockPos {
        self.origin
            .offset_dir(self.vertical.to_offset(), vertical_steps)
            .offset_dir(self.horizontal.to_offset(), horizontal_steps)
    }

    pub fn corners(&self) -> [BlockPos; 4] {
        let top = self.vertical_length + 1;
        let side = self.horizontal_length + 1;
        [
            self.at(0, 0),
            self.at(top, 0),
            self.at(0, side),
            self.at(top, side),
        ]
    }

    /// The four sides, one cell in from the corners: both vertical sides first, then both
    /// horizontal ones.
    pub fn sides(&self) -> impl Iterator<Item = BlockPos> + '_ {
        let top = self.vertical_length + 1;
        let side = self.horizontal_length + 1;
        let verticals = (1..=self.vertical_length)
            .flat_map(move |v| [self.at(v, 0), self.at(v, side)]);
        let horizontals = (1..=self.horizontal_length)
            .flat_map(move |h| [self.at(0, h), self.at(top, h)]);
        verticals.chain(horizontals)
    }

    /// Cells strictly inside the border, row by row along the vertical direction.
    pub fn interior(&self) -> impl Iterator<Item = BlockPos> + '_ {
        iproduct!(1..=self.vertical_length, 1..=self.horizontal_length)
            .map(move |(v, h)| self.at(v, h))
    }

    pub fn outline_contains(&self, pos: &BlockPos) -> bool {
        self.corners().contains(pos) || self.sides().any(|side| side == *pos)
    }

    /// The same rectangle seen from its minimum corner with positive directions. Every
    /// corner of one frame normalizes to the same descriptor.
    pub fn normalized(&self) -> Self {
        let corners = self.corners();
        let min = |f: fn(&BlockPos) -> i32| corners.iter().map(f).min().unwrap_or(0);
        let origin = BlockPos::new(min(|p| p.0.x), min(|p| p.0.y), min(|p| p.0.z));
        let positive = |dir: BlockDirection| {
            if dir.is_positive() {
                dir
            } else {
                dir.opposite()
            }
        };
        Self {
            origin,
            vertical: positive(self.vertical),
            horizontal: positive(self.horizontal),
            ..*self
        }
    }
}

fn within_range(origin: BlockPos, direction: BlockDirection, steps: i32) -> bool {
    let offset = direction.to_offset();
    origin.0.x.checked_add(offset.x * steps).is_some()
        && origin.0.y.checked_add(offset.y * steps).is_some()
        && origin.0.z.checked_add(offset.z * steps).is_some()
}

fn axis_order(hint: Option<Axis>) -> impl Iterator<Item = Axis> {
    hint.into_iter()
        .chain(Axis::all().into_iter().filter(move |axis| Some(*axis) != hint))
}

/// Looks for a complete frame touching `origin`. A corner block is scanned directly; a
/// colored border block makes the scanner look for corners around it first.
///
/// The first match wins. Shapes are tried in declaration order, then axes (`hint` first,
/// then X, Y, Z), then the vertical flip, then the horizontal flip.
pub fn scan_for_frames(
    world: &dyn BlockAccessor,
    region: &RegionId,
    origin: BlockPos,
    hint: Option<Axis>,
) -> Option<FrameDescriptor> {
    match world.block_at(region, &origin) {
        BlockKind::Corner(_) => scan_from_corner(world, region, origin, hint, |_| true),
        BlockKind::Marker(_) => scan_from_marker(world, region, origin, hint),
        _ => None,
    }
}

fn scan_from_corner(
    world: &dyn BlockAccessor,
    region: &RegionId,
    origin: BlockPos,
    hint: Option<Axis>,
    accept: impl Fn(&FrameDescriptor) -> bool,
) -> Option<FrameDescriptor> {
    let material = world.block_at(region, &origin).corner_material()?;
    let corner = BlockKind::Corner(material);

    for shape in FrameShape::all() {
        let frame_type = FrameType::new(material, shape);
        for axis in axis_order(hint) {
            let (vertical, horizontal) = canonical_pair(axis);
            for (vertical, horizontal) in iproduct!(
                [vertical, vertical.opposite()],
                [horizontal, horizontal.opposite()]
            ) {
                let Some(descriptor) =
                    FrameDescriptor::new(axis, origin, vertical, horizontal, frame_type)
                else {
                    continue;
                };
                if descriptor
                    .corners()
                    .iter()
                    .all(|pos| world.block_at(region, pos) == corner)
                {
                    let descriptor = descriptor.normalized();
                    if accept(&descriptor) {
                        log::debug!(
                            "Found {shape:?} frame corners around {origin} on axis {axis:?}"
                        );
                        return Some(descriptor);
                    }
                }
            }
        }
    }
    None
}

fn scan_from_marker(
    world: &dyn BlockAccessor,
    region: &RegionId,
    origin: BlockPos,
    hint: Option<Axis>,
) -> Option<FrameDescriptor> {
    let reach = FrameShape::max_extent() + 1;
    BlockPos::iterate(
        origin.add(-reach, -reach, -reach),
        origin.add(reach, reach, reach),
    )
    .filter(|pos| world.block_at(region, pos).corner_material().is_some())
    .find_map(|corner| {
        scan_from_corner(world, region, corner, hint, |descriptor| {
            descriptor.outline_contains(&origin)
        })
    })
}
