use super::{get_section_cord, vector2::Vector2, vector3::Vector3};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Walks every position of an inclusive cuboid, X fastest, then Y, then Z.
pub struct BlockPosIterator {
    start_x: i32,
    start_y: i32,
    start_z: i32,
    end_x: i32,
    end_y: i32,
    index: usize,
    count: usize,
}

impl BlockPosIterator {
    pub fn new(
        start_x: i32,
        start_y: i32,
        start_z: i32,
        end_x: i32,
        end_y: i32,
        end_z: i32,
    ) -> Self {
        let count_x = end_x - start_x + 1;
        let count_y = end_y - start_y + 1;
        let count_z = end_z - start_z + 1;
        let count = (count_x * count_y * count_z) as usize;
        BlockPosIterator {
            start_x,
            start_y,
            start_z,
            end_x,
            end_y,
            index: 0,
            count,
        }
    }
}

impl Iterator for BlockPosIterator {
    type Item = BlockPos;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }

        let size_x = (self.end_x - self.start_x + 1) as usize;
        let size_y = (self.end_y - self.start_y + 1) as usize;

        let x_offset = self.index % size_x;
        let y_offset = (self.index / size_x) % size_y;
        let z_offset = (self.index / size_x) / size_y;

        let x = self.start_x + x_offset as i32;
        let y = self.start_y + y_offset as i32;
        let z = self.start_z + z_offset as i32;

        self.index += 1;
        Some(BlockPos::new(x, y, z))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// Aka Block Position
pub struct BlockPos(pub Vector3<i32>);

impl BlockPos {
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// Iterates through all `BlockPos` within the cuboid spanned by `start` and `end`,
    /// inclusive on both ends and regardless of which corner holds the larger coordinates.
    pub fn iterate(start: BlockPos, end: BlockPos) -> BlockPosIterator {
        BlockPosIterator::new(
            start.0.x.min(end.0.x),
            start.0.y.min(end.0.y),
            start.0.z.min(end.0.z),
            start.0.x.max(end.0.x),
            start.0.y.max(end.0.y),
            start.0.z.max(end.0.z),
        )
    }

    /// The column of chunks this position falls in. `y` of the result holds the chunk Z.
    pub const fn chunk_position(&self) -> Vector2<i32> {
        Vector2::new(get_section_cord(self.0.x), get_section_cord(self.0.z))
    }

    /// Saturates at the edge of the coordinate range instead of overflowing.
    pub fn add(&self, x: i32, y: i32, z: i32) -> Self {
        BlockPos::new(
            self.0.x.saturating_add(x),
            self.0.y.saturating_add(y),
            self.0.z.saturating_add(z),
        )
    }

    pub fn offset_dir(&self, offset: Vector3<i32>, direction: i32) -> Self {
        self.add(
            offset.x.saturating_mul(direction),
            offset.y.saturating_mul(direction),
            offset.z.saturating_mul(direction),
        )
    }

    pub fn up(&self) -> Self {
        self.add(0, 1, 0)
    }
}

/// Written as an `[x, y, z]` triple so every `i32` coordinate survives.
impl Serialize for BlockPos {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (self.0.x, self.0.y, self.0.z).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BlockPos {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (x, y, z) = <(i32, i32, i32)>::deserialize(deserializer)?;
        Ok(BlockPos::new(x, y, z))
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.0.x, self.0.y, self.0.z)
    }
}

#[cfg(test)]
mod tests {
    use super::BlockPos;
    use crate::math::vector3::Vector3;

    #[test]
    fn iterate_covers_cuboid_in_any_corner_order() {
        let forward: Vec<_> =
            BlockPos::iterate(BlockPos::new(0, 0, 0), BlockPos::new(1, 2, 3)).collect();
        let backward: Vec<_> =
            BlockPos::iterate(BlockPos::new(1, 2, 3), BlockPos::new(0, 0, 0)).collect();

        assert_eq!(forward.len(), 2 * 3 * 4);
        assert_eq!(forward, backward);
        assert_eq!(forward[0], BlockPos::new(0, 0, 0));
        assert_eq!(forward[1], BlockPos::new(1, 0, 0));
        assert_eq!(forward[2], BlockPos::new(0, 1, 0));
    }

    #[test]
    fn chunk_position_floors_negative_coordinates() {
        assert_eq!(BlockPos::new(15, 64, 15).chunk_position().x, 0);
        assert_eq!(BlockPos::new(16, 64, 0).chunk_position().x, 1);
        assert_eq!(BlockPos::new(-1, 64, -17).chunk_position().x, -1);
        assert_eq!(BlockPos::new(-1, 64, -17).chunk_position().y, -2);
    }

    #[test]
    fn serde_keeps_full_coordinate_range() {
        for pos in [
            BlockPos::new(-1234, -60, 98765),
            BlockPos::new(0, 2100, 0),
            BlockPos::new(i32::MIN, i32::MAX, -40_000_000),
        ] {
            let json = serde_json::to_string(&pos).unwrap();
            let decoded: BlockPos = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, pos);
        }
        assert_eq!(
            serde_json::to_string(&BlockPos::new(1, -2, 3)).unwrap(),
            "[1,-2,3]"
        );
    }

    #[test]
    fn offsets_saturate_at_range_edge() {
        let edge = BlockPos::new(i32::MAX, i32::MIN, 0);

        assert_eq!(edge.add(6, -6, 1), BlockPos::new(i32::MAX, i32::MIN, 1));
        assert_eq!(edge.up(), BlockPos::new(i32::MAX, i32::MIN + 1, 0));
        assert_eq!(
            edge.offset_dir(Vector3::new(1, 0, 0), 5),
            BlockPos::new(i32::MAX, i32::MIN, 0)
        );
    }
}
