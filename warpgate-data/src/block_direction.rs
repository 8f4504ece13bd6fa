use serde::{Deserialize, Serialize};
use warpgate_util::math::vector3::Vector3;

#[repr(u8)]
#[derive(PartialEq, Clone, Copy, Debug, Hash, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockDirection {
    Down = 0,
    Up,
    North,
    South,
    West,
    East,
}

#[derive(PartialEq, Clone, Copy, Debug, Hash, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Scan order used when looking for frames.
    pub fn all() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }

    /// The positive direction along this axis.
    pub fn positive(&self) -> BlockDirection {
        match self {
            Axis::X => BlockDirection::East,
            Axis::Y => BlockDirection::Up,
            Axis::Z => BlockDirection::South,
        }
    }
}

impl BlockDirection {
    pub fn to_offset(&self) -> Vector3<i32> {
        match self {
            BlockDirection::Down => (0, -1, 0),
            BlockDirection::Up => (0, 1, 0),
            BlockDirection::North => (0, 0, -1),
            BlockDirection::South => (0, 0, 1),
            BlockDirection::West => (-1, 0, 0),
            BlockDirection::East => (1, 0, 0),
        }
        .into()
    }

    pub fn opposite(&self) -> BlockDirection {
        match self {
            BlockDirection::Down => BlockDirection::Up,
            BlockDirection::Up => BlockDirection::Down,
            BlockDirection::North => BlockDirection::South,
            BlockDirection::South => BlockDirection::North,
            BlockDirection::West => BlockDirection::East,
            BlockDirection::East => BlockDirection::West,
        }
    }

    pub fn all() -> [BlockDirection; 6] {
        [
            BlockDirection::Down,
            BlockDirection::Up,
            BlockDirection::North,
            BlockDirection::South,
            BlockDirection::West,
            BlockDirection::East,
        ]
    }

    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            BlockDirection::Up | BlockDirection::South | BlockDirection::East
        )
    }

    pub fn to_axis(&self) -> Axis {
        match self {
            BlockDirection::North | BlockDirection::South => Axis::Z,
            BlockDirection::West | BlockDirection::East => Axis::X,
            BlockDirection::Up | BlockDirection::Down => Axis::Y,
        }
    }

    /// Yaw in degrees an entity has when looking along this direction.
    /// Vertical directions have no yaw of their own and map to south.
    pub fn to_yaw(&self) -> f32 {
        match self {
            BlockDirection::South | BlockDirection::Up | BlockDirection::Down => 0.0,
            BlockDirection::West => 90.0,
            BlockDirection::North => 180.0,
            BlockDirection::East => -90.0,
        }
    }
}
