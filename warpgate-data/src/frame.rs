use serde::{Deserialize, Serialize};

use crate::FrameMaterial;

/// Fixed inner dimensions a frame can be built with.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameShape {
    /// 2 wide, 3 tall.
    Standard,
    /// 3 wide, 5 tall. Mostly placed by operators.
    Grand,
}

impl FrameShape {
    pub fn all() -> [FrameShape; 2] {
        [Self::Standard, Self::Grand]
    }

    /// Inner width, measured along the horizontal scan direction.
    pub const fn width(&self) -> i32 {
        match self {
            Self::Standard => 2,
            Self::Grand => 3,
        }
    }

    /// Inner height, measured along the vertical scan direction.
    pub const fn height(&self) -> i32 {
        match self {
            Self::Standard => 3,
            Self::Grand => 5,
        }
    }

    /// Largest inner dimension across every shape.
    pub fn max_extent() -> i32 {
        Self::all()
            .iter()
            .map(|shape| shape.width().max(shape.height()))
            .max()
            .unwrap_or(0)
    }
}

/// Two portals can only be linked when their frame types match.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FrameType {
    pub material: FrameMaterial,
    pub shape: FrameShape,
}

impl FrameType {
    pub const fn new(material: FrameMaterial, shape: FrameShape) -> Self {
        Self { material, shape }
    }

    pub const fn width(&self) -> i32 {
        self.shape.width()
    }

    pub const fn height(&self) -> i32 {
        self.shape.height()
    }
}
