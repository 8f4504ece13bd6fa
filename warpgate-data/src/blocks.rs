use serde::{Deserialize, Serialize};

use crate::DyeColor;

/// Blocks that may form the four corners of a portal frame.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameMaterial {
    Obsidian,
    CryingObsidian,
    Lodestone,
}

/// What the portal core needs to know about a block. Everything that is neither a frame
/// piece nor walkable collapses into `Solid`.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Air,
    /// Non-colliding decoration such as grass, flowers or torches.
    Plant,
    Solid,
    /// A colored border block, e.g. wool.
    Marker(DyeColor),
    Corner(FrameMaterial),
}

impl BlockKind {
    pub fn is_passable(&self) -> bool {
        matches!(self, Self::Air | Self::Plant)
    }

    pub fn marker_color(&self) -> Option<DyeColor> {
        match self {
            Self::Marker(color) => Some(*color),
            _ => None,
        }
    }

    pub fn corner_material(&self) -> Option<FrameMaterial> {
        match self {
            Self::Corner(material) => Some(*material),
            _ => None,
        }
    }
}
