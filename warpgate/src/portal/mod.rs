use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warpgate_data::{Axis, DyeColor, FrameType};
use warpgate_util::math::{position::BlockPos, vector3::Vector3};

use crate::world::RegionId;

pub mod builder;
pub mod linker;
pub mod registry;
pub mod scanner;
pub mod service;
pub mod target;
pub mod teleport;
pub mod validator;

use scanner::FrameDescriptor;
use validator::ValidatedFrame;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct PortalId(Uuid);

impl PortalId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalKind {
    Player,
    World,
    Unbound,
    Event,
}

/// A detected portal frame. Two portals are equal when their ids are, whatever their
/// other fields say.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Portal {
    pub id: PortalId,
    pub region: RegionId,
    /// Minimum corner of the frame.
    pub origin: BlockPos,
    /// Normal of the frame plane. `Y` means the frame lies flat on the ground.
    pub axis: Axis,
    /// Border cells between the corners.
    pub frame: IndexSet<BlockPos>,
    /// Walkable cells, bottom row first.
    pub interior: IndexSet<BlockPos>,
    pub corners: IndexSet<BlockPos>,
    /// Nil for portals not built by a player.
    pub creator: Uuid,
    pub color: DyeColor,
    pub frame_type: FrameType,
    pub kind: PortalKind,
    pub name: Option<String>,
    pub last_used: Option<DateTime<Utc>>,
}

impl Portal {
    pub fn new(
        region: RegionId,
        descriptor: &FrameDescriptor,
        frame: ValidatedFrame,
        creator: Uuid,
        kind: PortalKind,
    ) -> Self {
        Self {
            id: PortalId::new_random(),
            region,
            origin: descriptor.origin(),
            axis: descriptor.axis(),
            frame: frame.frame,
            interior: frame.interior,
            corners: frame.corners,
            creator,
            color: frame.color,
            frame_type: descriptor.frame_type(),
            kind,
            name: None,
            last_used: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Copy of this portal marked as used at `at`. The id stays the same.
    #[must_use]
    pub fn with_last_used(&self, at: DateTime<Utc>) -> Self {
        Self {
            last_used: Some(at),
            ..self.clone()
        }
    }

    /// Border and corner cells, the blocks that make up the frame itself.
    pub fn outline(&self) -> impl Iterator<Item = &BlockPos> {
        self.frame.iter().chain(self.corners.iter())
    }

    pub fn outline_contains(&self, pos: &BlockPos) -> bool {
        self.frame.contains(pos) || self.corners.contains(pos)
    }

    pub fn interior_contains(&self, pos: &BlockPos) -> bool {
        self.interior.contains(pos)
    }

    /// Where entities arrive: the interior cell closest to the interior's centroid. Ties go
    /// to the cell listed first, which is the lower one.
    pub fn anchor(&self) -> BlockPos {
        if self.interior.is_empty() {
            return self.origin.up();
        }

        let count = self.interior.len() as f64;
        let sum = self
            .interior
            .iter()
            .fold(Vector3::new(0.0, 0.0, 0.0), |acc, pos| acc + pos.0.to_f64());
        let centroid = sum * (1.0 / count);

        self.interior
            .iter()
            .copied()
            .min_by(|a, b| {
                let a = a.0.to_f64().squared_distance_to_vec(centroid);
                let b = b.0.to_f64().squared_distance_to_vec(centroid);
                a.total_cmp(&b)
            })
            .unwrap_or_else(|| self.origin.up())
    }

    /// Yaw entities get when arriving through this portal.
    pub fn yaw(&self) -> f32 {
        self.axis.positive().to_yaw()
    }
}

impl PartialEq for Portal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Portal {}

impl Hash for Portal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Where a portal sends entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub region: RegionId,
    pub position: BlockPos,
    #[serde(default)]
    pub yaw: f32,
}

impl Target {
    pub fn new(region: RegionId, position: BlockPos) -> Self {
        Self {
            region,
            position,
            yaw: 0.0,
        }
    }

    /// The arrival point of `portal`.
    pub fn of(portal: &Portal) -> Self {
        Self {
            region: portal.region.clone(),
            position: portal.anchor(),
            yaw: portal.yaw(),
        }
    }
}

/// Everything needed to rebuild the registry and the target table, in registry order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PortalSnapshot {
    pub portals: Vec<Portal>,
    pub targets: Vec<(PortalId, Target)>,
}

#[cfg(test)]
mod tests {
    use indexmap::IndexSet;
    use warpgate_data::{Axis, DyeColor, FrameMaterial, FrameShape, FrameType};
    use warpgate_util::math::position::BlockPos;

    use super::{Portal, PortalKind, scanner::FrameDescriptor, validator::ValidatedFrame};
    use crate::world::RegionId;

    fn portal_with_interior(interior: &[BlockPos]) -> Portal {
        let descriptor = FrameDescriptor::canonical(
            Axis::Z,
            BlockPos::new(0, 64, 0),
            FrameType::new(FrameMaterial::Obsidian, FrameShape::Standard),
        );
        Portal::new(
            RegionId::from("overworld"),
            &descriptor,
            ValidatedFrame {
                color: DyeColor::Red,
                interior: interior.iter().copied().collect(),
                frame: IndexSet::new(),
                corners: IndexSet::new(),
            },
            uuid::Uuid::nil(),
            PortalKind::Player,
        )
    }

    #[test]
    fn anchor_prefers_cell_nearest_centroid() {
        let interior: Vec<_> = (65..=67)
            .flat_map(|y| (1..=2).map(move |x| BlockPos::new(x, y, 0)))
            .collect();
        let portal = portal_with_interior(&interior);

        assert_eq!(portal.anchor(), BlockPos::new(1, 66, 0));
    }

    #[test]
    fn empty_interior_anchors_above_origin() {
        let portal = portal_with_interior(&[]);

        assert_eq!(portal.anchor(), BlockPos::new(0, 65, 0));
    }

    #[test]
    fn equality_only_looks_at_id() {
        let portal = portal_with_interior(&[BlockPos::new(1, 65, 0)]);
        let mut moved = portal.with_last_used(chrono::Utc::now());
        moved.color = DyeColor::Blue;

        assert_eq!(portal, moved);
        assert_ne!(portal, portal_with_interior(&[BlockPos::new(1, 65, 0)]));
    }
}
