use dashmap::DashMap;

use super::{PortalId, Target};

/// Destination of each linked portal. Entries are keyed by portal id but never checked
/// against the registry here, so an entry may outlive its portal until someone removes it.
#[derive(Default)]
pub struct TargetTable {
    targets: DashMap<PortalId, Target>,
}

impl TargetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PortalId) -> Option<Target> {
        self.targets.get(&id).map(|target| target.clone())
    }

    /// Returns the target this replaced.
    pub fn set(&self, id: PortalId, target: Target) -> Option<Target> {
        self.targets.insert(id, target)
    }

    pub fn remove(&self, id: PortalId) -> Option<Target> {
        self.targets.remove(&id).map(|(_, target)| target)
    }

    pub fn contains(&self, id: PortalId) -> bool {
        self.targets.contains_key(&id)
    }

    /// Drops every entry for which `keep` returns false.
    pub fn retain(&self, mut keep: impl FnMut(&PortalId, &Target) -> bool) {
        self.targets.retain(|id, target| keep(id, target));
    }

    pub fn clear(&self) {
        self.targets.clear();
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use warpgate_util::math::position::BlockPos;

    use super::TargetTable;
    use crate::{
        portal::{PortalId, Target},
        test_world::{nether, overworld},
    };

    #[test]
    fn unknown_id_has_no_target() {
        let table = TargetTable::new();

        assert_eq!(table.get(PortalId::new_random()), None);
        assert_eq!(table.remove(PortalId::new_random()), None);
    }

    #[test]
    fn set_overwrites_and_reports_previous() {
        let table = TargetTable::new();
        let id = PortalId::new_random();
        let first = Target::new(overworld(), BlockPos::new(1, 65, 0));
        let second = Target::new(nether(), BlockPos::new(8, 40, 8));

        assert_eq!(table.set(id, first.clone()), None);
        assert_eq!(table.set(id, second.clone()), Some(first));
        assert_eq!(table.get(id), Some(second));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn retain_and_clear() {
        let table = TargetTable::new();
        let keep = PortalId::new_random();
        let dropped = PortalId::new_random();
        table.set(keep, Target::new(overworld(), BlockPos::ZERO));
        table.set(dropped, Target::new(nether(), BlockPos::ZERO));

        table.retain(|_, target| target.region == overworld());

        assert!(table.contains(keep));
        assert!(!table.contains(dropped));

        table.clear();
        assert!(table.is_empty());
    }
}
