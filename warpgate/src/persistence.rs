use std::{fs, io, path::Path};

use thiserror::Error;

use crate::portal::PortalSnapshot;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to access portal file: {0}")]
    Io(#[from] io::Error),
    #[error("Portal file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes `snapshot` as pretty JSON. The data lands in a temporary file first and is then
/// renamed over `path`, so a crash never leaves a half written file behind.
pub fn save_snapshot(path: &Path, snapshot: &PortalSnapshot) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(snapshot)?;
    let temp = path.with_extension("json.tmp");
    fs::write(&temp, content)?;
    fs::rename(&temp, path)?;
    log::debug!(
        "Saved {} portals to {}",
        snapshot.portals.len(),
        path.display()
    );
    Ok(())
}

/// Reads a snapshot written by [`save_snapshot`]. A missing file is an empty snapshot.
pub fn load_snapshot(path: &Path) -> Result<PortalSnapshot, PersistenceError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::info!("No portal file at {}, starting empty", path.display());
            return Ok(PortalSnapshot::default());
        }
        Err(err) => return Err(err.into()),
    };
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use uuid::Uuid;
    use warpgate_config::WarpgateConfig;
    use warpgate_data::{Axis, DyeColor, FrameMaterial, FrameShape, FrameType};
    use warpgate_util::math::position::BlockPos;

    use super::{PersistenceError, load_snapshot, save_snapshot};
    use crate::{
        portal::{PortalKind, builder::build_frame, service::PortalService},
        test_world::{MemoryWorld, nether, overworld},
    };

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();

        let snapshot = load_snapshot(&dir.path().join("portals.json")).unwrap();

        assert!(snapshot.portals.is_empty());
        assert!(snapshot.targets.is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portals.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_snapshot(&path), Err(PersistenceError::Json(_))));
    }

    #[test]
    fn high_portal_keeps_its_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portals.json");
        let world = MemoryWorld::default();
        let service = PortalService::new(WarpgateConfig::default());
        let frame_type = FrameType::new(FrameMaterial::Obsidian, FrameShape::Standard);
        let descriptor = build_frame(
            &world,
            &overworld(),
            BlockPos::new(-30_000_000, 2100, 40_000_000),
            Axis::Z,
            frame_type,
            DyeColor::Red,
        );
        let portal = service
            .create_portal(&world, &overworld(), &descriptor, Uuid::nil(), PortalKind::World, None)
            .unwrap();

        save_snapshot(&path, &service.export_all()).unwrap();
        let snapshot = load_snapshot(&path).unwrap();

        assert_eq!(snapshot.portals[0].origin, BlockPos::new(-30_000_000, 2100, 40_000_000));
        assert_eq!(snapshot.portals[0].interior, portal.interior);
        assert_eq!(snapshot.portals[0].anchor(), portal.anchor());
    }

    #[test]
    fn saved_portals_come_back_linked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("portals.json");
        let world = MemoryWorld::default();
        let service = PortalService::new(WarpgateConfig::default());
        let frame_type = FrameType::new(FrameMaterial::Lodestone, FrameShape::Grand);
        for (region, origin) in [
            (overworld(), BlockPos::new(0, 64, 0)),
            (nether(), BlockPos::new(-7, 30, 12)),
        ] {
            let descriptor =
                build_frame(&world, &region, origin, Axis::X, frame_type, DyeColor::Lime);
            service
                .create_portal(&world, &region, &descriptor, Uuid::nil(), PortalKind::World, None)
                .unwrap();
        }

        save_snapshot(&path, &service.export_all()).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        let mut restored = PortalService::new(WarpgateConfig::default());
        restored.import_all(load_snapshot(&path).unwrap());

        let original: Vec<_> = service.registry().all_portals();
        let loaded: Vec<_> = restored.registry().all_portals();
        assert_eq!(loaded.len(), 2);
        for (before, after) in original.iter().zip(&loaded) {
            assert_eq!(before.id, after.id);
            assert_eq!(before.interior, after.interior);
            assert_eq!(before.corners, after.corners);
            assert_eq!(before.color, after.color);
            assert_eq!(restored.target_of(after.id), service.target_of(before.id));
        }
    }
}
