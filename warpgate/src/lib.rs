pub mod error;
pub mod logging;
pub mod persistence;
pub mod portal;
pub mod world;

#[cfg(test)]
pub(crate) mod test_world;

pub use error::PortalError;
pub use portal::{
    Portal, PortalId, PortalKind, Target, registry::PortalRegistry, service::PortalService,
    target::TargetTable, teleport::TeleportOrchestrator,
};
pub use world::{BlockAccessor, BlockMutator, EntityId, RegionId, Relocator};
