use thiserror::Error;

use crate::portal::{PortalId, validator::FrameRejection};

#[derive(Error, Debug)]
pub enum PortalError {
    #[error(transparent)]
    Rejected(#[from] FrameRejection),
    #[error("There is no portal with id {0}")]
    UnknownPortal(PortalId),
    #[error("Portal {0} can't be linked to itself")]
    SelfLink(PortalId),
    #[error("This frame already belongs to portal {0}")]
    AlreadyRegistered(PortalId),
}
