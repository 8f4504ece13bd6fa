use std::sync::Arc;

use super::{Portal, PortalId, Target, target::TargetTable};

/// Whether `candidate` could be the other end of `portal`: same frame type and same color.
pub fn is_partner(portal: &Portal, candidate: &Portal) -> bool {
    candidate.id != portal.id
        && candidate.frame_type == portal.frame_type
        && candidate.color == portal.color
}

/// First partner of `portal`, looking at `same_region` before `all`.
pub fn find_partner<'a>(
    portal: &Portal,
    same_region: &'a [Arc<Portal>],
    all: &'a [Arc<Portal>],
) -> Option<&'a Arc<Portal>> {
    same_region
        .iter()
        .find(|candidate| is_partner(portal, candidate))
        .or_else(|| all.iter().find(|candidate| is_partner(portal, candidate)))
}

/// Points `a` at `b`'s anchor and `b` at `a`'s, replacing whatever either had before.
pub fn link(a: &Portal, b: &Portal, targets: &TargetTable) {
    targets.set(a.id, Target::of(b));
    targets.set(b.id, Target::of(a));
    log::info!(
        "Linked portal {} ({}) with {} ({})",
        a.id,
        a.region,
        b.id,
        b.region
    );
}

/// Links a freshly created portal to the first partner found. Does nothing when the portal
/// already has a target. A partner that is linked elsewhere loses that link.
pub fn auto_link(
    portal: &Portal,
    same_region: &[Arc<Portal>],
    all: &[Arc<Portal>],
    targets: &TargetTable,
) -> Option<PortalId> {
    if targets.contains(portal.id) {
        return None;
    }
    let Some(partner) = find_partner(portal, same_region, all) else {
        log::debug!("No partner for {} portal {}", portal.color, portal.id);
        return None;
    };
    if let Some(previous) = targets.get(partner.id) {
        log::debug!(
            "Portal {} drops its link to {} in {}",
            partner.id,
            previous.position,
            previous.region
        );
    }
    link(portal, partner, targets);
    Some(partner.id)
}
