use std::collections::HashMap;

use warpgate_config::TeleportConfig;

use super::PortalId;
use crate::world::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingTeleport {
    /// Portal the entity was last seen in.
    pub portal: PortalId,
    pub entered_at: u64,
    pub fires_at: u64,
    pub last_seen: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cooldown {
    pub until: u64,
    /// The entity was already told about this cooldown.
    pub notified: bool,
    /// Set by a teleport and cleared once the entity steps out of every portal.
    pub awaiting_exit: bool,
}

/// What a single tick of portal contact resulted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortalStep {
    /// Not in a portal and nothing was pending.
    Idle,
    /// Started the delay timer.
    Entered { portal: PortalId },
    Waiting { portal: PortalId, remaining: u64 },
    /// Blocked by a running cooldown. `notify` is only set once per cooldown.
    CoolingDown { remaining: u64, notify: bool },
    /// Still standing in the portal it arrived through.
    Suppressed,
    /// The delay is over, the entity has to be moved now.
    Teleport { portal: PortalId },
    /// Left the portal before the delay ran out.
    Cancelled,
}

/// Per-entity portal timers. Lives on the simulation thread, which feeds it one
/// observation per entity and tick.
pub struct TeleportOrchestrator {
    delay: u64,
    cooldown: u64,
    pending: HashMap<EntityId, PendingTeleport>,
    cooldowns: HashMap<EntityId, Cooldown>,
}

impl TeleportOrchestrator {
    pub fn new(config: &TeleportConfig) -> Self {
        Self {
            delay: config.delay_ticks,
            cooldown: config.cooldown_ticks,
            pending: HashMap::new(),
            cooldowns: HashMap::new(),
        }
    }

    /// Advances `entity`'s state for tick `now`. `occupied` is the portal whose interior the
    /// entity stands in, if any.
    pub fn step(&mut self, entity: EntityId, now: u64, occupied: Option<PortalId>) -> PortalStep {
        let Some(portal) = occupied else {
            return self.leave(entity, now);
        };

        if let Some(blocked) = self.check_cooldown(entity, now) {
            self.pending.remove(&entity);
            return blocked;
        }

        if let Some(pending) = self.pending.get_mut(&entity) {
            // A gap of more than one tick means the entity walked out in between
            if now <= pending.last_seen.saturating_add(1) {
                pending.last_seen = now;
                pending.portal = portal;
                if now >= pending.fires_at {
                    self.pending.remove(&entity);
                    return PortalStep::Teleport { portal };
                }
                return PortalStep::Waiting {
                    portal,
                    remaining: pending.fires_at - now,
                };
            }
            log::debug!("Restarting portal delay for {entity}");
        }

        let fires_at = now.saturating_add(self.delay);
        if fires_at <= now {
            self.pending.remove(&entity);
            return PortalStep::Teleport { portal };
        }
        self.pending.insert(
            entity,
            PendingTeleport {
                portal,
                entered_at: now,
                fires_at,
                last_seen: now,
            },
        );
        PortalStep::Entered { portal }
    }

    fn leave(&mut self, entity: EntityId, now: u64) -> PortalStep {
        if let Some(cooldown) = self.cooldowns.get_mut(&entity) {
            cooldown.awaiting_exit = false;
            if now >= cooldown.until {
                self.cooldowns.remove(&entity);
            }
        }
        match self.pending.remove(&entity) {
            Some(_) => PortalStep::Cancelled,
            None => PortalStep::Idle,
        }
    }

    fn check_cooldown(&mut self, entity: EntityId, now: u64) -> Option<PortalStep> {
        let cooldown = self.cooldowns.get_mut(&entity)?;
        if cooldown.awaiting_exit {
            return Some(PortalStep::Suppressed);
        }
        if now < cooldown.until {
            let notify = !cooldown.notified;
            cooldown.notified = true;
            return Some(PortalStep::CoolingDown {
                remaining: cooldown.until - now,
                notify,
            });
        }
        self.cooldowns.remove(&entity);
        None
    }

    /// Call once the entity was actually moved.
    pub fn start_cooldown(&mut self, entity: EntityId, now: u64) {
        self.pending.remove(&entity);
        self.cooldowns.insert(
            entity,
            Cooldown {
                until: now.saturating_add(self.cooldown),
                notified: false,
                awaiting_exit: true,
            },
        );
    }

    /// Drops all state for `entity`, e.g. when it disconnects or a teleport failed.
    pub fn forget(&mut self, entity: EntityId) {
        self.pending.remove(&entity);
        self.cooldowns.remove(&entity);
    }

    /// Evicts pending teleports nobody confirmed last tick and cooldowns that are over.
    pub fn sweep(&mut self, now: u64) -> usize {
        let before = self.pending.len() + self.cooldowns.len();
        self.pending
            .retain(|_, pending| now <= pending.last_seen.saturating_add(1));
        self.cooldowns
            .retain(|_, cooldown| cooldown.awaiting_exit || now < cooldown.until);
        before - (self.pending.len() + self.cooldowns.len())
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.cooldowns.clear();
    }

    pub fn pending(&self, entity: EntityId) -> Option<&PendingTeleport> {
        self.pending.get(&entity)
    }

    pub fn is_pending(&self, entity: EntityId) -> bool {
        self.pending.contains_key(&entity)
    }

    pub fn cooldown_remaining(&self, entity: EntityId, now: u64) -> Option<u64> {
        self.cooldowns
            .get(&entity)
            .filter(|cooldown| now < cooldown.until)
            .map(|cooldown| cooldown.until - now)
    }
}
