use serde::{Deserialize, Serialize};

/// Timings are counted in simulation ticks.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct TeleportConfig {
    /// Ticks an entity has to stand inside a portal before it is moved.
    pub delay_ticks: u64,
    /// Ticks after a teleport during which no new teleport can start.
    pub cooldown_ticks: u64,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            delay_ticks: 80,
            cooldown_ticks: 100,
        }
    }
}
