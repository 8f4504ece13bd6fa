use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct LinkingConfig {
    /// Pair freshly built portals with a matching existing one.
    pub auto_link: bool,
    /// Allow auto linking to fall back to portals in other regions.
    pub cross_region: bool,
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            auto_link: true,
            cross_region: true,
        }
    }
}
