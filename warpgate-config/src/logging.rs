use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub level: LevelFilter,
    /// Also write logs into this file when set.
    pub file: Option<String>,
    pub timestamp: bool,
    pub color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LevelFilter::Info,
            file: None,
            timestamp: true,
            color: true,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file.as_deref().is_some_and(|file| file.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "logging.file must not be empty, remove it to disable file logging".to_string(),
            ));
        }
        Ok(())
    }
}
