use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

pub mod linking;
pub mod logging;
pub mod teleport;

pub use linking::LinkingConfig;
pub use logging::LoggingConfig;
pub use teleport::TeleportConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize default config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything the portal core can be tuned with. Each section falls back to its defaults
/// when left out of the file.
#[derive(Deserialize, Serialize, Default, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WarpgateConfig {
    pub teleport: TeleportConfig,
    pub linking: LinkingConfig,
    pub logging: LoggingConfig,
}

impl LoadConfiguration for WarpgateConfig {
    fn get_path() -> &'static Path {
        Path::new("warpgate.toml")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()
    }
}

pub trait LoadConfiguration {
    /// Reads the config from `config_dir`. A missing file is created with the defaults.
    fn load(config_dir: &Path) -> Result<Self, ConfigError>
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        if !config_dir.exists() {
            log::debug!("creating new config root folder");
            fs::create_dir_all(config_dir).map_err(|source| ConfigError::Io {
                path: config_dir.to_path_buf(),
                source,
            })?;
        }

        let path = config_dir.join(Self::get_path());

        let config = if path.exists() {
            let file_content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            toml::from_str(&file_content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            let content = Self::default();
            let serialized = toml::to_string(&content)?;
            if let Err(err) = fs::write(&path, serialized) {
                log::warn!(
                    "Couldn't write default config to {}. Reason: {err}",
                    path.display()
                );
            }
            content
        };

        config.validate()?;
        Ok(config)
    }

    fn get_path() -> &'static Path;

    fn validate(&self) -> Result<(), ConfigError>;
}
