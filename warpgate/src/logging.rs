use std::{fs::File, io};

use log::{Level, LevelFilter};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use thiserror::Error;
use warpgate_config::LoggingConfig;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    File { path: String, source: io::Error },
    #[error("A logger is already installed: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

/// Installs the global logger described by `config`: the terminal, plus a log file if one
/// is configured. Does nothing when logging is disabled.
pub fn init_logger(config: &LoggingConfig) -> Result<(), LoggingError> {
    if !config.enabled {
        return Ok(());
    }
    let level = config.level;

    let mut builder = ConfigBuilder::new();
    if config.timestamp {
        builder.set_time_level(LevelFilter::Error);
    } else {
        builder.set_time_level(LevelFilter::Off);
    }
    if !config.color {
        for level in Level::iter() {
            builder.set_level_color(level, None);
        }
    }
    let log_config = builder.build();

    let color = if config.color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        log_config.clone(),
        TerminalMode::Mixed,
        color,
    )];

    if let Some(path) = &config.file {
        let file = File::create(path).map_err(|source| LoggingError::File {
            path: path.clone(),
            source,
        })?;
        loggers.push(WriteLogger::new(level, log_config, file));
    }

    CombinedLogger::init(loggers)?;
    log::debug!("Logging at level {level}");
    Ok(())
}
