//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Events go to stderr and, when a log file is configured, are appended to it
//! without ANSI colours. `RUST_LOG` overrides the stderr level chosen on the
//! command line.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::gradschool::tools::error::{Result, ToolError};

/// Configuration for logging behaviour.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    /// Appends log events to this file in addition to stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_file: None,
        }
    }
}

impl LogConfig {
    /// Maps CLI verbosity onto a level.
    ///
    /// `quiet` wins and keeps errors only; otherwise 0 is info, 1 is debug and
    /// anything higher is trace.
    pub fn from_verbosity(verbosity: u8, quiet: bool) -> Self {
        let level = match (quiet, verbosity) {
            (true, _) => Level::ERROR,
            (false, 0) => Level::INFO,
            (false, 1) => Level::DEBUG,
            (false, _) => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    /// Level of the log file: the configured level, but never quieter than
    /// info.
    pub fn file_level(&self) -> Level {
        self.level.max(Level::INFO)
    }

    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }
}

/// Installs the global tracing subscriber. Call once at startup.
///
/// The configured level only filters stderr. The log file keeps at least
/// info events, so a quiet run still records its progress and the final
/// `run completed` marker.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let stderr_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string().to_lowercase()));

    let file_layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::from_level(config.file_level())),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .with_filter(stderr_filter),
        )
        .with(file_layer)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}
