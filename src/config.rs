//! Viewer configuration.
//!
//! A JSON file holding the log level, the system bar height and the gesture
//! tuning. `lightbox-replay` reads it from `--config` or from
//! `<config dir>/lightbox/lightbox-config.json`.

use lightbox_gesture::{GestureConfig, InvalidSetting};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Current configuration file format version.
pub const CONFIG_VERSION: u32 = 1;

/// File name looked up inside the platform config directory.
pub const CONFIG_FILENAME: &str = "lightbox-config.json";

/// Log verbosity for the replay tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    /// Gesture commits and zoom state changes
    Debug,
    /// Per-event gesture math
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!("unknown log level '{}'", s)),
        }
    }
}

/// Settings shared by every replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub version: u32,

    #[serde(default)]
    pub log_level: LogLevel,

    /// Height of the system bar the viewer draws under, used when a script
    /// does not give its own
    #[serde(default)]
    pub system_bar_offset: f32,

    #[serde(default)]
    pub gesture: GestureConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::default(),
            system_bar_offset: 0.0,
            gesture: GestureConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a configuration, rejecting newer formats and settings the
    /// engine cannot run with.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                found: config.version,
                supported: CONFIG_VERSION,
            });
        }
        if !config.system_bar_offset.is_finite() || config.system_bar_offset < 0.0 {
            return Err(ConfigError::SystemBarOffset(config.system_bar_offset));
        }
        config.gesture.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// `<config dir>/lightbox/lightbox-config.json`, if the platform has a
    /// config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lightbox").join(CONFIG_FILENAME))
    }

    /// Load from [`default_path`](Self::default_path). A missing file is not an
    /// error; a broken one is.
    pub fn load_from_default_path() -> Result<Option<Self>, ConfigError> {
        let Some(path) = Self::default_path() else {
            return Ok(None);
        };
        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults", path);
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }
}

/// Errors raised while loading a [`ViewerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration version {found} is newer than supported version {supported}")]
    VersionTooNew { found: u32, supported: u32 },

    #[error("System bar offset must be a non-negative number, got {0}")]
    SystemBarOffset(f32),

    #[error("Invalid configuration: {0}")]
    Gesture(#[from] InvalidSetting),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
