//! On-disk configuration for the controller link.
//!
//! Stored as TOML at `{config_dir}/panel-link.toml`. Every field has a
//! default, so a missing file or a partial file both load cleanly.

use crate::error::config::ConfigError;
use crate::{DEFAULT_CONTROLLER_HOST, DEFAULT_CONTROLLER_PORT, WEBSOCKET_SCHEME};

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_FILE_NAME: &str = "panel-link.toml";
const CONFIG_DIR_NAME: &str = "panel-link";
const CONFIG_VERSION: u32 = 1;

pub const HOST_ENV_VAR: &str = "PANEL_LINK_HOST";
pub const PORT_ENV_VAR: &str = "PANEL_LINK_PORT";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Fixed wait between a failed or closed connection and the next attempt.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
    /// Frames that may wait for the socket writer on one connection.
    #[serde(default = "default_outbound_capacity")]
    pub outbound_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            retry_interval_ms: default_retry_interval_ms(),
            outbound_capacity: default_outbound_capacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivenessConfig {
    #[serde(default = "default_down_threshold_ms")]
    pub down_threshold_ms: u64,
    #[serde(default = "default_up_threshold_ms")]
    pub up_threshold_ms: u64,
    #[serde(default = "default_clock_tick_ms")]
    pub clock_tick_ms: u64,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            down_threshold_ms: default_down_threshold_ms(),
            up_threshold_ms: default_up_threshold_ms(),
            clock_tick_ms: default_clock_tick_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Overrides the platform log directory.
    pub log_dir: Option<String>,
    /// `error`, `warn`, `info`, `debug` or `trace`. Unset uses the build default.
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub liveness: LivenessConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            controller: ControllerConfig::default(),
            liveness: LivenessConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_host() -> String {
    DEFAULT_CONTROLLER_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_CONTROLLER_PORT
}
fn default_retry_interval_ms() -> u64 {
    1_000
}
fn default_outbound_capacity() -> usize {
    32
}
fn default_down_threshold_ms() -> u64 {
    3_000
}
fn default_up_threshold_ms() -> u64 {
    400
}
fn default_clock_tick_ms() -> u64 {
    1_000
}

// ============================================
// IMPLEMENTATION
// ============================================

impl LinkConfig {
    /// Load config from {config_dir}/panel-link.toml.
    ///
    /// # Returns
    ///
    /// Returns `Ok(LinkConfig)` if loaded successfully or defaults if file missing.
    /// Returns `Err(ConfigError)` if file exists but is corrupted/invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: LinkConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/panel-link.toml using temp file + rename.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, directory creation,
    /// serialization, write or rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, contents).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        if self.controller.host.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "controller.host cannot be empty".to_string(),
            });
        }

        for (name, value) in [
            ("controller.retry_interval_ms", self.controller.retry_interval_ms),
            ("liveness.down_threshold_ms", self.liveness.down_threshold_ms),
            ("liveness.up_threshold_ms", self.liveness.up_threshold_ms),
            ("liveness.clock_tick_ms", self.liveness.clock_tick_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ValidationError {
                    location: ErrorLocation::from(Location::caller()),
                    reason: format!("{name} must be greater than zero"),
                });
            }
        }

        if self.controller.outbound_capacity == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "controller.outbound_capacity must be greater than zero".to_string(),
            });
        }

        self.controller_url()?;
        self.log_level()?;

        if self.liveness.up_threshold_ms >= self.liveness.down_threshold_ms {
            warn!(
                "liveness.up_threshold_ms ({}) is not below down_threshold_ms ({}); recovery and loss may both fire in one pass",
                self.liveness.up_threshold_ms, self.liveness.down_threshold_ms
            );
        }

        Ok(())
    }

    /// The WebSocket address of the controller, `ws://host:port/`.
    pub fn controller_url(&self) -> Result<Url, ConfigError> {
        let raw = format!(
            "{WEBSOCKET_SCHEME}{}:{}/",
            self.controller.host.trim(),
            self.controller.port
        );

        Url::parse(&raw).map_err(|e| ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("Invalid controller address {raw}: {e}"),
        })
    }

    /// Parsed `logging.level`, or `None` when unset.
    pub fn log_level(&self) -> Result<Option<LevelFilter>, ConfigError> {
        self.logging
            .level
            .as_deref()
            .map(|raw| {
                raw.trim()
                    .parse::<LevelFilter>()
                    .map_err(|e| ConfigError::ValidationError {
                        location: ErrorLocation::from(Location::caller()),
                        reason: format!("Invalid logging.level {raw}: {e}"),
                    })
            })
            .transpose()
    }

    /// `logging.log_dir` if set, otherwise `logs/` under `config_dir`.
    pub fn log_dir(&self, config_dir: &Path) -> PathBuf {
        self.logging
            .log_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| config_dir.join("logs"))
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.controller.retry_interval_ms)
    }

    pub fn clock_tick(&self) -> Duration {
        Duration::from_millis(self.liveness.clock_tick_ms)
    }

    /// Apply `PANEL_LINK_HOST` / `PANEL_LINK_PORT` from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply host/port overrides from an arbitrary lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the port override is not a valid port.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV_VAR) {
            info!("Using {HOST_ENV_VAR} override: {host}");
            self.controller.host = host;
        }

        if let Some(raw_port) = lookup(PORT_ENV_VAR) {
            let port = raw_port
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::ValidationError {
                    location: ErrorLocation::from(Location::caller()),
                    reason: format!("{PORT_ENV_VAR}={raw_port} is not a valid port: {e}"),
                })?;
            info!("Using {PORT_ENV_VAR} override: {port}");
            self.controller.port = port;
        }

        Ok(())
    }
}

/// Platform config directory for the panel link.
///
/// # Errors
///
/// Returns [`ConfigError::DirectoryNotFound`] if the platform has no config directory.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| ConfigError::DirectoryNotFound {
            location: ErrorLocation::from(Location::caller()),
            reason: "Platform reports no config directory".to_string(),
        })
}

/// Load a `.env` file from the working directory, then from the executable's directory.
///
/// Returns the path that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {:?}", path);
        return Some(path);
    }

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))?;
    let env_path = exe_dir.join(".env");
    if !env_path.exists() {
        debug!("No .env found");
        return None;
    }

    match dotenvy::from_path(&env_path) {
        Ok(()) => {
            info!("Loaded .env from: {:?}", env_path);
            Some(env_path)
        }
        Err(e) => {
            warn!("Failed to parse .env at {:?}: {}", env_path, e);
            None
        }
    }
}
