//! Configuration management (config.toml)
//!
//! Handles loading, saving, and providing defaults for previewer settings.
//! Settings are stored in TOML format in the platform-specific config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vision3d_shared::DEFAULT_MODEL;
use vision3d_shared::constants::DEFAULT_API_BASE_URL;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Previewer configuration.
///
/// Contains all user-configurable settings organized into sections.
/// Serialized to/from TOML format for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Analysis model settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Viewport settings
    #[serde(default)]
    pub viewer: ViewerConfig,
    /// Log filter settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analysis model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Model name (default: gemini-3-flash-preview)
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL (default: the public Generative Language endpoint)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key; usually supplied through `API_KEY` instead of the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds (default: 60)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Viewport configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Surface width in pixels (default: 1280)
    #[serde(default = "default_width")]
    pub width: u32,
    /// Surface height in pixels (default: 720)
    #[serde(default = "default_height")]
    pub height: u32,
    /// Redraw rate while a scene is mounted (default: 60)
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Orbit auto-rotate speed, 0 disables it (default: 0.5)
    #[serde(default = "default_auto_rotate_speed")]
    pub auto_rotate_speed: f32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset (default: info)
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    60
}

fn default_width() -> u32 {
    1280
}
fn default_height() -> u32 {
    720
}
fn default_fps() -> u32 {
    60
}
fn default_auto_rotate_speed() -> f32 {
    0.5
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            auto_rotate_speed: default_auto_rotate_speed(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl ViewerConfig {
    /// Seconds per frame, with the rate clamped to 1..=240.
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.fps.clamp(1, 240) as f64)
    }
}

/// Errors from loading or saving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Vision3D\config`
/// On macOS: `~/Library/Application Support/io.vision3d.Vision3D`
/// On Linux: `~/.config/Vision3D`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.vision3d", "", "Vision3D")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path of `config.toml` in the platform configuration directory.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration from the platform configuration directory.
///
/// A missing file yields defaults; an unreadable or invalid file is an error.
pub fn load() -> Result<Config, ConfigError> {
    match config_path() {
        Some(path) => load_from(&path),
        None => Ok(Config::default()),
    }
}

/// Loads the configuration from an explicit path. A missing file yields defaults.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves the configuration to the platform configuration directory.
///
/// Creates the directory if it doesn't exist. Returns the written path.
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Saves the configuration to an explicit path as pretty TOML.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`.
    ///
    /// `VISION3D_MODEL` replaces the model, `VISION3D_LOG` the log filter, and
    /// `API_KEY` (falling back to `GEMINI_API_KEY`) the API key. Empty values
    /// are ignored.
    pub fn apply_env_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(model) = get("VISION3D_MODEL") {
            self.analysis.model = model;
        }
        if let Some(level) = get("VISION3D_LOG") {
            self.logging.level = level;
        }
        if let Some(key) = get("API_KEY").or_else(|| get("GEMINI_API_KEY")) {
            self.analysis.api_key = Some(key);
        }
    }
}
