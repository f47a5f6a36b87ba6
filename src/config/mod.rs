// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Log level
//! - `[playback]` - Startup volume, rate, auto-advance, progress throttling
//! - `[fullscreen]` - Fullscreen control auto-hide settings
//! - `[engine]` - Opaque media engine options, passed through unmodified
//!
//! # Examples
//!
//! ```no_run
//! use media_shell::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! // Modify a setting
//! config.playback.auto_advance = Some(false);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;
pub mod paths;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Enums (shared between sections)
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DeinterlaceMode {
    #[default]
    Off,
    Blend,
    Yadif,
}

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Default tracing filter directive (e.g. "info", "media_shell=debug").
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Playback settings applied when the shell starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Startup volume (0 to 100).
    #[serde(default = "default_volume", skip_serializing_if = "Option::is_none")]
    pub volume: Option<u8>,

    /// Startup index into the playback rate table.
    #[serde(default = "default_rate_index", skip_serializing_if = "Option::is_none")]
    pub rate_index: Option<usize>,

    /// Advance to the next playlist entry when the current media ends.
    #[serde(default = "default_auto_advance", skip_serializing_if = "Option::is_none")]
    pub auto_advance: Option<bool>,

    /// Minimum spacing between applied engine time updates (ms).
    #[serde(
        default = "default_time_update_interval_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_update_interval_ms: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            rate_index: default_rate_index(),
            auto_advance: default_auto_advance(),
            time_update_interval_ms: default_time_update_interval_ms(),
        }
    }
}

impl PlaybackConfig {
    /// Returns the time update interval, clamped to the supported range.
    #[must_use]
    pub fn time_update_interval(&self) -> Duration {
        let ms = self
            .time_update_interval_ms
            .unwrap_or(DEFAULT_TIME_UPDATE_INTERVAL_MS)
            .clamp(MIN_TIME_UPDATE_INTERVAL_MS, MAX_TIME_UPDATE_INTERVAL_MS);
        Duration::from_millis(ms)
    }
}

/// Fullscreen control settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FullscreenConfig {
    /// Auto-hide timeout for fullscreen controls (seconds).
    #[serde(
        default = "default_overlay_timeout_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub overlay_timeout_secs: Option<u32>,
}

impl Default for FullscreenConfig {
    fn default() -> Self {
        Self {
            overlay_timeout_secs: default_overlay_timeout_secs(),
        }
    }
}

/// Media engine options.
///
/// The shell never interprets these; they are handed to the engine adapter
/// as-is at initialization time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Use GPU-accelerated decoding when available.
    #[serde(default = "default_true")]
    pub hardware_acceleration: bool,

    /// Network stream cache (ms).
    #[serde(default = "default_network_cache_ms")]
    pub network_cache_ms: u32,

    /// Local file cache (ms).
    #[serde(default = "default_file_cache_ms")]
    pub file_cache_ms: u32,

    /// Deinterlacing filter.
    #[serde(default)]
    pub deinterlace: DeinterlaceMode,

    /// Raw engine options appended after the named ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_options: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hardware_acceleration: true,
            network_cache_ms: DEFAULT_NETWORK_CACHE_MS,
            file_cache_ms: DEFAULT_FILE_CACHE_MS,
            deinterlace: DeinterlaceMode::Off,
            extra_options: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Returns the reduced configuration used after an initialization failure:
    /// software decoding, no filters, no raw options. Cache sizes are kept.
    #[must_use]
    pub fn degraded(&self) -> Self {
        Self {
            hardware_acceleration: false,
            network_cache_ms: self.network_cache_ms,
            file_cache_ms: self.file_cache_ms,
            deinterlace: DeinterlaceMode::Off,
            extra_options: Vec::new(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub fullscreen: FullscreenConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_log_level() -> Option<String> {
    Some("info".to_string())
}

fn default_volume() -> Option<u8> {
    Some(DEFAULT_VOLUME)
}

fn default_rate_index() -> Option<usize> {
    Some(DEFAULT_RATE_INDEX)
}

fn default_auto_advance() -> Option<bool> {
    Some(true)
}

fn default_time_update_interval_ms() -> Option<u64> {
    Some(DEFAULT_TIME_UPDATE_INTERVAL_MS)
}

fn default_overlay_timeout_secs() -> Option<u32> {
    Some(DEFAULT_OVERLAY_TIMEOUT_SECS)
}

fn default_network_cache_ms() -> u32 {
    DEFAULT_NETWORK_CACHE_MS
}

fn default_file_cache_ms() -> u32 {
    DEFAULT_FILE_CACHE_MS
}

// =============================================================================
// Load / Save
// =============================================================================

fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "falling back to default config");
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration into a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    let path = config_path_with_override(base_dir)
        .ok_or_else(|| Error::Config("config directory unavailable".to_string()))?;
    save_to_path(config, &path)
}

/// Saves configuration to a specific path, creating parent directories.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
