//! Configuration and settings management for FrameKit
//!
//! Provides configuration file handling, defaults and validation.
//! Supports JSON and TOML file formats stored in the platform config
//! directory.
//!
//! Configuration is organized into logical sections:
//! - Style (palette, default color, stroke width range)
//! - Playback (speed options, seek step)
//! - View (zoom range and step)
//! - Snapshot (blur radii, JPEG quality, file naming)

use framekit_core::constants::{
    DEFAULT_LINE_WIDTH, DEFAULT_SPEED, EXPORT_BLUR_PX, JPEG_QUALITY, LIVE_BLUR_PX, MAX_LINE_WIDTH,
    MAX_ZOOM, MIN_LINE_WIDTH, MIN_ZOOM, PALETTE, SEEK_STEP_SECS, SNAPSHOT_FILE_PREFIX,
    SPEED_OPTIONS, ZOOM_STEP,
};
use framekit_core::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Name of the config directory under the platform config dir.
const APP_DIR: &str = "framekit";
const CONFIG_FILE: &str = "config.toml";

/// Drawing style preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSettings {
    /// Colors offered in the toolbar
    pub palette: Vec<Color>,
    /// Color selected at startup
    pub default_color: Color,
    /// Stroke width selected at startup
    pub default_width: f64,
    pub min_width: f64,
    pub max_width: f64,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            palette: PALETTE
                .iter()
                .filter_map(|hex| Color::from_hex(hex).ok())
                .collect(),
            default_color: Color::default(),
            default_width: DEFAULT_LINE_WIDTH,
            min_width: MIN_LINE_WIDTH,
            max_width: MAX_LINE_WIDTH,
        }
    }
}

impl StyleSettings {
    /// Clamps a requested stroke width into the configured range.
    pub fn clamp_width(&self, width: f64) -> f64 {
        if width.is_nan() {
            return self.default_width;
        }
        width.max(self.min_width).min(self.max_width)
    }
}

/// Playback preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Playback rates offered in the speed menu
    pub speed_options: Vec<f64>,
    pub default_speed: f64,
    /// Arrow key seek step in seconds
    pub seek_step: f64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            speed_options: SPEED_OPTIONS.to_vec(),
            default_speed: DEFAULT_SPEED,
            seek_step: SEEK_STEP_SECS,
        }
    }
}

/// Zoom preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom change per button press
    pub zoom_step: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl ViewSettings {
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}

/// Blur and snapshot preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSettings {
    /// Blur radius of the live overlay, in screen pixels
    pub live_blur_px: f32,
    /// Blur radius of exported snapshots, in native pixels
    pub export_blur_px: f32,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
    /// Snapshot files are named `<prefix>-<unix millis>.jpg`
    pub file_prefix: String,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            live_blur_px: LIVE_BLUR_PX,
            export_blur_px: EXPORT_BLUR_PX,
            jpeg_quality: JPEG_QUALITY,
            file_prefix: SNAPSHOT_FILE_PREFIX.to_string(),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
/// Missing sections or fields fall back to their defaults when loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub style: StyleSettings,
    pub playback: PlaybackSettings,
    pub view: ViewSettings,
    pub export: SnapshotSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn positive(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        // Style
        if self.style.palette.is_empty() {
            return Err(ConfigError::EmptyList("style.palette".to_string()));
        }
        positive("style.min_width", self.style.min_width)?;
        if !(self.style.max_width >= self.style.min_width) {
            return Err(out_of_range("style.max_width", self.style.max_width));
        }
        if !(self.style.min_width..=self.style.max_width).contains(&self.style.default_width) {
            return Err(out_of_range(
                "style.default_width",
                self.style.default_width,
            ));
        }

        // Playback
        if self.playback.speed_options.is_empty() {
            return Err(ConfigError::EmptyList(
                "playback.speed_options".to_string(),
            ));
        }
        for rate in &self.playback.speed_options {
            positive("playback.speed_options", *rate)?;
        }
        positive("playback.default_speed", self.playback.default_speed)?;
        positive("playback.seek_step", self.playback.seek_step)?;

        // View
        positive("view.min_zoom", self.view.min_zoom)?;
        if !(self.view.max_zoom >= self.view.min_zoom) || !self.view.max_zoom.is_finite() {
            return Err(out_of_range("view.max_zoom", self.view.max_zoom));
        }
        positive("view.zoom_step", self.view.zoom_step)?;

        // Snapshot
        for (key, blur) in [
            ("export.live_blur_px", self.export.live_blur_px),
            ("export.export_blur_px", self.export.export_blur_px),
        ] {
            if !(blur.is_finite() && blur >= 0.0) {
                return Err(out_of_range(key, blur));
            }
        }
        if !(1..=100).contains(&self.export.jpeg_quality) {
            return Err(out_of_range(
                "export.jpeg_quality",
                self.export.jpeg_quality,
            ));
        }
        if self.export.file_prefix.trim().is_empty() {
            return Err(out_of_range("export.file_prefix", "\"\""));
        }

        Ok(())
    }

    /// Platform config directory for FrameKit, e.g. `~/.config/framekit`.
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Default config file location.
    pub fn default_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Loads the config at `path`, or the defaults when it is missing or
    /// unreadable.
    pub fn load_or_default_from(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), "Ignoring config file: {}", e);
                Self::default()
            }
        }
    }

    /// Loads the config from [`Config::default_path`].
    pub fn load_or_default() -> Self {
        match Self::default_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                warn!("{}", e);
                Self::default()
            }
        }
    }
}
