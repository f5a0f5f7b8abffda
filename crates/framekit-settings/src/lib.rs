//! FrameKit Settings Crate
//!
//! Loads, validates and saves the annotation and playback preferences.

pub mod config;
pub mod error;

pub use config::{Config, PlaybackSettings, SnapshotSettings, StyleSettings, ViewSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
