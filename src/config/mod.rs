//! Widget configuration.
//!
//! Loaded from `config.json` in the data directory. Every field is
//! optional; command-line flags are applied on top.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::music::TrackCatalog;
use crate::types::{DurationConfig, MusicState, TrackId, Volume};

const CONFIG_FILE: &str = "config.json";
const DATA_DIR_NAME: &str = ".pomodoro-widget";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Home directory not found")]
    NoHomeDir,

    #[error("Failed to read config from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default data directory, `~/.pomodoro-widget`.
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

fn default_track() -> TrackId {
    TrackId::new("calm-drone")
}

fn default_sound_enabled() -> bool {
    true
}

/// Background music settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicConfig {
    /// Track cued when the player is first built
    #[serde(default = "default_track")]
    pub default_track: TrackId,
    #[serde(default)]
    pub volume: Volume,
    /// Available tracks
    #[serde(default)]
    pub tracks: TrackCatalog,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            default_track: default_track(),
            volume: Volume::default(),
            tracks: TrackCatalog::default(),
        }
    }
}

/// Completion chime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_sound_enabled")]
    pub enabled: bool,
    /// Audio file played instead of the built-in chime
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: default_sound_enabled(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub durations: DurationConfig,
    #[serde(default)]
    pub music: MusicConfig,
    #[serde(default)]
    pub sound: SoundConfig,
}

impl WidgetConfig {
    /// Loads `config.json` from `data_dir`, or the defaults if it is absent.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path, source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.durations.validate().map_err(ConfigError::Invalid)?;
        if self.music.tracks.is_empty() {
            return Err(ConfigError::Invalid("track list must not be empty".to_string()));
        }
        if !self.music.tracks.contains(&self.music.default_track) {
            return Err(ConfigError::Invalid(format!(
                "default track '{}' is not in the track list",
                self.music.default_track
            )));
        }
        Ok(())
    }

    /// Initial music state for the delegate.
    pub fn music_state(&self) -> MusicState {
        MusicState::new(self.music.default_track.clone(), self.music.volume)
    }

    #[must_use]
    pub fn with_durations(mut self, durations: DurationConfig) -> Self {
        self.durations = durations;
        self
    }

    #[must_use]
    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.music.volume = volume;
        self
    }

    #[must_use]
    pub fn with_default_track(mut self, track: TrackId) -> Self {
        self.music.default_track = track;
        self
    }

    #[must_use]
    pub fn with_sound_enabled(mut self, enabled: bool) -> Self {
        self.sound.enabled = enabled;
        self
    }
}
