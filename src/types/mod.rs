//! Core data types for the Pomodoro widget.
//!
//! This module defines the data structures used for:
//! - Timer modes and their durations
//! - Countdown state
//! - Background music state
//! - Display theme

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Mode
// ============================================================================

/// The interval the widget is currently counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// A work interval, counted toward the session total
    Focus,
    /// A short rest between focus sessions
    ShortBreak,
    /// A long rest after every few focus sessions
    LongBreak,
}

impl Mode {
    /// All modes in display order.
    pub const ALL: [Mode; 3] = [Mode::Focus, Mode::ShortBreak, Mode::LongBreak];

    /// Returns the wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::ShortBreak => "shortBreak",
            Mode::LongBreak => "longBreak",
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Focus => "Focus",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Focus
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" | "pomodoro" => Ok(Mode::Focus),
            "shortBreak" | "short" => Ok(Mode::ShortBreak),
            "longBreak" | "long" => Ok(Mode::LongBreak),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

// ============================================================================
// DurationConfig
// ============================================================================

fn default_focus_minutes() -> u32 {
    25
}

fn default_short_break_minutes() -> u32 {
    5
}

fn default_long_break_minutes() -> u32 {
    15
}

fn default_long_break_interval() -> u32 {
    4
}

/// Durations for each mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationConfig {
    /// Focus duration in minutes (1-120)
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    /// Short break duration in minutes (1-60)
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    /// Long break duration in minutes (1-60)
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    /// A long break follows every this-many focus sessions
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_interval: default_long_break_interval(),
        }
    }
}

impl DurationConfig {
    /// Sets the focus duration.
    pub fn with_focus_minutes(mut self, minutes: u32) -> Self {
        self.focus_minutes = minutes;
        self
    }

    /// Sets the short break duration.
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_minutes = minutes;
        self
    }

    /// Sets the long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = minutes;
        self
    }

    /// Returns the full length of `mode` in seconds.
    pub fn seconds(&self, mode: Mode) -> u32 {
        let minutes = match mode {
            Mode::Focus => self.focus_minutes,
            Mode::ShortBreak => self.short_break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        };
        minutes * 60
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.focus_minutes < 1 || self.focus_minutes > 120 {
            return Err("focus duration must be between 1 and 120 minutes".to_string());
        }
        if self.short_break_minutes < 1 || self.short_break_minutes > 60 {
            return Err("short break duration must be between 1 and 60 minutes".to_string());
        }
        if self.long_break_minutes < 1 || self.long_break_minutes > 60 {
            return Err("long break duration must be between 1 and 60 minutes".to_string());
        }
        if self.long_break_interval < 1 {
            return Err("long break interval must be at least 1".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Countdown state of the widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    /// Active mode
    pub mode: Mode,
    /// Seconds left in the active mode
    pub remaining_seconds: u32,
    /// Whether the countdown is ticking
    pub running: bool,
    /// Completed focus sessions since start-up
    pub completed_focus_sessions: u32,
    /// Durations the state was built from
    pub durations: DurationConfig,
}

impl TimerState {
    /// Creates an idle state in focus mode with a full countdown.
    pub fn new(durations: DurationConfig) -> Self {
        Self {
            mode: Mode::Focus,
            remaining_seconds: durations.seconds(Mode::Focus),
            running: false,
            completed_focus_sessions: 0,
            durations,
        }
    }

    /// Full length of the active mode in seconds.
    pub fn full_duration(&self) -> u32 {
        self.durations.seconds(self.mode)
    }

    /// Stops the countdown and refills it for the active mode.
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_seconds = self.full_duration();
    }

    /// Switches to `mode` and resets. Never starts the countdown.
    pub fn select_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.reset();
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the countdown has reached 0.
    pub fn tick(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds == 0
    }

    /// Returns the mode that follows a completed `self.mode`.
    ///
    /// Must be called after the session count has been updated.
    pub fn next_mode(&self) -> Mode {
        match self.mode {
            Mode::Focus => {
                if self.completed_focus_sessions % self.durations.long_break_interval == 0 {
                    Mode::LongBreak
                } else {
                    Mode::ShortBreak
                }
            }
            Mode::ShortBreak | Mode::LongBreak => Mode::Focus,
        }
    }
}

// ============================================================================
// Music Types
// ============================================================================

/// Opaque identifier of a background track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Playback volume, 0 to 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Volume(u8);

impl Volume {
    pub const MAX: u8 = 100;

    /// Returns the volume as an integer percentage.
    pub fn get(&self) -> u8 {
        self.0
    }

    /// Returns the volume as a linear gain in `[0.0, 1.0]`.
    pub fn gain(&self) -> f32 {
        f32::from(self.0) / f32::from(Self::MAX)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Volume(50)
    }
}

impl TryFrom<u8> for Volume {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            return Err(format!("volume must be between 0 and {}", Self::MAX));
        }
        Ok(Volume(value))
    }
}

impl From<Volume> for u8 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}

/// Background music state. Survives timer resets and mode switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicState {
    /// Track currently selected
    pub selected_track: TrackId,
    /// Playback volume
    pub volume: Volume,
    /// Whether music is playing, as last observed when toggling
    pub playing: bool,
}

impl MusicState {
    pub fn new(selected_track: TrackId, volume: Volume) -> Self {
        Self {
            selected_track,
            volume,
            playing: false,
        }
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Colour theme of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
