//! Pomodoro Widget Library
//!
//! This library provides the core functionality for the Pomodoro widget.
//! It includes:
//! - Countdown engine with focus/short break/long break cycling
//! - Display projection of the countdown (clock and progress ring)
//! - Background music delegate over an external media player
//! - Streak sharing to X and Instagram with a clipboard fallback
//! - Persisted dark-mode preference
//! - Completion chime
//! - Interactive terminal front end

pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod music;
pub mod preferences;
pub mod share;
pub mod sound;
pub mod timer;
pub mod types;
pub mod view;

// Re-export commonly used types for convenience
pub use types::{DurationConfig, Mode, MusicState, Theme, TimerState, TrackId, Volume};

pub use controller::{CaptureJob, Reaction, TimerController, UiAction, WidgetEvent};

// Re-export timer types
pub use timer::{IntervalTicker, MockTickSource, Tick, TickSource, TimerEngine, TimerEvent};

// Re-export music types
pub use music::{
    MediaPlayer, MockPlayerFactory, MusicDelegate, MusicError, PlayerEvent, PlayerFactory,
    PlayerState, RodioPlayerFactory, TrackCatalog,
};

// Re-export share types
pub use share::{
    ClipboardError, ClipboardWriter, ImageShareOutcome, MockClipboard, MockScreenCapture,
    MockUrlOpener, ScreenCapture, ShareComposer, ShareError, UrlOpener,
};

// Re-export preference types
pub use preferences::{JsonPreferenceStore, MemoryPreferenceStore, PreferenceStore};

// Re-export sound types
pub use sound::{MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource};

pub use view::{DisplayProjection, ShareChoice, ShareDialog, WidgetView};
