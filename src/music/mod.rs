//! Background music for the Pomodoro widget.
//!
//! The [`MusicDelegate`] mediates every interaction with an external media
//! player. The player is built lazily on first use by a [`PlayerFactory`],
//! and reports back through [`PlayerEvent`]s that the controller routes to
//! [`MusicDelegate::handle_event`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  construct   ┌──────────────────┐
//! │  MusicDelegate   │─────────────▶│  PlayerFactory   │
//! └────────┬─────────┘              └────────┬─────────┘
//!          │ play/pause/load/volume          │ builds
//!          ▼                                 ▼
//! ┌──────────────────┐  PlayerEvent ┌──────────────────┐
//! │   MediaPlayer    │─────────────▶│ controller queue │
//! └──────────────────┘              └──────────────────┘
//! ```

pub mod catalog;
mod error;
mod mock;
mod player;

use tracing::{debug, info};

use crate::types::{MusicState, TrackId, Volume};

pub use catalog::{TrackCatalog, TrackEntry, TrackSource};
pub use error::MusicError;
pub use mock::{MockMediaPlayer, MockPlayerFactory, PlayerCall};
pub use player::{RodioMediaPlayer, RodioPlayerFactory};

// ============================================================================
// Player Contract
// ============================================================================

/// Playback state as reported by the external player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Unstarted,
    Buffering,
    Playing,
    Paused,
    Ended,
}

impl PlayerState {
    /// Returns true if the player is producing (or about to produce) sound.
    pub fn is_playing(&self) -> bool {
        matches!(self, PlayerState::Playing | PlayerState::Buffering)
    }
}

/// Notifications sent by the external player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The player finished constructing and accepts commands.
    Ready,
    /// The player's playback state changed.
    StateChanged(PlayerState),
}

/// An external media player used as an audio source.
pub trait MediaPlayer {
    fn play(&mut self);

    fn pause(&mut self);

    /// Loads `track` and starts it, as an embedded player does.
    fn load_by_id(&mut self, track: &TrackId) -> Result<(), MusicError>;

    fn set_volume(&mut self, volume: Volume);

    /// The player's own view of its playback state.
    fn state(&self) -> PlayerState;
}

/// Builds media players on demand.
pub trait PlayerFactory {
    type Player: MediaPlayer;

    /// Constructs a player cued to `track`, not yet playing.
    fn construct(&mut self, track: &TrackId, volume: Volume) -> Result<Self::Player, MusicError>;
}

// ============================================================================
// MusicDelegate
// ============================================================================

/// Wraps the external player and keeps the local music state.
pub struct MusicDelegate<F: PlayerFactory> {
    factory: F,
    player: Option<F::Player>,
    state: MusicState,
}

impl<F: PlayerFactory> MusicDelegate<F> {
    pub fn new(factory: F, state: MusicState) -> Self {
        Self {
            factory,
            player: None,
            state,
        }
    }

    pub fn state(&self) -> &MusicState {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.player.is_some()
    }

    /// Constructs the player bound to the selected track, once.
    pub fn initialize(&mut self) -> Result<(), MusicError> {
        if self.player.is_some() {
            return Ok(());
        }

        let player = self
            .factory
            .construct(&self.state.selected_track, self.state.volume)?;
        info!(track = %self.state.selected_track, "music player constructed");
        self.player = Some(player);
        Ok(())
    }

    /// Flips play/pause, constructing and starting the player on first use.
    pub fn toggle(&mut self) -> Result<(), MusicError> {
        if self.player.is_none() {
            self.initialize()?;
            if let Some(player) = self.player.as_mut() {
                player.play();
            }
            self.state.playing = true;
            return Ok(());
        }

        if let Some(player) = self.player.as_mut() {
            // Trust the player's own state at the moment of the toggle.
            let was_playing = player.state().is_playing();
            if was_playing {
                player.pause();
            } else {
                player.play();
            }
            self.state.playing = !was_playing;
        }
        Ok(())
    }

    pub fn set_volume(&mut self, volume: Volume) {
        self.state.volume = volume;
        if let Some(player) = self.player.as_mut() {
            player.set_volume(volume);
        }
    }

    /// Selects a new track. Paused music stays paused after the load.
    ///
    /// The selection only changes once the player accepted the track.
    pub fn change_track(&mut self, track: TrackId) -> Result<(), MusicError> {
        let Some(player) = self.player.as_mut() else {
            let previous = std::mem::replace(&mut self.state.selected_track, track);
            return self.initialize().inspect_err(|_| {
                self.state.selected_track = previous;
            });
        };

        player.load_by_id(&track)?;
        if !self.state.playing {
            player.pause();
        }
        info!(%track, "music track changed");
        self.state.selected_track = track;
        Ok(())
    }

    /// Applies a notification from the player.
    pub fn handle_event(&mut self, event: PlayerEvent) {
        let Some(player) = self.player.as_mut() else {
            debug!(?event, "player event before construction ignored");
            return;
        };

        match event {
            PlayerEvent::Ready => {
                player.set_volume(self.state.volume);
                if self.state.playing {
                    player.play();
                } else {
                    player.pause();
                }
            }
            PlayerEvent::StateChanged(PlayerState::Ended) => {
                debug!(track = %self.state.selected_track, "track ended, looping");
                player.play();
            }
            PlayerEvent::StateChanged(state) => {
                debug!(?state, "player state changed");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
