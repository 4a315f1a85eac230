//! Completion chime.
//!
//! Every countdown that reaches zero rings once. The sound is a configured
//! audio file or a synthesized two-tone chime.

mod error;
mod player;
mod source;

use std::sync::{Arc, Mutex};

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::{completion_sound, SoundSource};

pub trait SoundPlayer {
    /// Starts `source` and returns without waiting for it to finish.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }
}

/// Records what it was asked to play. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct MockSoundPlayer {
    played: Arc<Mutex<Vec<SoundSource>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.played.lock().unwrap().len()
    }

    #[must_use]
    pub fn played(&self) -> Vec<SoundSource> {
        self.played.lock().unwrap().clone()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if *self.should_fail.lock().unwrap() {
            return Err(SoundError::Output("mock output refused".to_string()));
        }
        self.played.lock().unwrap().push(source.clone());
        Ok(())
    }
}
