//! In-memory media player for tests.

use std::sync::{Arc, Mutex};

use super::{MediaPlayer, MusicError, PlayerFactory, PlayerState};
use crate::types::{TrackId, Volume};

/// A command received by the mock player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCall {
    Play,
    Pause,
    Load(TrackId),
    SetVolume(u8),
}

#[derive(Debug)]
struct MockPlayerLog {
    constructed: Vec<TrackId>,
    calls: Vec<PlayerCall>,
    reported: PlayerState,
    fail_construct: bool,
    fail_load: bool,
}

impl Default for MockPlayerLog {
    fn default() -> Self {
        Self {
            constructed: Vec::new(),
            calls: Vec::new(),
            reported: PlayerState::Unstarted,
            fail_construct: false,
            fail_load: false,
        }
    }
}

/// Factory for [`MockMediaPlayer`]s. Clones share the same log, so a test
/// can keep one clone and inspect what the delegate did.
#[derive(Debug, Clone, Default)]
pub struct MockPlayerFactory {
    log: Arc<Mutex<MockPlayerLog>>,
}

impl MockPlayerFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_construct(&self, fail: bool) {
        self.log.lock().unwrap().fail_construct = fail;
    }

    pub fn set_fail_load(&self, fail: bool) {
        self.log.lock().unwrap().fail_load = fail;
    }

    /// Overrides the state the player reports, as if it changed on its own.
    pub fn set_reported_state(&self, state: PlayerState) {
        self.log.lock().unwrap().reported = state;
    }

    #[must_use]
    pub fn reported_state(&self) -> PlayerState {
        self.log.lock().unwrap().reported
    }

    /// Tracks each constructed player was bound to.
    #[must_use]
    pub fn constructed(&self) -> Vec<TrackId> {
        self.log.lock().unwrap().constructed.clone()
    }

    /// Commands received by constructed players, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<PlayerCall> {
        self.log.lock().unwrap().calls.clone()
    }
}

impl PlayerFactory for MockPlayerFactory {
    type Player = MockMediaPlayer;

    fn construct(&mut self, track: &TrackId, _volume: Volume) -> Result<MockMediaPlayer, MusicError> {
        let mut log = self.log.lock().unwrap();
        if log.fail_construct {
            return Err(MusicError::Construct("mock failure".to_string()));
        }
        log.constructed.push(track.clone());
        log.reported = PlayerState::Unstarted;
        Ok(MockMediaPlayer {
            log: Arc::clone(&self.log),
        })
    }
}

/// Player built by [`MockPlayerFactory`].
#[derive(Debug)]
pub struct MockMediaPlayer {
    log: Arc<Mutex<MockPlayerLog>>,
}

impl MediaPlayer for MockMediaPlayer {
    fn play(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.calls.push(PlayerCall::Play);
        log.reported = PlayerState::Playing;
    }

    fn pause(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.calls.push(PlayerCall::Pause);
        log.reported = PlayerState::Paused;
    }

    fn load_by_id(&mut self, track: &TrackId) -> Result<(), MusicError> {
        let mut log = self.log.lock().unwrap();
        if log.fail_load {
            return Err(MusicError::UnknownTrack(track.to_string()));
        }
        log.calls.push(PlayerCall::Load(track.clone()));
        log.reported = PlayerState::Playing;
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) {
        self.log
            .lock()
            .unwrap()
            .calls
            .push(PlayerCall::SetVolume(volume.get()));
    }

    fn state(&self) -> PlayerState {
        self.log.lock().unwrap().reported
    }
}
