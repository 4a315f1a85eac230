//! Media player implementation using rodio.
//!
//! Each player owns its own output stream and a single sink. A watcher
//! task polls the sink and reports end-of-track on the event channel
//! registered with the factory.

use std::fs::File;
use std::io::BufReader;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, Sink, Source};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::catalog::{TrackCatalog, TrackSource};
use super::{MediaPlayer, MusicError, PlayerEvent, PlayerFactory, PlayerState};
use crate::types::{TrackId, Volume};

/// How often the watcher checks whether the track has finished.
const END_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Gain applied to synthesized tones so they sit under the user's work.
const TONE_GAIN: f32 = 0.2;

type BoxedSource = Box<dyn Source<Item = f32> + Send>;

/// Builds [`RodioMediaPlayer`]s bound to a catalog and an event channel.
#[derive(Debug, Clone)]
pub struct RodioPlayerFactory {
    catalog: TrackCatalog,
    events: mpsc::UnboundedSender<PlayerEvent>,
}

impl RodioPlayerFactory {
    pub fn new(catalog: TrackCatalog, events: mpsc::UnboundedSender<PlayerEvent>) -> Self {
        Self { catalog, events }
    }
}

impl PlayerFactory for RodioPlayerFactory {
    type Player = RodioMediaPlayer;

    fn construct(&mut self, track: &TrackId, volume: Volume) -> Result<RodioMediaPlayer, MusicError> {
        RodioMediaPlayer::new(self.catalog.clone(), track, volume, self.events.clone())
    }
}

/// A media player that plays catalog tracks through rodio.
///
/// Must be constructed inside a tokio runtime.
pub struct RodioMediaPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    sink: Arc<Sink>,
    catalog: TrackCatalog,
    current: TrackId,
    /// Set while a loaded track has not yet been reported as ended.
    armed: Arc<AtomicBool>,
    watcher: JoinHandle<()>,
}

impl RodioMediaPlayer {
    fn new(
        catalog: TrackCatalog,
        track: &TrackId,
        volume: Volume,
        events: mpsc::UnboundedSender<PlayerEvent>,
    ) -> Result<Self, MusicError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| MusicError::DeviceNotAvailable(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| MusicError::Construct(e.to_string()))?;
        sink.set_volume(volume.gain());

        let sink = Arc::new(sink);
        let armed = Arc::new(AtomicBool::new(false));
        let watcher = spawn_end_watcher(Arc::clone(&sink), Arc::clone(&armed), events.clone());

        let mut player = Self {
            _stream: stream,
            sink,
            catalog,
            current: track.clone(),
            armed,
            watcher,
        };
        player.cue(track)?;
        player.sink.pause();

        // Nothing else to wait for; the receiver may already be gone on shutdown.
        let _ = events.send(PlayerEvent::Ready);
        Ok(player)
    }

    /// Replaces the sink's contents with `track`. Leaves the sink paused.
    fn cue(&mut self, track: &TrackId) -> Result<(), MusicError> {
        let entry = self
            .catalog
            .get(track)
            .ok_or_else(|| MusicError::UnknownTrack(track.to_string()))?;
        let source = open_source(&entry.source)?;

        self.armed.store(false, Ordering::SeqCst);
        self.sink.clear();
        self.sink.append(source);
        self.armed.store(true, Ordering::SeqCst);
        self.current = track.clone();

        debug!(track = %track, "track cued");
        Ok(())
    }
}

impl MediaPlayer for RodioMediaPlayer {
    fn play(&mut self) {
        if self.sink.empty() {
            let current = self.current.clone();
            if let Err(e) = self.cue(&current) {
                error!("failed to restart track '{}': {}", current, e);
                return;
            }
        }
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn load_by_id(&mut self, track: &TrackId) -> Result<(), MusicError> {
        self.cue(track)?;
        self.sink.play();
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) {
        self.sink.set_volume(volume.gain());
    }

    fn state(&self) -> PlayerState {
        if self.sink.empty() {
            PlayerState::Ended
        } else if self.sink.is_paused() {
            PlayerState::Paused
        } else {
            PlayerState::Playing
        }
    }
}

impl Drop for RodioMediaPlayer {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

impl std::fmt::Debug for RodioMediaPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioMediaPlayer")
            .field("current", &self.current)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn open_source(source: &TrackSource) -> Result<BoxedSource, MusicError> {
    match source {
        TrackSource::File { path } => {
            let file = File::open(path)
                .map_err(|e| MusicError::FileOpen(format!("{}: {}", path.display(), e)))?;
            let decoder = Decoder::new(BufReader::new(file))
                .map_err(|e| MusicError::Decode(e.to_string()))?;
            Ok(Box::new(decoder.convert_samples::<f32>()))
        }
        TrackSource::Tone {
            frequency_hz,
            seconds,
        } => Ok(Box::new(
            SineWave::new(*frequency_hz)
                .take_duration(Duration::from_secs(u64::from(*seconds)))
                .amplify(TONE_GAIN),
        )),
    }
}

fn spawn_end_watcher(
    sink: Arc<Sink>,
    armed: Arc<AtomicBool>,
    events: mpsc::UnboundedSender<PlayerEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut poll = tokio::time::interval(END_POLL_INTERVAL);
        loop {
            poll.tick().await;
            if sink.empty() && armed.swap(false, Ordering::SeqCst) {
                let ended = PlayerEvent::StateChanged(PlayerState::Ended);
                if events.send(ended).is_err() {
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_tone_source() {
        let source = open_source(&TrackSource::Tone {
            frequency_hz: 220.0,
            seconds: 1,
        })
        .unwrap();
        assert_eq!(source.channels(), 1);
    }

    #[test]
    fn test_open_missing_file() {
        let result = open_source(&TrackSource::File {
            path: "/nonexistent/rain.ogg".into(),
        });
        assert!(matches!(result, Err(MusicError::FileOpen(_))));
    }

    #[test]
    fn test_open_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.wav");
        std::fs::write(&path, b"not audio at all").unwrap();

        let result = open_source(&TrackSource::File { path });
        assert!(matches!(result, Err(MusicError::Decode(_))));
    }

    #[tokio::test]
    async fn test_construct_unknown_track() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut factory = RodioPlayerFactory::new(TrackCatalog::default(), tx);

        match factory.construct(&TrackId::new("jazz"), Volume::default()) {
            // No audio device in this environment.
            Err(MusicError::DeviceNotAvailable(_)) => {}
            Err(e) => assert_eq!(e, MusicError::UnknownTrack("jazz".to_string())),
            Ok(_) => panic!("unknown track must not construct"),
        }
    }

    #[tokio::test]
    async fn test_construct_reports_ready_and_stays_paused() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut factory = RodioPlayerFactory::new(TrackCatalog::default(), tx);

        let player = match factory.construct(&TrackId::new("calm-drone"), Volume::default()) {
            Ok(player) => player,
            Err(_) => return,
        };

        assert_eq!(rx.try_recv().unwrap(), PlayerEvent::Ready);
        assert_eq!(player.state(), PlayerState::Paused);
    }
}
