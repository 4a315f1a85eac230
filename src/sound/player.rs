//! Chime playback through rodio.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Mutex;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::{chime, SoundSource};

/// Plays completion sounds on the default output device.
///
/// Playback never blocks the caller. A chime that starts while the previous
/// one is still ringing replaces it.
pub struct RodioSoundPlayer {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    ringing: Mutex<Option<Sink>>,
}

impl RodioSoundPlayer {
    pub fn new() -> Result<Self, SoundError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| SoundError::NoDevice(e.to_string()))?;
        debug!("chime output opened");

        Ok(Self {
            _stream: stream,
            handle,
            ringing: Mutex::new(None),
        })
    }

    /// Starts `source`. An unreadable file is replaced by the chime.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        match source {
            SoundSource::Chime => self.ring(chime()),
            SoundSource::File { path, .. } => match open_file(path) {
                Ok(decoded) => {
                    debug!(sound = source.name(), "playing completion sound");
                    self.ring(decoded)
                }
                Err(e) if e.is_file_error() => {
                    warn!("{}, using the chime instead", e);
                    self.ring(chime())
                }
                Err(e) => Err(e),
            },
        }
    }

    fn ring<S>(&self, source: S) -> Result<(), SoundError>
    where
        S: Source<Item = f32> + Send + 'static,
    {
        let sink = Sink::try_new(&self.handle).map_err(|e| SoundError::Output(e.to_string()))?;
        sink.append(source);

        let mut ringing = match self.ringing.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = ringing.replace(sink) {
            previous.stop();
        }
        Ok(())
    }
}

fn open_file(path: &Path) -> Result<impl Source<Item = f32> + Send + 'static, SoundError> {
    let file = File::open(path).map_err(|source| SoundError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| SoundError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(decoder.convert_samples::<f32>())
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}

/// Opens the output device, or logs a warning and returns `None`.
#[must_use]
pub fn try_create_player() -> Option<RodioSoundPlayer> {
    RodioSoundPlayer::new()
        .map_err(|e| warn!("Completion sound disabled: {}", e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Containers usually have no output device; these return early there.

    #[test]
    fn test_chime_plays() {
        let Ok(player) = RodioSoundPlayer::new() else {
            return;
        };

        assert!(player.play(&SoundSource::Chime).is_ok());
        assert!(player.play(&SoundSource::Chime).is_ok());
    }

    #[test]
    fn test_missing_file_rings_chime() {
        let Ok(player) = RodioSoundPlayer::new() else {
            return;
        };

        let source = SoundSource::file("/nonexistent/bell.wav");
        assert!(player.play(&source).is_ok());
    }

    #[test]
    fn test_open_file_reports_missing_path() {
        let err = match open_file(Path::new("/nonexistent/bell.wav")) {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };

        assert!(matches!(err, SoundError::Open { .. }));
    }

    #[test]
    fn test_open_file_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.wav");
        std::fs::write(&path, b"not audio").unwrap();

        let err = match open_file(&path) {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };

        assert!(matches!(err, SoundError::Decode { .. }));
    }
}
