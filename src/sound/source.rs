//! Sound source selection.
//!
//! The completion sound is either an audio file chosen by the user or a
//! chime synthesized at playback time.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::source::{SineWave, Source};

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// An audio file on disk.
    File {
        /// Display name (the file stem).
        name: String,
        /// Full path to the file.
        path: PathBuf,
    },
    /// The built-in two-tone chime.
    Chime,
}

impl SoundSource {
    /// Creates a file source named after the file stem.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::File { name, path }
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } => name,
            Self::Chime => "chime",
        }
    }
}

/// Returns the completion sound for an optional configured file.
#[must_use]
pub fn completion_sound(path: Option<&Path>) -> SoundSource {
    match path {
        Some(path) => SoundSource::file(path),
        None => SoundSource::Chime,
    }
}

/// Builds the chime: a high note followed by a lower one.
pub(crate) fn chime() -> impl Source<Item = f32> + Send + 'static {
    let note = Duration::from_millis(220);
    let high = SineWave::new(880.0).take_duration(note).amplify(0.25);
    let low = SineWave::new(660.0)
        .take_duration(note * 2)
        .amplify(0.25)
        .delay(note);
    high.mix(low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_source_uses_stem_as_name() {
        let source = SoundSource::file("/sounds/bell.wav");
        assert_eq!(source.name(), "bell");
        assert!(matches!(
            source,
            SoundSource::File { ref path, .. } if path == Path::new("/sounds/bell.wav")
        ));
    }

    #[test]
    fn test_chime_name() {
        assert_eq!(SoundSource::Chime.name(), "chime");
    }

    #[test]
    fn test_completion_sound() {
        assert_eq!(completion_sound(None), SoundSource::Chime);
        assert_eq!(
            completion_sound(Some(Path::new("/a/done.ogg"))).name(),
            "done"
        );
    }

    #[test]
    fn test_chime_is_finite() {
        let samples = chime().count();
        assert!(samples > 0);
        assert!(samples < 200_000);
    }
}
