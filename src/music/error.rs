//! Music playback error types.

use thiserror::Error;

/// Errors raised by the media player behind the music delegate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MusicError {
    /// Audio device is not available.
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// The track id is not in the catalog.
    #[error("unknown track '{0}'")]
    UnknownTrack(String),

    /// The track file could not be opened.
    #[error("failed to open track file: {0}")]
    FileOpen(String),

    /// The track file could not be decoded.
    #[error("failed to decode track: {0}")]
    Decode(String),

    /// The player could not be constructed.
    #[error("failed to construct player: {0}")]
    Construct(String),
}

impl MusicError {
    /// Returns true if the error concerns the selected track rather than
    /// the audio system.
    #[must_use]
    pub fn is_track_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownTrack(_) | Self::FileOpen(_) | Self::Decode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MusicError::UnknownTrack("jazz".to_string());
        assert_eq!(err.to_string(), "unknown track 'jazz'");

        let err = MusicError::DeviceNotAvailable("no output".to_string());
        assert!(err.to_string().contains("no output"));
    }

    #[test]
    fn test_is_track_error() {
        assert!(MusicError::UnknownTrack("x".into()).is_track_error());
        assert!(MusicError::FileOpen("x".into()).is_track_error());
        assert!(MusicError::Decode("x".into()).is_track_error());
        assert!(!MusicError::DeviceNotAvailable("x".into()).is_track_error());
        assert!(!MusicError::Construct("x".into()).is_track_error());
    }
}
