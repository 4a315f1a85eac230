//! Errors raised while playing the completion chime.
//!
//! A missing audio device must never stop the countdown, so the caller
//! logs these and moves on.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SoundError {
    #[error("no audio output device: {0}")]
    NoDevice(String),

    #[error("cannot open sound file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode sound file {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("cannot open an output sink: {0}")]
    Output(String),
}

impl SoundError {
    /// True when the configured file is at fault and the synthesized chime
    /// can stand in for it.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::Decode { .. })
    }
}
