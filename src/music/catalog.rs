//! Catalog of background tracks.
//!
//! Maps the opaque track ids shown to the user onto something the
//! player can actually load.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::TrackId;

/// Where a track's audio comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackSource {
    /// An audio file decoded by rodio (wav, mp3, ogg, flac).
    File { path: PathBuf },
    /// A synthesized tone of fixed length.
    Tone { frequency_hz: f32, seconds: u32 },
}

/// One selectable track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub id: TrackId,
    pub title: String,
    pub source: TrackSource,
}

impl TrackEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>, source: TrackSource) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            source,
        }
    }
}

/// Ordered list of tracks offered by the track selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackCatalog {
    tracks: Vec<TrackEntry>,
}

impl Default for TrackCatalog {
    fn default() -> Self {
        Self::new(vec![
            TrackEntry::new(
                "calm-drone",
                "Calm Drone",
                TrackSource::Tone {
                    frequency_hz: 174.0,
                    seconds: 120,
                },
            ),
            TrackEntry::new(
                "deep-drone",
                "Deep Drone",
                TrackSource::Tone {
                    frequency_hz: 110.0,
                    seconds: 120,
                },
            ),
            TrackEntry::new(
                "focus-hum",
                "Focus Hum",
                TrackSource::Tone {
                    frequency_hz: 220.0,
                    seconds: 90,
                },
            ),
        ])
    }
}

impl TrackCatalog {
    pub fn new(tracks: Vec<TrackEntry>) -> Self {
        Self { tracks }
    }

    pub fn get(&self, id: &TrackId) -> Option<&TrackEntry> {
        self.tracks.iter().find(|track| &track.id == id)
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.get(id).is_some()
    }

    /// The track selected when nothing else is configured.
    pub fn first(&self) -> Option<&TrackEntry> {
        self.tracks.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackEntry> {
        self.tracks.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
