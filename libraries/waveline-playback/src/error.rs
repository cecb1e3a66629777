//! Error types for playback management

use crate::types::TrackId;
use thiserror::Error;

/// A backend track record could not be turned into a [`Track`](crate::Track)
///
/// Callers building a collection drop the record and keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// Record is not a JSON object
    #[error("Track record is not an object")]
    NotAnObject,

    /// No id field in the record or its nested details
    #[error("Track record has no id")]
    MissingId,

    /// Id present but not coercible to an integer
    #[error("Track id is not an integer: {0}")]
    InvalidId(String),
}

/// The media layer rejected a load or play request
///
/// Never fatal: the store forces `is_playing` off and keeps the track selected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// `play()` was rejected (autoplay policy, decode error)
    #[error("Playback rejected for track {track_id}: {reason}")]
    PlayRejected { track_id: TrackId, reason: String },

    /// Source could not be loaded
    #[error("Failed to load track {track_id}: {reason}")]
    LoadFailed { track_id: TrackId, reason: String },

    /// Track has no streamable URL
    #[error("Track {0} has no audio URL")]
    NoAudioUrl(TrackId),
}

impl PlaybackError {
    /// Track the failure belongs to
    pub fn track_id(&self) -> TrackId {
        match self {
            PlaybackError::PlayRejected { track_id, .. }
            | PlaybackError::LoadFailed { track_id, .. } => *track_id,
            PlaybackError::NoAudioUrl(track_id) => *track_id,
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
