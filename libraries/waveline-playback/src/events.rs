//! Playback Events
//!
//! Every committed transition publishes the events describing what changed.
//! Subscribers (media bridge, media session, UI) react to these instead of
//! diffing snapshots.

use crate::types::{CollectionId, RepeatMode, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Queue was replaced by a new collection
    QueueReplaced {
        /// Collection now owning the queue
        collection: CollectionId,
        /// New queue length
        length: usize,
    },

    /// Queue content or order changed in place (added/removed/moved/shuffled)
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Current track id changed; the media layer should load it
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Media layer confirmed the current track loaded
    TrackLoaded {
        /// ID of the loaded track
        track_id: TrackId,
    },

    /// Transport flag changed
    PlayingChanged {
        /// New transport state
        is_playing: bool,
    },

    /// Shuffle toggled
    ShuffleChanged {
        /// Whether shuffle is now on
        enabled: bool,
    },

    /// Repeat mode changed
    RepeatChanged {
        /// New repeat mode
        mode: RepeatMode,
    },

    /// Queue emptied by clear or logout
    QueueCleared,

    /// Media layer failed on a track
    Error {
        /// Track the failure belongs to (still selected)
        track_id: Option<TrackId>,
        /// Error message
        message: String,
    },
}

impl PlaybackEvent {
    /// Whether the media session should refresh its now-playing metadata
    pub fn affects_now_playing(&self) -> bool {
        matches!(
            self,
            PlaybackEvent::QueueReplaced { .. }
                | PlaybackEvent::TrackChanged { .. }
                | PlaybackEvent::PlayingChanged { .. }
                | PlaybackEvent::QueueCleared
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_playing_relevance() {
        assert!(PlaybackEvent::QueueCleared.affects_now_playing());
        assert!(PlaybackEvent::PlayingChanged { is_playing: true }.affects_now_playing());
        assert!(!PlaybackEvent::QueueChanged { length: 3 }.affects_now_playing());
        assert!(!PlaybackEvent::RepeatChanged {
            mode: RepeatMode::All
        }
        .affects_now_playing());
    }

    #[test]
    fn events_serialize() {
        let event = PlaybackEvent::TrackChanged {
            track_id: TrackId::new(2),
            previous_track_id: Some(TrackId::new(1)),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["TrackChanged"]["track_id"], 2);
        assert_eq!(json["TrackChanged"]["previous_track_id"], 1);
    }
}
