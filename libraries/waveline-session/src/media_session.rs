//! OS media session bridge
//!
//! Mirrors now-playing state outward (lock screen, media keys overlay) and
//! forwards transport gestures back into the store.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use waveline_playback::{PlaybackStore, PlayerState, Subscription, Track};

/// Now-playing metadata shown by the OS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub title: String,
    pub artist: String,
    pub artwork_url: Option<String>,
    pub duration_seconds: u64,
}

impl From<&Track> for SessionMetadata {
    fn from(track: &Track) -> Self {
        Self {
            title: track.name.clone(),
            artist: track.artist_name.clone(),
            artwork_url: track.cover_photo_url.clone(),
            duration_seconds: track.duration_seconds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPlaybackState {
    /// Nothing selected
    None,
    Paused,
    Playing,
}

/// Transport gesture from the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaSessionAction {
    Play,
    Pause,
    NextTrack,
    PreviousTrack,
    Stop,
}

/// Platform media session
pub trait MediaSession: Send + Sync {
    fn set_metadata(&self, metadata: Option<SessionMetadata>);

    fn set_playback_state(&self, state: SessionPlaybackState);
}

/// Keeps a [`MediaSession`] in sync with the store
///
/// Dropping the bridge unsubscribes it.
pub struct MediaSessionBridge {
    store: PlaybackStore,
    _subscription: Subscription,
}

impl MediaSessionBridge {
    pub fn new(store: PlaybackStore, session: Arc<dyn MediaSession>) -> Self {
        mirror(session.as_ref(), &store.snapshot());

        let subscription = store.subscribe(move |event, state| {
            if event.affects_now_playing() {
                mirror(session.as_ref(), state);
            }
        });

        Self {
            store,
            _subscription: subscription,
        }
    }

    /// Apply a gesture from the OS
    pub fn handle_action(&self, action: MediaSessionAction) {
        debug!(?action, "Media session action");
        match action {
            MediaSessionAction::Play => {
                if self.store.snapshot().current_track_id().is_some() {
                    self.store.set_is_playing(true);
                }
            }
            // Stop pauses; the queue stays so playback can resume
            MediaSessionAction::Pause | MediaSessionAction::Stop => {
                self.store.set_is_playing(false);
            }
            MediaSessionAction::NextTrack => {
                self.store.play_next();
            }
            MediaSessionAction::PreviousTrack => {
                self.store.play_previous();
            }
        }
    }
}

fn mirror(session: &dyn MediaSession, state: &PlayerState) {
    session.set_metadata(state.current_track().map(SessionMetadata::from));

    let playback_state = if state.current_track_id().is_none() {
        SessionPlaybackState::None
    } else if state.is_playing() {
        SessionPlaybackState::Playing
    } else {
        SessionPlaybackState::Paused
    };
    session.set_playback_state(playback_state);
}
