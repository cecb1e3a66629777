//! Media element bridge
//!
//! Connects the store to whatever actually produces sound. Store events
//! drive the element (load, play, pause); element events feed back into the
//! store (loaded, ended, error).

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use waveline_playback::{
    PlaybackError, PlaybackEvent, PlaybackStore, RepeatMode, Subscription, TrackId,
};

/// The media element refused a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MediaFailure(pub String);

/// Something that plays audio from a URL
#[async_trait]
pub trait MediaElement: Send + Sync {
    /// Point the element at a new source; completion is reported as
    /// [`MediaEvent::Loaded`]
    async fn load(&self, track_id: TrackId, url: &str) -> Result<(), MediaFailure>;

    /// Start or resume; may be rejected (autoplay policy, decode error)
    async fn play(&self) -> Result<(), MediaFailure>;

    async fn pause(&self);

    async fn seek(&self, position_secs: f64);
}

/// Notifications from the media element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    Loaded(TrackId),
    Ended,
    Error { track_id: TrackId, message: String },
}

/// Channel for a media element to report [`MediaEvent`]s on
pub fn media_event_channel() -> (mpsc::Sender<MediaEvent>, mpsc::Receiver<MediaEvent>) {
    mpsc::channel(64)
}

/// Drives a [`MediaElement`] from store events and feeds its events back
pub struct MediaBridge {
    store: PlaybackStore,
    media: Arc<dyn MediaElement>,
    store_events: mpsc::UnboundedReceiver<PlaybackEvent>,
    media_events: mpsc::Receiver<MediaEvent>,
    _subscription: Subscription,
}

impl MediaBridge {
    pub fn new(
        store: PlaybackStore,
        media: Arc<dyn MediaElement>,
        media_events: mpsc::Receiver<MediaEvent>,
    ) -> Self {
        let (tx, store_events) = mpsc::unbounded_channel();
        let subscription = store.subscribe(move |event, _state| {
            // Receiver gone means the bridge is shutting down
            let _ = tx.send(event.clone());
        });

        Self {
            store,
            media,
            store_events,
            media_events,
            _subscription: subscription,
        }
    }

    /// Process events until the media element's channel closes
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(event) = self.store_events.recv() => self.on_playback_event(event).await,
                media_event = self.media_events.recv() => match media_event {
                    Some(event) => self.on_media_event(event).await,
                    None => break,
                },
            }
        }
        debug!("Media bridge stopped");
    }

    /// Process everything already queued on both sides, without waiting
    ///
    /// Handling one event may queue more (a load confirmation, a follow-up
    /// track change); those are processed too.
    pub async fn drain(&mut self) {
        loop {
            if let Ok(event) = self.store_events.try_recv() {
                self.on_playback_event(event).await;
            } else if let Ok(event) = self.media_events.try_recv() {
                self.on_media_event(event).await;
            } else {
                break;
            }
        }
    }

    async fn on_playback_event(&self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::TrackChanged { track_id, .. } => {
                if self.store.snapshot().current_track_id() == Some(track_id) {
                    self.load(track_id).await;
                } else {
                    debug!(track_id = %track_id, "Skipping load of superseded track");
                }
            }
            // Act on the latest state; queued events may be stale
            PlaybackEvent::PlayingChanged { .. } | PlaybackEvent::QueueCleared => {
                if self.store.snapshot().is_playing() {
                    self.play().await;
                } else {
                    self.media.pause().await;
                }
            }
            _ => {}
        }
    }

    async fn on_media_event(&self, event: MediaEvent) {
        match event {
            MediaEvent::Loaded(track_id) => {
                self.store.track_loaded(track_id);
            }
            MediaEvent::Ended => {
                if self.store.snapshot().repeat_mode() == RepeatMode::One {
                    debug!("Repeating current track");
                    self.media.seek(0.0).await;
                    self.play().await;
                } else {
                    self.store.play_next();
                }
            }
            MediaEvent::Error { track_id, message } => {
                warn!(track_id = %track_id, error = %message, "Media element error");
                self.store.playback_failed(PlaybackError::LoadFailed {
                    track_id,
                    reason: message,
                });
            }
        }
    }

    async fn load(&self, track_id: TrackId) {
        let state = self.store.snapshot();
        let Some(track) = state.queue().find(track_id) else {
            warn!(track_id = %track_id, "Current track is not queued, nothing to load");
            drop(state);
            self.media.pause().await;
            self.store.playback_failed(PlaybackError::NoAudioUrl(track_id));
            return;
        };
        let Some(url) = track.audio_url.clone() else {
            warn!(track_id = %track_id, "Track has no audio URL");
            self.store.playback_failed(PlaybackError::NoAudioUrl(track_id));
            return;
        };
        drop(state);

        if let Err(failure) = self.media.load(track_id, &url).await {
            warn!(track_id = %track_id, error = %failure, "Failed to load track");
            self.store.playback_failed(PlaybackError::LoadFailed {
                track_id,
                reason: failure.0,
            });
            return;
        }

        if self.store.snapshot().is_playing() {
            self.play().await;
        }
    }

    async fn play(&self) {
        let Some(track_id) = self.store.snapshot().current_track_id() else {
            return;
        };
        if let Err(failure) = self.media.play().await {
            warn!(track_id = %track_id, error = %failure, "Playback rejected");
            self.store.playback_failed(PlaybackError::PlayRejected {
                track_id,
                reason: failure.0,
            });
        }
    }
}
