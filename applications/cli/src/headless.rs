/// Media collaborators that log instead of producing sound
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info};
use waveline_playback::TrackId;
use waveline_session::{
    MediaElement, MediaEvent, MediaFailure, MediaSession, SessionMetadata, SessionPlaybackState,
};

/// Media element that confirms every load immediately
pub struct HeadlessMedia {
    events: mpsc::Sender<MediaEvent>,
}

impl HeadlessMedia {
    pub fn new(events: mpsc::Sender<MediaEvent>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl MediaElement for HeadlessMedia {
    async fn load(&self, track_id: TrackId, url: &str) -> Result<(), MediaFailure> {
        debug!(track_id = %track_id, url, "Loading");
        self.events
            .send(MediaEvent::Loaded(track_id))
            .await
            .map_err(|e| MediaFailure(e.to_string()))
    }

    async fn play(&self) -> Result<(), MediaFailure> {
        debug!("Play");
        Ok(())
    }

    async fn pause(&self) {
        debug!("Pause");
    }

    async fn seek(&self, position_secs: f64) {
        debug!(position_secs, "Seek");
    }
}

/// Media session that logs now-playing changes
pub struct LoggingSession;

impl MediaSession for LoggingSession {
    fn set_metadata(&self, metadata: Option<SessionMetadata>) {
        if let Some(metadata) = metadata {
            info!(title = %metadata.title, artist = %metadata.artist, "Now playing");
        }
    }

    fn set_playback_state(&self, state: SessionPlaybackState) {
        debug!(?state, "Session state");
    }
}
