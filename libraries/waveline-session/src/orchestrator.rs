//! Play-request orchestration
//!
//! Decides between toggling the transport and replacing the queue when the
//! user asks to play a collection, fetching records on demand.
//!
//! Requests are last-wins: every request takes a token, and a fetch that
//! completes after a newer request started is discarded without touching the
//! store.

use crate::error::{Result, SessionError};
use crate::fetcher::CollectionFetcher;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use waveline_playback::{
    normalize_collection, normalize_track, CollectionId, Command, PlaybackStore, TrackId,
};

/// A request to play a collection
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRequest {
    pub collection: CollectionId,
    /// Records already on hand; skips the fetch
    pub tracks: Option<Vec<Value>>,
    /// Track to start at; ignored if absent from the collection
    pub start: Option<TrackId>,
}

impl PlayRequest {
    pub fn new(collection: CollectionId) -> Self {
        Self {
            collection,
            tracks: None,
            start: None,
        }
    }

    #[must_use]
    pub fn with_tracks(mut self, tracks: Vec<Value>) -> Self {
        self.tracks = Some(tracks);
        self
    }

    #[must_use]
    pub fn starting_at(mut self, start: TrackId) -> Self {
        self.start = Some(start);
        self
    }
}

/// What a play request did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Collection was already active; transport flipped
    Toggled { is_playing: bool },

    /// Queue replaced and playback started
    Replaced {
        collection: CollectionId,
        length: usize,
        start: TrackId,
    },

    /// A newer request started while this one was fetching
    Superseded,
}

/// Turns play requests into store commands
pub struct PlaybackOrchestrator {
    store: PlaybackStore,
    fetcher: Arc<dyn CollectionFetcher>,
    latest_request: AtomicU64,
}

impl PlaybackOrchestrator {
    pub fn new(store: PlaybackStore, fetcher: Arc<dyn CollectionFetcher>) -> Self {
        Self {
            store,
            fetcher,
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &PlaybackStore {
        &self.store
    }

    /// Play a collection
    ///
    /// If the collection is already active with a current track, toggles
    /// `is_playing`. Otherwise fetches (exactly once, and only when no
    /// records were supplied), normalizes, and commits replace + select +
    /// play as one transition. Any failure leaves the store untouched.
    pub async fn play_collection(&self, request: PlayRequest) -> Result<PlayOutcome> {
        let token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        let PlayRequest {
            collection,
            tracks,
            start,
        } = request;

        let state = self.store.snapshot();
        if state.active_collection() == Some(&collection) && state.current_track_id().is_some() {
            let is_playing = !state.is_playing();
            debug!(collection = %collection, is_playing, "Toggling active collection");
            self.store.set_is_playing(is_playing);
            return Ok(PlayOutcome::Toggled { is_playing });
        }
        drop(state);

        let records = match tracks {
            Some(records) => records,
            None => {
                if !collection.kind.is_fetchable() {
                    return Err(SessionError::TracksRequired(collection));
                }
                match self.fetcher.fetch_collection(&collection).await {
                    Ok(records) => records,
                    Err(e) if self.is_stale(token) => {
                        warn!(collection = %collection, error = %e, "Discarding failed stale fetch");
                        return Ok(PlayOutcome::Superseded);
                    }
                    Err(e) => {
                        error!(collection = %collection, error = %e, "Failed to fetch collection");
                        return Err(e.into());
                    }
                }
            }
        };

        if self.is_stale(token) {
            warn!(collection = %collection, "Discarding stale fetch");
            return Ok(PlayOutcome::Superseded);
        }

        let tracks = normalize_collection(&records);
        let Some(first) = tracks.first().map(|t| t.id) else {
            warn!(collection = %collection, records = records.len(), "No playable tracks");
            return Err(SessionError::EmptyCollection(collection));
        };
        let start = start
            .filter(|id| tracks.iter().any(|t| t.id == *id))
            .unwrap_or(first);
        let length = tracks.len();

        info!(collection = %collection, length, start = %start, "Starting collection");

        self.store.dispatch_all(vec![
            Command::ReplaceQueue {
                tracks,
                collection: collection.clone(),
            },
            Command::SetCurrentTrack(start),
            Command::SetIsPlaying(true),
        ]);

        Ok(PlayOutcome::Replaced {
            collection,
            length,
            start,
        })
    }

    pub async fn play_playlist(
        &self,
        id: impl Into<String>,
        start: Option<TrackId>,
    ) -> Result<PlayOutcome> {
        self.play_collection(request(CollectionId::playlist(id), start))
            .await
    }

    pub async fn play_album(
        &self,
        id: impl Into<String>,
        start: Option<TrackId>,
    ) -> Result<PlayOutcome> {
        self.play_collection(request(CollectionId::album(id), start))
            .await
    }

    pub async fn play_music_list(
        &self,
        id: impl Into<String>,
        start: Option<TrackId>,
    ) -> Result<PlayOutcome> {
        self.play_collection(request(CollectionId::music_list(id), start))
            .await
    }

    /// Play one track as an ad hoc queue
    ///
    /// The queue is keyed by the UI section the track was picked from plus
    /// its id, so picking the same track again toggles and picking another
    /// one replaces.
    pub async fn play_track(&self, section: &str, record: Value) -> Result<PlayOutcome> {
        let track = normalize_track(&record).map_err(|e| {
            warn!(section, error = %e, "Dropping unplayable track record");
            e
        })?;
        let collection = CollectionId::section(format!("{}/{}", section, track.id));

        self.play_collection(
            PlayRequest::new(collection)
                .with_tracks(vec![record])
                .starting_at(track.id),
        )
        .await
    }

    fn is_stale(&self, token: u64) -> bool {
        self.latest_request.load(Ordering::SeqCst) != token
    }
}

fn request(collection: CollectionId, start: Option<TrackId>) -> PlayRequest {
    PlayRequest {
        collection,
        tracks: None,
        start,
    }
}
