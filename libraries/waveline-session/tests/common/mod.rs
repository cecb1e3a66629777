//! Common test fakes and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::{mpsc, Notify};
use waveline_playback::{CollectionId, TrackId};
use waveline_session::{CollectionFetcher, FetchError, MediaElement, MediaEvent, MediaFailure};

/// Nested join-table record, the shape playlist endpoints return
pub fn nested_record(id: i64) -> Value {
    json!({
        "id": id * 100,
        "musicDetails": {
            "id": id,
            "name": format!("Track {}", id),
            "artistName": "Artist",
            "audioUrl": format!("https://cdn/{}.mp3", id)
        }
    })
}

/// Flat record, the shape album endpoints return
pub fn flat_record(id: i64) -> Value {
    json!({
        "musicId": id,
        "title": format!("Track {}", id),
        "artist": {"name": "Artist"},
        "musicUrl": format!("https://cdn/{}.mp3", id)
    })
}

// =============================================================================
// Fetchers
// =============================================================================

/// Serves canned records per collection, counting calls
#[derive(Default)]
pub struct FakeFetcher {
    collections: HashMap<CollectionId, Result<Vec<Value>, String>>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, collection: CollectionId, records: Vec<Value>) -> Self {
        self.collections.insert(collection, Ok(records));
        self
    }

    pub fn failing(mut self, collection: CollectionId, message: &str) -> Self {
        self.collections.insert(collection, Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CollectionFetcher for FakeFetcher {
    async fn fetch_collection(&self, collection: &CollectionId) -> Result<Vec<Value>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.collections.get(collection) {
            Some(Ok(records)) => Ok(records.clone()),
            Some(Err(message)) => Err(FetchError::Other {
                collection: collection.clone(),
                message: message.clone(),
            }),
            None => Err(FetchError::Other {
                collection: collection.clone(),
                message: "unknown collection".to_string(),
            }),
        }
    }
}

/// Holds fetches of one collection until the gate is opened
pub struct GatedFetcher {
    inner: FakeFetcher,
    gated: CollectionId,
    gate: Notify,
    waiting: AtomicUsize,
}

impl GatedFetcher {
    pub fn new(inner: FakeFetcher, gated: CollectionId) -> Self {
        Self {
            inner,
            gated,
            gate: Notify::new(),
            waiting: AtomicUsize::new(0),
        }
    }

    pub fn open(&self) {
        self.gate.notify_one();
    }

    /// Fetches currently held at the gate
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.inner.calls()
    }
}

#[async_trait]
impl CollectionFetcher for GatedFetcher {
    async fn fetch_collection(&self, collection: &CollectionId) -> Result<Vec<Value>, FetchError> {
        if *collection == self.gated {
            self.waiting.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            self.waiting.fetch_sub(1, Ordering::SeqCst);
        }
        self.inner.fetch_collection(collection).await
    }
}

// =============================================================================
// Media Element
// =============================================================================

/// Records calls; confirms loads immediately through the event channel
pub struct FakeMedia {
    calls: Mutex<Vec<String>>,
    reject_play: AtomicBool,
    events: mpsc::Sender<MediaEvent>,
}

impl FakeMedia {
    pub fn new(events: mpsc::Sender<MediaEvent>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reject_play: AtomicBool::new(false),
            events,
        }
    }

    pub fn reject_play(&self, reject: bool) {
        self.reject_play.store(reject, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MediaElement for FakeMedia {
    async fn load(&self, track_id: TrackId, url: &str) -> Result<(), MediaFailure> {
        self.record(format!("load {} {}", track_id, url));
        let _ = self.events.send(MediaEvent::Loaded(track_id)).await;
        Ok(())
    }

    async fn play(&self) -> Result<(), MediaFailure> {
        self.record("play".to_string());
        if self.reject_play.load(Ordering::SeqCst) {
            Err(MediaFailure("autoplay blocked".to_string()))
        } else {
            Ok(())
        }
    }

    async fn pause(&self) {
        self.record("pause".to_string());
    }

    async fn seek(&self, position_secs: f64) {
        self.record(format!("seek {}", position_secs));
    }
}
