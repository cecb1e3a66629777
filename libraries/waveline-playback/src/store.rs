//! Shared playback store
//!
//! One store is created by the application root and cloned into whoever needs
//! it (orchestrator, media bridge, media session, UI). Clones share state.
//!
//! Transitions are applied to a copy of the current state and swapped in under
//! the write lock, so readers always see either the old or the new state.
//! Subscribers are notified after the lock is released and may dispatch again.

use crate::config::PlaybackConfig;
use crate::controller::{Command, PlayerState};
use crate::error::PlaybackError;
use crate::events::PlaybackEvent;
use crate::types::{CollectionId, RepeatMode, Track, TrackId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use tracing::debug;

type Listener = Arc<dyn Fn(&PlaybackEvent, &PlayerState) + Send + Sync>;

struct Inner {
    state: RwLock<Arc<PlayerState>>,
    rng: Mutex<StdRng>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
}

/// Handle to the shared playback state
#[derive(Clone)]
pub struct PlaybackStore {
    inner: Arc<Inner>,
}

impl PlaybackStore {
    /// Create an empty store
    pub fn new(config: PlaybackConfig) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(Arc::new(PlayerState::new(&config))),
                rng: Mutex::new(rng),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    /// Current state
    ///
    /// The snapshot is immutable; later transitions produce a new one.
    pub fn snapshot(&self) -> Arc<PlayerState> {
        let guard = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Apply one command atomically and notify subscribers
    pub fn dispatch(&self, command: Command) -> Vec<PlaybackEvent> {
        self.dispatch_all(vec![command])
    }

    /// Apply several commands as a single atomic update
    ///
    /// Readers never observe the intermediate states.
    pub fn dispatch_all(&self, commands: Vec<Command>) -> Vec<PlaybackEvent> {
        let (events, committed) = {
            let mut guard = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let mut rng = lock(&self.inner.rng);

            let mut next = PlayerState::clone(&guard);
            let mut events = Vec::new();
            for command in commands {
                debug!(command = ?CommandName(&command), "Applying playback command");
                events.extend(next.apply(command, &mut *rng));
            }

            let committed = Arc::new(next);
            *guard = Arc::clone(&committed);
            (events, committed)
        };

        self.notify(&events, &committed);
        events
    }

    /// Register a listener for every published event
    ///
    /// The listener stays registered until the returned guard is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&PlaybackEvent, &PlayerState) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.listeners).push((id, Arc::new(listener)));

        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }

    fn notify(&self, events: &[PlaybackEvent], state: &PlayerState) {
        if events.is_empty() {
            return;
        }
        let listeners: Vec<Listener> = lock(&self.inner.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for event in events {
            for listener in &listeners {
                listener(event, state);
            }
        }
    }

    // ===== Typed transitions =====

    pub fn replace_queue(&self, tracks: Vec<Track>, collection: CollectionId) -> Vec<PlaybackEvent> {
        self.dispatch(Command::ReplaceQueue { tracks, collection })
    }

    pub fn set_current_track(&self, id: TrackId) -> Vec<PlaybackEvent> {
        self.dispatch(Command::SetCurrentTrack(id))
    }

    pub fn set_is_playing(&self, playing: bool) -> Vec<PlaybackEvent> {
        self.dispatch(Command::SetIsPlaying(playing))
    }

    pub fn play_next(&self) -> Vec<PlaybackEvent> {
        self.dispatch(Command::PlayNext)
    }

    pub fn play_previous(&self) -> Vec<PlaybackEvent> {
        self.dispatch(Command::PlayPrevious)
    }

    pub fn toggle_shuffle(&self) -> Vec<PlaybackEvent> {
        self.dispatch(Command::ToggleShuffle)
    }

    pub fn set_repeat_mode(&self, mode: RepeatMode) -> Vec<PlaybackEvent> {
        self.dispatch(Command::SetRepeatMode(mode))
    }

    pub fn add_to_queue(&self, tracks: Vec<Track>) -> Vec<PlaybackEvent> {
        self.dispatch(Command::AddToQueue(tracks))
    }

    pub fn remove_from_queue(&self, id: TrackId) -> Vec<PlaybackEvent> {
        self.dispatch(Command::RemoveFromQueue(id))
    }

    pub fn move_track(&self, from: usize, to: usize) -> Vec<PlaybackEvent> {
        self.dispatch(Command::MoveTrack { from, to })
    }

    pub fn clear_queue(&self) -> Vec<PlaybackEvent> {
        self.dispatch(Command::ClearQueue)
    }

    pub fn clear_played_tracks(&self) -> Vec<PlaybackEvent> {
        self.dispatch(Command::ClearPlayedTracks)
    }

    pub fn track_loaded(&self, id: TrackId) -> Vec<PlaybackEvent> {
        self.dispatch(Command::TrackLoaded(id))
    }

    pub fn playback_failed(&self, error: PlaybackError) -> Vec<PlaybackEvent> {
        self.dispatch(Command::PlaybackFailed(error))
    }

    pub fn logout(&self) -> Vec<PlaybackEvent> {
        self.dispatch(Command::Logout)
    }
}

impl Default for PlaybackStore {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

impl std::fmt::Debug for PlaybackStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackStore")
            .field("state", &self.snapshot())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Listener registration; unsubscribes when dropped
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    store: Weak<Inner>,
}

impl Subscription {
    /// Unsubscribe now
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            lock(&inner.listeners).retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// Keeps track lists out of debug logs
struct CommandName<'a>(&'a Command);

impl std::fmt::Debug for CommandName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Command::ReplaceQueue { tracks, collection } => {
                write!(f, "ReplaceQueue({}, {} tracks)", collection, tracks.len())
            }
            Command::AddToQueue(tracks) => write!(f, "AddToQueue({} tracks)", tracks.len()),
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn create_test_track(id: i64) -> Track {
        Track {
            id: TrackId::new(id),
            name: format!("Track {}", id),
            artist_name: "Test Artist".to_string(),
            cover_photo_url: None,
            duration_seconds: 180,
            audio_url: None,
        }
    }

    fn seeded() -> PlaybackStore {
        PlaybackStore::new(PlaybackConfig {
            shuffle_seed: Some(3),
            ..Default::default()
        })
    }

    #[test]
    fn clones_share_state() {
        let store = seeded();
        let other = store.clone();

        store.replace_queue(vec![create_test_track(1)], CollectionId::album("a"));
        assert_eq!(other.snapshot().tracks().len(), 1);
    }

    #[test]
    fn snapshots_are_immutable() {
        let store = seeded();
        let before = store.snapshot();

        store.replace_queue(vec![create_test_track(1)], CollectionId::album("a"));
        assert!(before.tracks().is_empty());
        assert_eq!(store.snapshot().tracks().len(), 1);
    }

    #[test]
    fn dispatch_all_is_one_update() {
        let store = seeded();
        let observed = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&observed);
        let _subscription = store.subscribe(move |event, state| {
            sink.lock()
                .unwrap()
                .push((event.clone(), state.is_playing(), state.tracks().len()));
        });

        store.dispatch_all(vec![
            Command::ReplaceQueue {
                tracks: vec![create_test_track(1), create_test_track(2)],
                collection: CollectionId::playlist("p"),
            },
            Command::SetCurrentTrack(TrackId::new(1)),
            Command::SetIsPlaying(true),
        ]);

        let observed = observed.lock().unwrap();
        assert_eq!(observed.len(), 3);
        // Every listener call sees the committed state, never an intermediate one
        assert!(observed.iter().all(|(_, playing, len)| *playing && *len == 2));
    }

    #[test]
    fn subscription_drop_unsubscribes() {
        let store = seeded();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let subscription = store.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.subscriber_count(), 1);

        store.set_is_playing(true);
        drop(subscription);
        store.set_is_playing(false);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn explicit_unsubscribe() {
        let store = seeded();
        let subscription = store.subscribe(|_, _| {});
        subscription.unsubscribe();
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn subscription_outliving_store_is_harmless() {
        let store = seeded();
        let subscription = store.subscribe(|_, _| {});
        drop(store);
        drop(subscription);
    }

    #[test]
    fn listener_may_dispatch() {
        let store = seeded();
        store.replace_queue(
            vec![create_test_track(1), create_test_track(2)],
            CollectionId::album("a"),
        );

        let inner = store.clone();
        let _subscription = store.subscribe(move |event, _| {
            if let PlaybackEvent::TrackChanged { track_id, .. } = event {
                inner.track_loaded(*track_id);
            }
        });

        store.set_current_track(TrackId::new(2));
        assert!(!store.snapshot().is_changing_track());
    }

    #[test]
    fn no_events_no_notifications() {
        let store = seeded();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _subscription = store.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.play_next();
        store.play_previous();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let run = || {
            let store = seeded();
            store.replace_queue(
                (1..=20).map(create_test_track).collect(),
                CollectionId::album("a"),
            );
            store.toggle_shuffle();
            store
                .snapshot()
                .tracks()
                .iter()
                .map(|t| t.id.get())
                .collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
    }
}
