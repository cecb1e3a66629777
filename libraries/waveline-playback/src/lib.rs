//! Waveline - Playback Management
//!
//! Platform-agnostic playback queue management for Waveline.
//!
//! This crate provides:
//! - Track normalization (nested join rows and flat rows -> one [`Track`])
//! - Index-based queue with partial shuffle and original-order restore
//! - Repeat modes (None, All, One)
//! - Played track history (bounded)
//! - A shared [`PlaybackStore`] with atomic transitions and scoped subscriptions
//!
//! # Architecture
//!
//! `waveline-playback` does no I/O:
//! - No HTTP (fetching lives in `waveline-server-client`)
//! - No media element (driven from `waveline-session`)
//! - No async runtime
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use waveline_playback::{normalize_collection, CollectionId, PlaybackStore, TrackId};
//! use serde_json::json;
//!
//! let store = PlaybackStore::default();
//!
//! let tracks = normalize_collection(&[
//!     json!({"id": 1, "name": "Intro", "artistName": "The xx"}),
//!     json!({"musicDetails": {"id": 2, "name": "VCR", "artistName": "The xx"}}),
//! ]);
//!
//! store.replace_queue(tracks, CollectionId::album("xx"));
//! store.set_current_track(TrackId::new(1));
//! store.set_is_playing(true);
//!
//! store.play_next();
//! assert_eq!(store.snapshot().current_index(), Some(1));
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use waveline_playback::{PlaybackStore, RepeatMode};
//!
//! let store = PlaybackStore::default();
//! store.toggle_shuffle();
//! store.set_repeat_mode(RepeatMode::All);
//! assert!(store.snapshot().shuffle_enabled());
//! ```
//!
//! # Example: Subscriptions
//!
//! ```rust
//! use waveline_playback::{PlaybackEvent, PlaybackStore};
//!
//! let store = PlaybackStore::default();
//! let subscription = store.subscribe(|event, _state| {
//!     if let PlaybackEvent::PlayingChanged { is_playing } = event {
//!         println!("playing: {}", is_playing);
//!     }
//! });
//!
//! store.set_is_playing(true);
//! drop(subscription); // unsubscribes
//! ```

mod config;
mod controller;
mod error;
mod events;
mod history;
mod normalize;
mod queue;
mod shuffle;
mod store;
pub mod types;

// Public exports
pub use config::PlaybackConfig;
pub use controller::{Command, PlayerState};
pub use error::{NormalizationError, PlaybackError, Result};
pub use events::PlaybackEvent;
pub use history::PlayedTracks;
pub use normalize::{normalize_collection, normalize_track};
pub use queue::Queue;
pub use store::{PlaybackStore, Subscription};
pub use types::{CollectionId, CollectionKind, PlaybackStatus, RepeatMode, Track, TrackId};
