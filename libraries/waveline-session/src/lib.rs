//! Waveline - Playback Sessions
//!
//! Glue between the playback store and the outside world:
//!
//! - [`PlaybackOrchestrator`]: "play this playlist/album/list/track" requests,
//!   toggle vs replace, on-demand fetch, last-request-wins
//! - [`CollectionFetcher`]: where records come from (the REST client in
//!   production)
//! - [`MediaBridge`]: drives a [`MediaElement`] and feeds its events back
//! - [`MediaSessionBridge`]: mirrors now-playing state to the OS media session
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use waveline_playback::PlaybackStore;
//! use waveline_server_client::{ServerConfig, WavelineServerClient};
//! use waveline_session::PlaybackOrchestrator;
//!
//! let store = PlaybackStore::default();
//! let client = WavelineServerClient::new(ServerConfig::new("https://music.example.com"))?;
//! let orchestrator = PlaybackOrchestrator::new(store.clone(), Arc::new(client));
//!
//! orchestrator.play_playlist("42", None).await?; // fetch, replace, play
//! orchestrator.play_playlist("42", None).await?; // pause
//! ```

mod error;
mod fetcher;
mod media;
mod media_session;
mod orchestrator;

pub use error::{FetchError, Result, SessionError};
pub use fetcher::CollectionFetcher;
pub use media::{media_event_channel, MediaBridge, MediaElement, MediaEvent, MediaFailure};
pub use media_session::{
    MediaSession, MediaSessionAction, MediaSessionBridge, SessionMetadata, SessionPlaybackState,
};
pub use orchestrator::{PlayOutcome, PlayRequest, PlaybackOrchestrator};
