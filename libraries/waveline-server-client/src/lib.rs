//! Waveline Server Client
//!
//! HTTP client for the Waveline REST backend's track-collection endpoints.
//!
//! Records are returned as raw JSON; shape differences between endpoints
//! (nested join rows vs flat rows) are resolved by the playback crate's
//! normalizer, not here.
//!
//! # Example
//!
//! ```ignore
//! use waveline_server_client::{ServerConfig, WavelineServerClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::with_token("https://music.example.com", "token");
//!     let client = WavelineServerClient::new(config)?;
//!
//!     let records = client.fetch_album("7").await?;
//!     println!("Album has {} tracks", records.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod collections;
mod error;
mod types;

pub use client::WavelineServerClient;
pub use collections::CollectionClient;
pub use error::{Result, ServerClientError};
pub use types::{CollectionEndpoint, CollectionResponse, ServerConfig, DEFAULT_TIMEOUT_SECS};
