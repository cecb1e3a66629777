//! Main Waveline server client.

use crate::collections::CollectionClient;
use crate::error::{Result, ServerClientError};
use crate::types::{CollectionEndpoint, ServerConfig};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

/// Client for fetching track collections from a Waveline server.
///
/// Cheap to clone; clones share the HTTP connection pool and the access
/// token.
///
/// # Example
///
/// ```ignore
/// use waveline_server_client::{ServerConfig, WavelineServerClient};
///
/// let client = WavelineServerClient::new(ServerConfig::new("https://music.example.com"))?;
/// client.set_access_token("token").await;
///
/// let records = client.fetch_playlist("42").await?;
/// println!("Fetched {} records", records.len());
/// ```
#[derive(Clone)]
pub struct WavelineServerClient {
    http: Client,
    config: Arc<RwLock<ServerConfig>>,
}

impl WavelineServerClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(ServerClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim().trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ServerClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Waveline/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ServerClientError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(ServerConfig { url, ..config })),
        })
    }

    /// Get the server URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client has an access token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.access_token.is_some()
    }

    /// Set the bearer token used for subsequent requests.
    pub async fn set_access_token(&self, access_token: impl Into<String>) {
        self.config.write().await.access_token = Some(access_token.into());
    }

    /// Clear the stored token (logout).
    pub async fn clear_access_token(&self) {
        self.config.write().await.access_token = None;
        info!("Access token cleared");
    }

    /// Fetch the raw records of any fetchable collection.
    pub async fn fetch(&self, endpoint: CollectionEndpoint<'_>) -> Result<Vec<Value>> {
        let config = self.config.read().await;
        let url = config.url.clone();
        let access_token = config.access_token.clone();
        drop(config);

        CollectionClient::new(&self.http, &url, access_token.as_deref())
            .get_records(endpoint)
            .await
    }

    pub async fn fetch_album(&self, id: &str) -> Result<Vec<Value>> {
        self.fetch(CollectionEndpoint::Album(id)).await
    }

    pub async fn fetch_playlist(&self, id: &str) -> Result<Vec<Value>> {
        self.fetch(CollectionEndpoint::Playlist(id)).await
    }

    pub async fn fetch_music_list(&self, id: &str) -> Result<Vec<Value>> {
        self.fetch(CollectionEndpoint::MusicList(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        // Valid URLs
        assert!(WavelineServerClient::new(ServerConfig::new("https://example.com")).is_ok());
        assert!(WavelineServerClient::new(ServerConfig::new("http://localhost:8080")).is_ok());

        // Invalid URLs
        assert!(WavelineServerClient::new(ServerConfig::new("")).is_err());
        assert!(WavelineServerClient::new(ServerConfig::new("   ")).is_err());
        assert!(WavelineServerClient::new(ServerConfig::new("not-a-url")).is_err());
        assert!(WavelineServerClient::new(ServerConfig::new("ftp://example.com")).is_err());
    }

    #[tokio::test]
    async fn test_url_normalization() {
        let client = WavelineServerClient::new(ServerConfig::new("https://example.com//"))
            .expect("valid url");
        assert_eq!(client.url().await, "https://example.com");
    }

    #[tokio::test]
    async fn test_token_lifecycle() {
        let client =
            WavelineServerClient::new(ServerConfig::new("https://example.com")).expect("valid url");
        assert!(!client.is_authenticated().await);

        client.set_access_token("abc").await;
        assert!(client.clone().is_authenticated().await);

        client.clear_access_token().await;
        assert!(!client.is_authenticated().await);
    }
}
