//! Collection fetcher seam
//!
//! The orchestrator only needs "records for this collection id". The REST
//! client is the production implementation; tests plug in fakes.

use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;
use waveline_playback::{CollectionId, CollectionKind};
use waveline_server_client::{CollectionEndpoint, WavelineServerClient};

/// Source of raw track records for a collection
#[async_trait]
pub trait CollectionFetcher: Send + Sync {
    /// Fetch the records of `collection`, unnormalized
    async fn fetch_collection(&self, collection: &CollectionId) -> Result<Vec<Value>, FetchError>;
}

#[async_trait]
impl CollectionFetcher for WavelineServerClient {
    async fn fetch_collection(&self, collection: &CollectionId) -> Result<Vec<Value>, FetchError> {
        let key = collection.key.as_str();
        let endpoint = match collection.kind {
            CollectionKind::Album => CollectionEndpoint::Album(key),
            CollectionKind::Playlist => CollectionEndpoint::Playlist(key),
            CollectionKind::MusicList => CollectionEndpoint::MusicList(key),
            CollectionKind::Section => return Err(FetchError::NotFetchable(collection.clone())),
        };

        self.fetch(endpoint)
            .await
            .map_err(|source| FetchError::Server {
                collection: collection.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use waveline_server_client::{ServerClientError, ServerConfig};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn server_client_fetches_by_kind() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/music-lists/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"musics": [{"id": 1}]})))
            .expect(1)
            .mount(&server)
            .await;

        let client = WavelineServerClient::new(ServerConfig::new(server.uri())).unwrap();
        let records = client
            .fetch_collection(&CollectionId::music_list("9"))
            .await
            .unwrap();
        assert_eq!(records, vec![json!({"id": 1})]);
    }

    #[tokio::test]
    async fn server_errors_carry_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/albums/1/tracks"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = WavelineServerClient::new(ServerConfig::new(server.uri())).unwrap();
        let err = client
            .fetch_collection(&CollectionId::album("1"))
            .await
            .unwrap_err();

        assert_eq!(err.collection(), &CollectionId::album("1"));
        assert!(matches!(
            err,
            FetchError::Server {
                source: ServerClientError::AuthRequired,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn sections_are_never_requested() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let client = WavelineServerClient::new(ServerConfig::new(server.uri())).unwrap();
        let err = client
            .fetch_collection(&CollectionId::section("home"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotFetchable(_)));
    }
}
