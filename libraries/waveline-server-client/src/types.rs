//! Types for Waveline server requests and responses.

use crate::error::{Result, ServerClientError};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to a Waveline server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the server (e.g., "https://music.example.com")
    pub url: String,
    /// Bearer token sent with every request, if any
    #[serde(default)]
    pub access_token: Option<String>,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ServerConfig {
    /// Create a new server config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create a config with an existing access token.
    pub fn with_token(url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Self::new(url)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Collection Endpoints
// =============================================================================

/// A fetchable collection on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEndpoint<'a> {
    Album(&'a str),
    Playlist(&'a str),
    MusicList(&'a str),
}

impl<'a> CollectionEndpoint<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            Self::Album(id) | Self::Playlist(id) | Self::MusicList(id) => id,
        }
    }

    /// Full request URL under `base`.
    ///
    /// The id is always a single path segment: `/`, `?` and `#` in it are
    /// percent-encoded, and dot segments are rejected.
    pub fn url(&self, base: &str) -> Result<Url> {
        let id = self.id();
        if matches!(id, "" | "." | "..") {
            return Err(ServerClientError::InvalidUrl(format!(
                "Invalid collection id: {:?}",
                id
            )));
        }

        let mut url = Url::parse(base).map_err(|e| ServerClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ServerClientError::InvalidUrl(format!("Not a base URL: {}", base)))?
            .pop_if_empty()
            .extend(self.segments());
        Ok(url)
    }

    fn segments(&self) -> Vec<&'a str> {
        match *self {
            Self::Album(id) => vec!["api", "albums", id, "tracks"],
            Self::Playlist(id) => vec!["api", "playlists", id, "tracks"],
            Self::MusicList(id) => vec!["api", "music-lists", id],
        }
    }
}

impl fmt::Display for CollectionEndpoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Album(id) => write!(f, "album {}", id),
            Self::Playlist(id) => write!(f, "playlist {}", id),
            Self::MusicList(id) => write!(f, "music list {}", id),
        }
    }
}

// =============================================================================
// Response Bodies
// =============================================================================

/// Keys under which a wrapped response may hold its record array.
const WRAPPER_KEYS: [&str; 3] = ["tracks", "musics", "data"];

/// Collection response body.
///
/// The server answers either with a bare array of track records or with an
/// object wrapping that array. Records stay raw JSON; normalization happens
/// downstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CollectionResponse {
    Records(Vec<Value>),
    Wrapped(serde_json::Map<String, Value>),
}

impl CollectionResponse {
    /// Extract the record array, or `None` if the body holds none.
    pub fn into_records(self) -> Option<Vec<Value>> {
        match self {
            Self::Records(records) => Some(records),
            Self::Wrapped(mut object) => WRAPPER_KEYS.iter().find_map(|key| {
                match object.remove(*key) {
                    Some(Value::Array(records)) => Some(records),
                    _ => None,
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(endpoint: CollectionEndpoint<'_>) -> String {
        endpoint.url("https://music.example.com").unwrap().path().to_string()
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(path(CollectionEndpoint::Album("7")), "/api/albums/7/tracks");
        assert_eq!(
            path(CollectionEndpoint::Playlist("abc")),
            "/api/playlists/abc/tracks"
        );
        assert_eq!(path(CollectionEndpoint::MusicList("3")), "/api/music-lists/3");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = CollectionEndpoint::MusicList("3")
            .url("https://example.com/waveline")
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/waveline/api/music-lists/3");
    }

    #[test]
    fn test_endpoint_id_stays_one_segment() {
        assert_eq!(
            path(CollectionEndpoint::Album("1/../x")),
            "/api/albums/1%2F..%2Fx/tracks"
        );

        let url = CollectionEndpoint::Playlist("a?b#c")
            .url("https://music.example.com")
            .unwrap();
        assert_eq!(url.path(), "/api/playlists/a%3Fb%23c/tracks");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_endpoint_rejects_dot_ids() {
        for id in ["", ".", ".."] {
            assert!(matches!(
                CollectionEndpoint::Album(id).url("https://music.example.com"),
                Err(ServerClientError::InvalidUrl(_))
            ));
        }
    }

    #[test]
    fn test_bare_array_response() {
        let response: CollectionResponse = serde_json::from_value(json!([{"id": 1}])).unwrap();
        assert_eq!(response.into_records(), Some(vec![json!({"id": 1})]));
    }

    #[test]
    fn test_wrapped_response_keys() {
        for key in ["tracks", "musics", "data"] {
            let body = json!({ key: [{"id": 1}, {"id": 2}], "total": 2 });
            let response: CollectionResponse = serde_json::from_value(body).unwrap();
            assert_eq!(response.into_records().map(|r| r.len()), Some(2), "key {}", key);
        }
    }

    #[test]
    fn test_wrapped_response_without_array() {
        let response: CollectionResponse =
            serde_json::from_value(json!({"tracks": "nope", "name": "x"})).unwrap();
        assert!(response.into_records().is_none());
    }

    #[test]
    fn test_config_defaults() {
        let config: ServerConfig =
            serde_json::from_value(json!({"url": "https://example.com"})).unwrap();
        assert_eq!(config, ServerConfig::new("https://example.com"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }
}
