//! Error types for playback sessions

use thiserror::Error;
use waveline_playback::{CollectionId, NormalizationError};
use waveline_server_client::ServerClientError;

/// Fetching a collection's records failed
#[derive(Error, Debug)]
pub enum FetchError {
    /// REST backend request failed
    #[error("Failed to fetch {collection}: {source}")]
    Server {
        collection: CollectionId,
        #[source]
        source: ServerClientError,
    },

    /// Collection kind has no backend endpoint
    #[error("{0} cannot be fetched")]
    NotFetchable(CollectionId),

    /// Any other fetcher failure
    #[error("Failed to fetch {collection}: {message}")]
    Other {
        collection: CollectionId,
        message: String,
    },
}

impl FetchError {
    /// Collection the fetch was for
    pub fn collection(&self) -> &CollectionId {
        match self {
            FetchError::Server { collection, .. } | FetchError::Other { collection, .. } => {
                collection
            }
            FetchError::NotFetchable(collection) => collection,
        }
    }
}

/// A play request could not be honoured; the queue is untouched
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A single supplied record could not be normalized
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// Every record was dropped by the normalizer
    #[error("{0} has no playable tracks")]
    EmptyCollection(CollectionId),

    /// Collection cannot be fetched and no tracks were supplied
    #[error("{0} needs its tracks supplied by the caller")]
    TracksRequired(CollectionId),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
