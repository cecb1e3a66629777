//! Collection fetch operations for a Waveline server.

use crate::error::{Result, ServerClientError};
use crate::types::{CollectionEndpoint, CollectionResponse};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Collection client for a Waveline server.
pub struct CollectionClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: Option<&'a str>,
}

impl<'a> CollectionClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: Option<&'a str>) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Fetch the raw track records of a collection.
    pub async fn get_records(&self, endpoint: CollectionEndpoint<'_>) -> Result<Vec<Value>> {
        let url = endpoint.url(self.base_url)?;
        debug!(url = %url, collection = %endpoint, "Fetching collection");

        let mut request = self.http.get(url);
        if let Some(token) = self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ServerClientError::ServerUnreachable(e.to_string())
            } else {
                ServerClientError::Request(e)
            }
        })?;

        let status = response.status();

        if status.is_success() {
            let body: CollectionResponse = response.json().await.map_err(|e| {
                ServerClientError::ParseError(format!(
                    "Failed to parse {} response: {}",
                    endpoint, e
                ))
            })?;

            let records = body.into_records().ok_or_else(|| {
                ServerClientError::ParseError(format!("No track array in {} response", endpoint))
            })?;

            debug!(collection = %endpoint, records = records.len(), "Fetched collection");

            Ok(records)
        } else if status == StatusCode::UNAUTHORIZED {
            Err(ServerClientError::AuthRequired)
        } else if status == StatusCode::NOT_FOUND {
            Err(ServerClientError::NotFound(endpoint.to_string()))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}
