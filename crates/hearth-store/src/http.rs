//! HTTP client for a remote document store
//!
//! Talks to the `hearth` daemon's REST API:
//! - `GET    {base}/api/documents/{key}` → 200 with the document, 404 if absent
//! - `PUT    {base}/api/documents/{key}` → full replace
//! - `PATCH  {base}/api/documents/{key}` → top-level merge, 404 if absent
//!
//! The key is sent as a single percent-encoded path segment.

use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::debug;

use crate::{Document, DocumentStore, StoreError};

/// Request timeout for every store call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Document store backed by a remote `hearth` daemon
#[derive(Debug, Clone)]
pub struct HttpStore {
    /// HTTP client
    client: reqwest::Client,
    /// Daemon base URL (e.g., "http://127.0.0.1:8080")
    base_url: Url,
}

impl HttpStore {
    /// Create a client for the daemon at `base_url`
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let base_url =
            Url::parse(base_url).map_err(|e| StoreError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Endpoint URL for `key`
    pub fn document_url(&self, key: &str) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "documents", key]);
        Ok(url)
    }
}

impl DocumentStore for HttpStore {
    async fn get(&self, key: &str) -> Result<Option<Document>, StoreError> {
        let url = self.document_url(key)?;
        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(key = %key, "Remote document not found");
                Ok(None)
            }
            status if status.is_success() => {
                let value: serde_json::Value = response.json().await?;
                match value {
                    serde_json::Value::Object(document) => Ok(Some(document)),
                    _ => Err(StoreError::NotAnObject(key.to_string())),
                }
            }
            status => Err(StoreError::Status {
                key: key.to_string(),
                status: status.as_u16(),
            }),
        }
    }

    async fn put(&self, key: &str, document: Document) -> Result<(), StoreError> {
        let url = self.document_url(key)?;
        let response = self.client.put(url).json(&document).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                key: key.to_string(),
                status: status.as_u16(),
            });
        }
        debug!(key = %key, "Stored remote document");
        Ok(())
    }

    async fn patch(&self, key: &str, fields: Document) -> Result<(), StoreError> {
        let url = self.document_url(key)?;
        let response = self.client.patch(url).json(&fields).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(key.to_string())),
            status if status.is_success() => {
                debug!(key = %key, "Patched remote document");
                Ok(())
            }
            status => Err(StoreError::Status {
                key: key.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}
