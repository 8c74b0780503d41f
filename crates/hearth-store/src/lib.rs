//! Hearth Store - Key-value JSON document storage
//!
//! This crate is the persistence gateway's client surface. A store holds
//! JSON object documents under string keys and offers three operations:
//! - `get`: fetch a document, `None` when absent
//! - `put`: replace a document wholesale
//! - `patch`: merge top-level fields into an existing document
//!
//! Stores own no scene semantics; decoding and default filling happen in
//! the caller.

pub mod any;
pub mod file;
pub mod http;
pub mod memory;

use std::future::Future;
use thiserror::Error;

pub use any::AnyStore;
pub use file::FileStore;
pub use http::HttpStore;
pub use memory::MemoryStore;

/// A stored document: always a JSON object at the root
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Invalid store URL: {0}")]
    InvalidUrl(String),
    #[error("Store returned status {status} for {key}")]
    Status { key: String, status: u16 },
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Stored document {0} is not a JSON object")]
    NotAnObject(String),
}

/// Asynchronous key-value document store
pub trait DocumentStore: Send + Sync + 'static {
    /// Fetch the document stored under `key`
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Document>, StoreError>> + Send;

    /// Replace the document stored under `key`
    fn put(&self, key: &str, document: Document)
        -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Merge `fields` into the top level of the existing document under
    /// `key`. Fails with [`StoreError::NotFound`] when there is no document.
    fn patch(&self, key: &str, fields: Document)
        -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Shallow merge: each field in `fields` replaces the same field in
/// `document`
pub fn merge_fields(document: &mut Document, fields: Document) {
    for (name, value) in fields {
        document.insert(name, value);
    }
}
