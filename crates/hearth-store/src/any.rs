//! Runtime-selected document store

use crate::{Document, DocumentStore, FileStore, HttpStore, MemoryStore, StoreError};

/// One of the built-in stores, chosen from configuration at startup
#[derive(Debug)]
pub enum AnyStore {
    Memory(MemoryStore),
    File(FileStore),
    Http(HttpStore),
}

impl AnyStore {
    /// Short backend name for logging
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::File(_) => "file",
            Self::Http(_) => "http",
        }
    }
}

impl From<MemoryStore> for AnyStore {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl From<FileStore> for AnyStore {
    fn from(store: FileStore) -> Self {
        Self::File(store)
    }
}

impl From<HttpStore> for AnyStore {
    fn from(store: HttpStore) -> Self {
        Self::Http(store)
    }
}

impl DocumentStore for AnyStore {
    async fn get(&self, key: &str) -> Result<Option<Document>, StoreError> {
        match self {
            Self::Memory(store) => store.get(key).await,
            Self::File(store) => store.get(key).await,
            Self::Http(store) => store.get(key).await,
        }
    }

    async fn put(&self, key: &str, document: Document) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.put(key, document).await,
            Self::File(store) => store.put(key, document).await,
            Self::Http(store) => store.put(key, document).await,
        }
    }

    async fn patch(&self, key: &str, fields: Document) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.patch(key, fields).await,
            Self::File(store) => store.patch(key, fields).await,
            Self::Http(store) => store.patch(key, fields).await,
        }
    }
}
