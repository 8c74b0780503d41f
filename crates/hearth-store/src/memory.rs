//! In-process document store

use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{merge_fields, Document, DocumentStore, StoreError};

/// Document store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, document: Document) -> Result<(), StoreError> {
        self.documents.write().await.insert(key.to_string(), document);
        debug!(key = %key, "Stored document in memory");
        Ok(())
    }

    async fn patch(&self, key: &str, fields: Document) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        merge_fields(document, fields);
        debug!(key = %key, "Patched document in memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_put_get_patch() {
        let store = MemoryStore::new();
        assert!(store.get("scenes/a").await.unwrap().is_none());

        store
            .put("scenes/a", object(json!({ "models": [], "lastUpdated": 1 })))
            .await
            .unwrap();
        store
            .patch("scenes/a", object(json!({ "lastUpdated": 2 })))
            .await
            .unwrap();

        let doc = store.get("scenes/a").await.unwrap().unwrap();
        assert_eq!(doc["models"], json!([]));
        assert_eq!(doc["lastUpdated"], 2);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_patch_missing_document() {
        let store = MemoryStore::new();
        let err = store
            .patch("missing", object(json!({ "lastUpdated": 2 })))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(key) if key == "missing"));
        assert!(store.is_empty().await);
    }
}
