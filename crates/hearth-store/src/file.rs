//! Filesystem-backed document store
//!
//! Each document is a pretty-printed JSON file under the base directory.
//! Keys are percent-encoded into file names: bytes outside `[A-Za-z0-9_-]`
//! become `%XX`, so `scenes/scene_data` is stored as
//! `scenes%2Fscene_data.json`. Distinct keys never share a file.
//! Writes go to a temporary sibling file first and are renamed into place.

use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{merge_fields, Document, DocumentStore, StoreError};

/// Document store persisting one JSON file per key
#[derive(Debug)]
pub struct FileStore {
    /// Directory holding the document files
    base_dir: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        info!(path = %base_dir.display(), "Opened file document store");
        Ok(Self {
            base_dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File that holds the document for `key`
    pub fn document_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", file_stem(key)))
    }

    async fn read(&self, key: &str) -> Result<Option<Document>, StoreError> {
        let path = self.document_path(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<serde_json::Value>(&content)? {
            serde_json::Value::Object(document) => Ok(Some(document)),
            _ => Err(StoreError::NotAnObject(key.to_string())),
        }
    }

    async fn write(&self, key: &str, document: &Document) -> Result<(), StoreError> {
        let path = self.document_path(key);
        let tmp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        debug!(key = %key, path = %path.display(), "Wrote document");
        Ok(())
    }
}

impl DocumentStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Document>, StoreError> {
        self.read(key).await
    }

    async fn put(&self, key: &str, document: Document) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(key, &document).await
    }

    async fn patch(&self, key: &str, fields: Document) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self
            .read(key)
            .await?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        merge_fields(&mut document, fields);
        self.write(key, &document).await
    }
}

/// Map a key onto a safe, unique file stem
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            // Infallible for String
            let _ = write!(stem, "%{:02X}", byte);
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn object(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("scenes/scene_data"), "scenes%2Fscene_data");
        assert_eq!(file_stem("../etc/passwd"), "%2E%2E%2Fetc%2Fpasswd");
        assert_eq!(file_stem("kitchen-1"), "kitchen-1");
        assert_eq!(file_stem("50%"), "50%25");
        assert_eq!(file_stem("caf\u{e9}"), "caf%C3%A9");
    }

    #[tokio::test]
    async fn test_similar_keys_use_separate_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();
        let keys = ["scenes/scene_data", "scenes_scene_data", "scenes%2Fscene_data"];

        assert_ne!(
            store.document_path(keys[0]),
            store.document_path(keys[1])
        );
        for (n, key) in keys.iter().enumerate() {
            store.put(key, object(json!({ "lastUpdated": n }))).await.unwrap();
        }
        for (n, key) in keys.iter().enumerate() {
            let doc = store.get(key).await.unwrap().unwrap();
            assert_eq!(doc["lastUpdated"], n);
        }
    }

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let doc = object(json!({ "models": [{ "id": "kitchen1" }], "lastUpdated": 7 }));

        {
            let store = FileStore::new(temp_dir.path()).unwrap();
            assert!(store.get("scenes/scene_data").await.unwrap().is_none());
            store.put("scenes/scene_data", doc.clone()).await.unwrap();
            assert!(store.document_path("scenes/scene_data").exists());
        }

        let store = FileStore::new(temp_dir.path()).unwrap();
        assert_eq!(store.get("scenes/scene_data").await.unwrap(), Some(doc));
    }

    #[tokio::test]
    async fn test_patch_merges_fields() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();

        store
            .put("doc", object(json!({ "camera": { "position": [1, 1, 1] }, "lastUpdated": 1 })))
            .await
            .unwrap();
        store
            .patch("doc", object(json!({ "lastUpdated": 9 })))
            .await
            .unwrap();

        let doc = store.get("doc").await.unwrap().unwrap();
        assert_eq!(doc["camera"]["position"], json!([1, 1, 1]));
        assert_eq!(doc["lastUpdated"], 9);

        let err = store
            .patch("other", object(json!({ "lastUpdated": 9 })))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_non_object_document_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();
        std::fs::write(store.document_path("broken"), "[1, 2, 3]").unwrap();

        let err = store.get("broken").await.unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject(_)));
    }
}
