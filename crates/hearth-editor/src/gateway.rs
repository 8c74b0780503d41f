//! Typed access to the scene document
//!
//! Wraps a [`DocumentStore`] with the scene schema: decoding with default
//! filling on read, full-scene saves, and single-model point-updates.

use hearth_core::{now_millis, CameraFraming, ModelId, ModelTransform, SceneDocument, Vec3};
use hearth_store::{Document, DocumentStore, StoreError};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Reads and writes one scene document under a fixed key
pub struct SceneGateway<S> {
    store: Arc<S>,
    key: String,
}

impl<S> Clone for SceneGateway<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key.clone(),
        }
    }
}

impl<S: DocumentStore> SceneGateway<S> {
    pub fn new(store: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Fetch and decode the stored scene, `None` when nothing is stored
    pub async fn load(&self) -> Result<Option<SceneDocument>, StoreError> {
        let Some(document) = self.store.get(&self.key).await? else {
            return Ok(None);
        };
        Ok(Some(SceneDocument::from_value(&Value::Object(document))))
    }

    /// Replace the stored scene, stamping it with the current time
    pub async fn save(
        &self,
        models: &[ModelTransform],
        camera: CameraFraming,
    ) -> Result<SceneDocument, StoreError> {
        let scene = SceneDocument {
            models: models.to_vec(),
            camera,
            last_updated: now_millis(),
        };
        let document = match serde_json::to_value(&scene)? {
            Value::Object(document) => document,
            _ => return Err(StoreError::NotAnObject(self.key.clone())),
        };
        self.store.put(&self.key, document).await?;
        debug!(key = %self.key, models = scene.models.len(), "Saved scene");
        Ok(scene)
    }

    /// Point-update of one model's position and rotation.
    ///
    /// Only that model's entry changes in the stored `models` array; the
    /// camera and every other model keep their stored values. Returns
    /// `false` without writing when no document is stored yet.
    pub async fn update_model(
        &self,
        id: ModelId,
        position: Vec3,
        rotation: Vec3,
    ) -> Result<bool, StoreError> {
        let Some(stored) = self.load().await? else {
            debug!(key = %self.key, model = %id, "No stored scene to update");
            return Ok(false);
        };

        let models: Vec<ModelTransform> = stored
            .models
            .into_iter()
            .map(|model| {
                if model.id == id {
                    ModelTransform {
                        position,
                        rotation,
                        ..model
                    }
                } else {
                    model
                }
            })
            .collect();

        let mut fields = Document::new();
        fields.insert("models".to_string(), serde_json::to_value(&models)?);
        fields.insert("lastUpdated".to_string(), Value::from(now_millis()));
        self.store.patch(&self.key, fields).await?;

        debug!(key = %self.key, model = %id, "Updated stored model");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::{compute_camera_framing, initial_layout, reset_layout};
    use hearth_store::MemoryStore;
    use serde_json::json;

    fn gateway() -> SceneGateway<MemoryStore> {
        SceneGateway::new(Arc::new(MemoryStore::new()), "scenes/scene_data")
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let gateway = gateway();
        assert!(gateway.load().await.unwrap().is_none());

        for scene in [initial_layout(), reset_layout()] {
            let saved = gateway.save(&scene.models, scene.camera).await.unwrap();
            let loaded = gateway.load().await.unwrap().unwrap();

            assert!(loaded.same_content(&scene));
            assert_eq!(loaded, saved);
            assert!(loaded.last_updated > 0);
        }
    }

    #[tokio::test]
    async fn test_timestamp_does_not_go_backwards() {
        let gateway = gateway();
        let scene = initial_layout();

        let first = gateway.save(&scene.models, scene.camera).await.unwrap();
        let second = gateway.save(&scene.models, scene.camera).await.unwrap();
        assert!(second.last_updated >= first.last_updated);
    }

    #[tokio::test]
    async fn test_update_model_touches_only_that_model() {
        let gateway = gateway();
        let scene = initial_layout();
        gateway.save(&scene.models, scene.camera).await.unwrap();

        let updated = gateway
            .update_model(ModelId::Kitchen2, [7.0, 0.0, 1.0], [0.0, 0.5, 0.0])
            .await
            .unwrap();
        assert!(updated);

        let loaded = gateway.load().await.unwrap().unwrap();
        assert_eq!(loaded.models[0], scene.models[0]);
        assert_eq!(loaded.models[1].position, [7.0, 0.0, 1.0]);
        assert_eq!(loaded.models[1].rotation, [0.0, 0.5, 0.0]);
        assert_eq!(loaded.models[1].scale, [1.0, 1.0, 1.0]);
        // A point-update never reframes the stored camera
        assert_eq!(loaded.camera, scene.camera);
        assert_ne!(loaded.camera, compute_camera_framing(&loaded.models));
    }

    #[tokio::test]
    async fn test_update_model_without_document() {
        let gateway = gateway();
        let updated = gateway
            .update_model(ModelId::Kitchen1, [1.0, 0.0, 0.0], [0.0; 3])
            .await
            .unwrap();
        assert!(!updated);
        assert!(gateway.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_load_fills_defaults_from_loose_document() {
        let gateway = gateway();
        gateway
            .store()
            .put(
                gateway.key(),
                json!({ "models": [{ "id": "kitchen1", "position": [1, 2, 3] }] })
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .await
            .unwrap();

        let loaded = gateway.load().await.unwrap().unwrap();
        assert_eq!(loaded.models.len(), 1);
        assert_eq!(loaded.models[0].scale, [1.0, 1.0, 1.0]);
        assert_eq!(loaded.camera, CameraFraming::FALLBACK);
    }
}
