//! Background scene writer
//!
//! Store writes run on one spawned task fed by a channel, so a slow or
//! unreachable store never holds up editing. Writes are applied strictly
//! in the order they were queued.

use hearth_core::{CameraFraming, ModelId, ModelTransform, Vec3};
use hearth_store::DocumentStore;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::gateway::SceneGateway;

enum Write {
    /// Point-update of one stored model
    Model {
        id: ModelId,
        position: Vec3,
        rotation: Vec3,
    },
    /// Full save of the scene
    Scene {
        models: Vec<ModelTransform>,
        camera: CameraFraming,
    },
    /// Answered once every write queued before it has finished
    Flush(oneshot::Sender<()>),
}

/// Handle to the writer task. Clones share the same queue; the task exits
/// after the last handle is dropped and the queue has drained.
#[derive(Clone)]
pub struct SceneWriter {
    queue: mpsc::UnboundedSender<Write>,
    last_saved: Arc<AtomicI64>,
}

impl SceneWriter {
    /// Spawn the writer task for `gateway`. Must be called from within a
    /// Tokio runtime.
    pub fn spawn<S: DocumentStore>(gateway: SceneGateway<S>) -> Self {
        let (queue, writes) = mpsc::unbounded_channel();
        let last_saved = Arc::new(AtomicI64::new(0));

        tokio::spawn(run(gateway, writes, last_saved.clone()));

        Self { queue, last_saved }
    }

    /// Queue a point-update of one model
    pub fn update_model(&self, id: ModelId, position: Vec3, rotation: Vec3) {
        self.send(Write::Model {
            id,
            position,
            rotation,
        });
    }

    /// Queue a full save
    pub fn save(&self, models: Vec<ModelTransform>, camera: CameraFraming) {
        self.send(Write::Scene { models, camera });
    }

    /// Wait until every write queued so far has been attempted
    pub async fn flush(&self) {
        let (done, finished) = oneshot::channel();
        self.send(Write::Flush(done));
        let _ = finished.await;
    }

    /// `lastUpdated` of the most recent successful full save, 0 if none
    pub fn last_saved(&self) -> i64 {
        self.last_saved.load(Ordering::Relaxed)
    }

    fn send(&self, write: Write) {
        if self.queue.send(write).is_err() {
            warn!("Scene writer stopped, dropping write");
        }
    }
}

async fn run<S: DocumentStore>(
    gateway: SceneGateway<S>,
    mut writes: mpsc::UnboundedReceiver<Write>,
    last_saved: Arc<AtomicI64>,
) {
    while let Some(write) = writes.recv().await {
        match write {
            Write::Model {
                id,
                position,
                rotation,
            } => {
                if let Err(e) = gateway.update_model(id, position, rotation).await {
                    warn!(model = %id, error = %e, "Failed to update stored model");
                }
            }
            Write::Scene { models, camera } => match gateway.save(&models, camera).await {
                Ok(saved) => last_saved.store(saved.last_updated, Ordering::Relaxed),
                Err(e) => warn!(key = %gateway.key(), error = %e, "Failed to save scene"),
            },
            Write::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!(key = %gateway.key(), "Scene writer stopped");
}
