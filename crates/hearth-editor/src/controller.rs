//! Scene state controller
//!
//! Owns the live model list, camera framing and the interaction state.
//! Every transform change goes through here: the controller applies it in
//! memory, reframes the camera and queues the matching save.
//!
//! Persistence never blocks editing. Writes are queued to a background
//! [`SceneWriter`] and the editing methods return as soon as memory is
//! updated. Read failures fall back to the initial layout and write
//! failures are logged; in-memory state stays authoritative either way.
//!
//! Save paths:
//! - committed move: point-update of the model, then a full save
//! - drag move: debounced full save of the state captured at that call
//! - rotation: point-update only
//! - drag end: pending debounced save cancelled, one full save

use glam::DVec2;
use hearth_core::{
    compute_camera_framing, initial_layout, reset_layout, viewer_camera, CameraFraming, ModelId,
    ModelTransform, SceneDocument, Vec3, ViewMode,
};
use hearth_store::DocumentStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::EditorSettings;
use crate::debounce::DebouncedTask;
use crate::gateway::SceneGateway;
use crate::interaction::{Axis, CursorHint, Intent, InteractionHandler, InteractionSettings};
use crate::writer::SceneWriter;

/// Live scene state bound to one stored scene document
pub struct SceneController<S: DocumentStore> {
    gateway: SceneGateway<S>,
    writer: SceneWriter,
    debounce_delay: Duration,
    models: Vec<ModelTransform>,
    camera: CameraFraming,
    /// `lastUpdated` of the document this controller last loaded
    loaded_at: i64,
    view_mode: ViewMode,
    interaction: InteractionHandler,
    pending_save: DebouncedTask,
}

impl<S: DocumentStore> SceneController<S> {
    /// Create a controller over `store`. State is empty until [`load`]
    /// is called. Spawns the background writer, so this must run inside a
    /// Tokio runtime.
    ///
    /// [`load`]: SceneController::load
    pub fn new(store: Arc<S>, settings: &EditorSettings) -> Self {
        let gateway = SceneGateway::new(store, settings.document_key.clone());
        Self {
            writer: SceneWriter::spawn(gateway.clone()),
            gateway,
            debounce_delay: settings.debounce_delay(),
            models: Vec::new(),
            camera: CameraFraming::FALLBACK,
            loaded_at: 0,
            view_mode: ViewMode::default(),
            interaction: InteractionHandler::new(InteractionSettings::from(settings)),
            pending_save: DebouncedTask::new(),
        }
    }

    pub fn gateway(&self) -> &SceneGateway<S> {
        &self.gateway
    }

    pub fn models(&self) -> &[ModelTransform] {
        &self.models
    }

    pub fn model(&self, id: ModelId) -> Option<&ModelTransform> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Derived camera framing, independent of the view mode
    pub fn camera(&self) -> CameraFraming {
        self.camera
    }

    /// Snapshot of the live state as a document
    pub fn document(&self) -> SceneDocument {
        SceneDocument {
            models: self.models.clone(),
            camera: self.camera,
            last_updated: self.loaded_at.max(self.writer.last_saved()),
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode != mode {
            debug!(?mode, "View mode changed");
            self.view_mode = mode;
        }
    }

    /// Camera the viewport should render with in the current view mode
    pub fn viewer_camera(&self) -> CameraFraming {
        viewer_camera(self.view_mode, &self.camera)
    }

    pub fn interaction(&self) -> &InteractionHandler {
        &self.interaction
    }

    pub fn selected(&self) -> Option<ModelId> {
        self.interaction.selected()
    }

    /// Select a model, or clear with `None`. Ids not in the current model
    /// set clear the selection.
    pub fn select(&mut self, id: Option<ModelId>) {
        let id = id.filter(|id| self.model(*id).is_some());
        self.interaction.select(id);
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_dragging()
    }

    /// Whether a debounced save is scheduled and has not fired yet
    pub fn is_save_pending(&self) -> bool {
        self.pending_save.is_pending()
    }

    /// Hydrate from the store.
    ///
    /// Falls back to the initial layout when nothing is stored or the read
    /// fails; never returns an error. An absent document is seeded with the
    /// initial layout so later point-updates have something to merge into.
    pub async fn load(&mut self) -> SceneDocument {
        self.pending_save.cancel();

        match self.gateway.load().await {
            Ok(Some(stored)) => {
                info!(
                    key = %self.gateway.key(),
                    models = stored.models.len(),
                    "Loaded scene"
                );
                self.hydrate(stored);
            }
            Ok(None) => {
                info!(key = %self.gateway.key(), "No stored scene, using initial layout");
                self.hydrate(initial_layout());
                self.save_now();
            }
            Err(e) => {
                warn!(
                    key = %self.gateway.key(),
                    error = %e,
                    "Failed to load scene, using initial layout"
                );
                self.hydrate(initial_layout());
            }
        }

        self.document()
    }

    /// Replace the live state with the reset layout. Any pending drag save
    /// is dropped, the selection is cleared and nothing is written until
    /// the next save.
    pub fn reset(&mut self) -> SceneDocument {
        if self.pending_save.cancel() {
            debug!("Cancelled pending drag save on reset");
        }
        self.interaction.select(None);

        let layout = reset_layout();
        self.models = layout.models;
        self.camera = compute_camera_framing(&self.models);
        info!("Scene reset to default layout");
        self.document()
    }

    /// Move a model. Ids not in the current model set are ignored.
    ///
    /// A committed move (`is_dragging == false`) queues a point-update
    /// followed by a full save. A drag move schedules a debounced full save
    /// instead.
    pub fn update_position(&mut self, id: ModelId, position: Vec3, is_dragging: bool) {
        let Some(model) = self.models.iter_mut().find(|m| m.id == id) else {
            debug!(model = %id, "Ignoring position update for unknown model");
            return;
        };
        model.position = position;
        let rotation = model.rotation;
        self.camera = compute_camera_framing(&self.models);

        if is_dragging {
            self.schedule_save();
            return;
        }

        self.writer.update_model(id, position, rotation);
        self.save_now();
    }

    /// Rotate a model and queue its point-update. Ids not in the current
    /// model set are ignored.
    pub fn update_rotation(&mut self, id: ModelId, rotation: Vec3) {
        let Some(model) = self.models.iter_mut().find(|m| m.id == id) else {
            debug!(model = %id, "Ignoring rotation update for unknown model");
            return;
        };
        model.rotation = rotation;
        let position = model.position;

        self.writer.update_model(id, position, rotation);
    }

    /// Drag released: drop any pending debounced save and queue a full save
    /// of the current state.
    pub fn on_drag_end(&mut self) {
        if self.pending_save.cancel() {
            debug!("Cancelled pending drag save");
        }
        self.save_now();
    }

    /// Wait until every write queued so far has reached the store or
    /// failed. Debounced saves that have not fired yet are not waited for.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Pointer pressed on a model: select it and start dragging
    pub fn pointer_down(&mut self, id: ModelId, pointer: DVec2) {
        let intents = self.interaction.pointer_down(id, pointer, &self.models);
        intents.into_iter().for_each(|intent| self.apply(intent));
    }

    /// Per-frame pointer position while the pointer is down
    pub fn pointer_moved(&mut self, pointer: DVec2) {
        if let Some(intent) = self.interaction.frame(pointer, &self.models) {
            self.apply(intent);
        }
    }

    /// Pointer released anywhere in the viewport
    pub fn pointer_up(&mut self) {
        if let Some(intent) = self.interaction.pointer_up() {
            self.apply(intent);
        }
    }

    pub fn key_pressed(&mut self, key: &str) {
        if let Some(intent) = self.interaction.key_pressed(key, &self.models) {
            self.apply(intent);
        }
    }

    pub fn control_point_clicked(&mut self, axis: Axis) {
        if let Some(intent) = self.interaction.control_point_clicked(axis, &self.models) {
            self.apply(intent);
        }
    }

    /// Clear the selection, committing any drag in progress
    pub fn deselect(&mut self) {
        let intents = self.interaction.deselect();
        intents.into_iter().for_each(|intent| self.apply(intent));
    }

    pub fn set_hovered(&mut self, id: Option<ModelId>) {
        self.interaction.set_hovered(id);
    }

    pub fn cursor(&self) -> CursorHint {
        self.interaction.cursor()
    }

    /// Teardown: cancel any pending debounced save so nothing is written
    /// after the editor goes away. Dropping the controller does the same.
    /// Writes already queued still drain in the background.
    pub fn shutdown(&mut self) {
        if self.pending_save.cancel() {
            debug!("Cancelled pending save on shutdown");
        }
    }

    fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Select(id) => debug!(model = ?id, "Selection changed"),
            Intent::DragStarted(id) => debug!(model = %id, "Drag started"),
            Intent::Move {
                id,
                position,
                dragging,
            } => self.update_position(id, position, dragging),
            Intent::DragEnded(_) => self.on_drag_end(),
            Intent::Rotate { id, rotation } => self.update_rotation(id, rotation),
        }
    }

    fn save_now(&self) {
        self.writer.save(self.models.clone(), self.camera);
    }

    /// Schedule a full save of the current state after the debounce delay,
    /// replacing any save scheduled earlier
    fn schedule_save(&mut self) {
        let writer = self.writer.clone();
        let models = self.models.clone();
        let camera = self.camera;

        self.pending_save.reschedule(self.debounce_delay, async move {
            writer.save(models, camera);
        });
    }

    fn hydrate(&mut self, document: SceneDocument) {
        self.models = document.models;
        self.camera = if self.models.is_empty() {
            document.camera
        } else {
            compute_camera_framing(&self.models)
        };
        self.loaded_at = document.last_updated;
        if let Some(id) = self.interaction.selected() {
            if !self.models.iter().any(|m| m.id == id) {
                self.interaction.select(None);
            }
        }
    }
}
