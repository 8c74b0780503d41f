//! Pointer and keyboard interaction state machine
//!
//! Translates raw viewport input into transform intents for the scene
//! controller. One model can be selected at a time:
//!
//! ```text
//! Idle --pointer down--> Dragging --pointer up--> Selected --deselect--> Idle
//!                           ^                        |
//!                           +------pointer down------+
//! ```
//!
//! Selecting and dragging are one gesture: pressing on a model selects it
//! and starts a drag immediately. Releasing the pointer anywhere in the
//! viewport ends the drag but keeps the selection.

use glam::DVec2;
use hearth_core::{CollisionGuard, ModelId, ModelTransform, Vec3};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::EditorSettings;

/// Change requested by an interaction, consumed by the scene controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Selection changed (`None` clears it)
    Select(Option<ModelId>),
    DragStarted(ModelId),
    Move {
        id: ModelId,
        position: Vec3,
        dragging: bool,
    },
    DragEnded(ModelId),
    Rotate { id: ModelId, rotation: Vec3 },
}

/// Rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Key binding: `Q` rotates about X, `W` about Y, `E` about Z
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "q" | "Q" => Some(Self::X),
            "w" | "W" => Some(Self::Y),
            "e" | "E" => Some(Self::Z),
            _ => None,
        }
    }
}

/// Cursor shape the viewport should show. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Grab,
    Grabbing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    id: ModelId,
    /// Pointer at drag start, normalized device coordinates
    start_pointer: DVec2,
    /// Model position at drag start
    start_position: Vec3,
}

/// Current interaction state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    Selected(ModelId),
    Dragging(ModelId),
}

/// Tunables for the interaction handler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSettings {
    /// World units moved per unit of pointer displacement
    pub movement_scale: f64,
    /// Radians per rotation key press
    pub key_step: f64,
    /// Radians per control point click
    pub control_step: f64,
    /// Drag collision guard; `None` disables it
    pub collision: Option<CollisionGuard>,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self::from(&EditorSettings::default())
    }
}

impl From<&EditorSettings> for InteractionSettings {
    fn from(settings: &EditorSettings) -> Self {
        Self {
            movement_scale: settings.movement_scale,
            key_step: settings.key_rotation_deg.to_radians(),
            control_step: settings.control_rotation_deg.to_radians(),
            collision: settings.collision(),
        }
    }
}

/// Interprets pointer and keyboard input for the placed models
#[derive(Debug, Clone)]
pub struct InteractionHandler {
    settings: InteractionSettings,
    selected: Option<ModelId>,
    drag: Option<Drag>,
    hovered: Option<ModelId>,
}

impl InteractionHandler {
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            settings,
            selected: None,
            drag: None,
            hovered: None,
        }
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn state(&self) -> InteractionState {
        match (self.drag, self.selected) {
            (Some(drag), _) => InteractionState::Dragging(drag.id),
            (None, Some(id)) => InteractionState::Selected(id),
            (None, None) => InteractionState::Idle,
        }
    }

    pub fn selected(&self) -> Option<ModelId> {
        self.selected
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer entered (`Some`) or left (`None`) a model's hit region
    pub fn set_hovered(&mut self, id: Option<ModelId>) {
        self.hovered = id;
    }

    pub fn cursor(&self) -> CursorHint {
        if self.drag.is_some() {
            CursorHint::Grabbing
        } else if self.hovered.is_some() {
            CursorHint::Grab
        } else {
            CursorHint::Default
        }
    }

    /// Pointer pressed on a model: select it and start dragging from its
    /// current position.
    pub fn pointer_down(
        &mut self,
        id: ModelId,
        pointer: DVec2,
        models: &[ModelTransform],
    ) -> Vec<Intent> {
        let Some(model) = models.iter().find(|m| m.id == id) else {
            return Vec::new();
        };

        self.selected = Some(id);
        self.drag = Some(Drag {
            id,
            start_pointer: pointer,
            start_position: model.position,
        });

        vec![Intent::Select(Some(id)), Intent::DragStarted(id)]
    }

    /// Called once per rendered frame with the current pointer. While
    /// dragging, proposes a new position on the horizontal plane; proposals
    /// that collide with another model are dropped.
    pub fn frame(&mut self, pointer: DVec2, models: &[ModelTransform]) -> Option<Intent> {
        let drag = self.drag?;
        if !models.iter().any(|m| m.id == drag.id) {
            return None;
        }

        let delta = (pointer - drag.start_pointer) * self.settings.movement_scale;
        let candidate = [
            drag.start_position[0] + delta.x,
            drag.start_position[1],
            drag.start_position[2] - delta.y,
        ];

        if let Some(guard) = &self.settings.collision {
            if guard.collides(drag.id, candidate, models) {
                trace!(model = %drag.id, ?candidate, "Rejected colliding drag position");
                return None;
            }
        }

        Some(Intent::Move {
            id: drag.id,
            position: candidate,
            dragging: true,
        })
    }

    /// Pointer released anywhere in the viewport
    pub fn pointer_up(&mut self) -> Option<Intent> {
        let drag = self.drag.take()?;
        Some(Intent::DragEnded(drag.id))
    }

    /// Rotation key pressed. Ignored unless a model is selected.
    pub fn key_pressed(&mut self, key: &str, models: &[ModelTransform]) -> Option<Intent> {
        let axis = Axis::from_key(key)?;
        self.rotate(axis, self.settings.key_step, models)
    }

    /// On-model rotation control clicked. Never starts a drag.
    pub fn control_point_clicked(
        &mut self,
        axis: Axis,
        models: &[ModelTransform],
    ) -> Option<Intent> {
        self.rotate(axis, self.settings.control_step, models)
    }

    /// Select a model directly, or clear with `None`. Any drag in progress
    /// is dropped without a `DragEnded`.
    pub fn select(&mut self, id: Option<ModelId>) {
        if self.drag.is_some_and(|drag| Some(drag.id) != id) {
            self.drag = None;
        }
        self.selected = id;
    }

    /// Clear the selection, ending any drag in progress
    pub fn deselect(&mut self) -> Vec<Intent> {
        let mut intents = Vec::new();
        if let Some(intent) = self.pointer_up() {
            intents.push(intent);
        }
        if self.selected.take().is_some() {
            intents.push(Intent::Select(None));
        }
        intents
    }

    fn rotate(&self, axis: Axis, step: f64, models: &[ModelTransform]) -> Option<Intent> {
        let id = self.selected?;
        let model = models.iter().find(|m| m.id == id)?;

        let mut rotation = model.rotation;
        rotation[axis.index()] += step;
        Some(Intent::Rotate { id, rotation })
    }
}

impl Default for InteractionHandler {
    fn default() -> Self {
        Self::new(InteractionSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models() -> Vec<ModelTransform> {
        vec![
            ModelTransform::new(ModelId::Kitchen1, [-4.0, 0.0, 0.0], [0.0; 3]),
            ModelTransform::new(ModelId::Kitchen2, [4.0, 0.0, 0.0], [0.0; 3]),
        ]
    }

    #[test]
    fn test_pointer_down_selects_and_drags() {
        let mut handler = InteractionHandler::default();
        assert_eq!(handler.state(), InteractionState::Idle);

        let intents = handler.pointer_down(ModelId::Kitchen1, DVec2::ZERO, &models());
        assert_eq!(
            intents,
            vec![
                Intent::Select(Some(ModelId::Kitchen1)),
                Intent::DragStarted(ModelId::Kitchen1)
            ]
        );
        assert_eq!(handler.state(), InteractionState::Dragging(ModelId::Kitchen1));
        assert_eq!(handler.cursor(), CursorHint::Grabbing);
    }

    #[test]
    fn test_pointer_down_on_absent_model() {
        let mut handler = InteractionHandler::default();
        let only_one = vec![models()[0]];
        assert!(handler
            .pointer_down(ModelId::Kitchen2, DVec2::ZERO, &only_one)
            .is_empty());
        assert_eq!(handler.state(), InteractionState::Idle);
    }

    #[test]
    fn test_drag_moves_on_ground_plane() {
        let mut handler = InteractionHandler::default();
        let models = models();
        handler.pointer_down(ModelId::Kitchen1, DVec2::new(0.5, 0.5), &models);

        let intent = handler.frame(DVec2::new(0.25, 0.75), &models).unwrap();
        assert_eq!(
            intent,
            Intent::Move {
                id: ModelId::Kitchen1,
                position: [-5.25, 0.0, -1.25],
                dragging: true,
            }
        );
    }

    #[test]
    fn test_frame_without_drag() {
        let mut handler = InteractionHandler::default();
        assert!(handler.frame(DVec2::new(1.0, 1.0), &models()).is_none());
    }

    #[test]
    fn test_collision_rejects_move() {
        let mut handler = InteractionHandler::default();
        let models = models();
        handler.pointer_down(ModelId::Kitchen1, DVec2::ZERO, &models);

        // +1.0 NDC -> +5 world units, landing 3 units from kitchen2
        assert!(handler.frame(DVec2::new(1.0, 0.0), &models).is_none());
        assert_eq!(handler.state(), InteractionState::Dragging(ModelId::Kitchen1));

        // +0.8 NDC -> exactly 4 units apart, allowed
        assert!(handler.frame(DVec2::new(0.8, 0.0), &models).is_some());
    }

    #[test]
    fn test_collision_guard_disabled() {
        let settings = InteractionSettings {
            collision: None,
            ..InteractionSettings::default()
        };
        let mut handler = InteractionHandler::new(settings);
        let models = models();
        handler.pointer_down(ModelId::Kitchen1, DVec2::ZERO, &models);

        let intent = handler.frame(DVec2::new(1.6, 0.0), &models).unwrap();
        assert!(matches!(
            intent,
            Intent::Move { position, .. } if position == [4.0, 0.0, 0.0]
        ));
    }

    #[test]
    fn test_pointer_up_keeps_selection() {
        let mut handler = InteractionHandler::default();
        handler.pointer_down(ModelId::Kitchen2, DVec2::ZERO, &models());

        assert_eq!(handler.pointer_up(), Some(Intent::DragEnded(ModelId::Kitchen2)));
        assert_eq!(handler.state(), InteractionState::Selected(ModelId::Kitchen2));
        assert_eq!(handler.pointer_up(), None);
        assert_eq!(handler.cursor(), CursorHint::Default);
    }

    #[test]
    fn test_key_rotation() {
        let mut handler = InteractionHandler::default();
        let models = models();
        assert!(handler.key_pressed("w", &models).is_none());

        handler.pointer_down(ModelId::Kitchen1, DVec2::ZERO, &models);
        handler.pointer_up();

        let Some(Intent::Rotate { id, rotation }) = handler.key_pressed("W", &models) else {
            panic!("expected rotation");
        };
        assert_eq!(id, ModelId::Kitchen1);
        assert!((rotation[1] - 15f64.to_radians()).abs() < 1e-12);
        assert_eq!(rotation[0], 0.0);

        let Some(Intent::Rotate { rotation, .. }) = handler.key_pressed("q", &models) else {
            panic!("expected rotation");
        };
        assert!((rotation[0] - 15f64.to_radians()).abs() < 1e-12);

        assert!(handler.key_pressed("x", &models).is_none());
    }

    #[test]
    fn test_control_point_rotation() {
        let mut handler = InteractionHandler::default();
        let models = models();
        handler.pointer_down(ModelId::Kitchen2, DVec2::ZERO, &models);
        handler.pointer_up();

        let Some(Intent::Rotate { id, rotation }) =
            handler.control_point_clicked(Axis::Z, &models)
        else {
            panic!("expected rotation");
        };
        assert_eq!(id, ModelId::Kitchen2);
        assert!((rotation[2] - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert!(!handler.is_dragging());
    }

    #[test]
    fn test_deselect_ends_drag() {
        let mut handler = InteractionHandler::default();
        handler.pointer_down(ModelId::Kitchen1, DVec2::ZERO, &models());

        assert_eq!(
            handler.deselect(),
            vec![Intent::DragEnded(ModelId::Kitchen1), Intent::Select(None)]
        );
        assert_eq!(handler.state(), InteractionState::Idle);
        assert!(handler.deselect().is_empty());
    }

    #[test]
    fn test_direct_select() {
        let mut handler = InteractionHandler::default();
        let models = models();
        handler.pointer_down(ModelId::Kitchen1, DVec2::ZERO, &models);

        handler.select(Some(ModelId::Kitchen2));
        assert_eq!(handler.state(), InteractionState::Selected(ModelId::Kitchen2));
        assert!(handler.pointer_up().is_none());

        handler.select(None);
        assert_eq!(handler.state(), InteractionState::Idle);
        assert!(handler.key_pressed("w", &models).is_none());
    }

    #[test]
    fn test_hover_cursor() {
        let mut handler = InteractionHandler::default();
        handler.set_hovered(Some(ModelId::Kitchen1));
        assert_eq!(handler.cursor(), CursorHint::Grab);
        handler.set_hovered(None);
        assert_eq!(handler.cursor(), CursorHint::Default);
    }
}
