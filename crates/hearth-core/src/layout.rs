//! Hardcoded scene layouts

use std::f64::consts::PI;

use crate::framing::compute_camera_framing;
use crate::scene::{CameraFraming, ModelId, ModelTransform, SceneDocument};

/// Layout used when nothing has been persisted yet or the store is
/// unreachable
pub fn initial_layout() -> SceneDocument {
    SceneDocument::new(
        vec![
            ModelTransform::new(ModelId::Kitchen1, [-4.0, 0.0, 0.0], [0.0, PI, 0.0]),
            ModelTransform::new(ModelId::Kitchen2, [4.0, 0.0, 0.0], [0.0, PI, 0.0]),
        ],
        CameraFraming::FALLBACK,
    )
}

/// Layout applied by the "reset scene" action. The camera is framed on the
/// models like any other position change.
pub fn reset_layout() -> SceneDocument {
    let models = vec![
        ModelTransform::new(ModelId::Kitchen1, [-4.0, 0.5, 0.0], [0.0, PI / -1.9, 0.0]),
        ModelTransform::new(ModelId::Kitchen2, [4.0, 1.5, 4.0], [0.0, -1.7, 0.0]),
    ];
    let camera = compute_camera_framing(&models);
    SceneDocument::new(models, camera)
}
