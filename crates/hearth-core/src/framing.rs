//! Camera auto-framing
//!
//! The camera is never authored directly: it is derived from the model set.
//! The eye sits at a fixed height, pulled back along +Z from the models'
//! ground-plane centroid far enough to keep the widest model in view.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::scene::{CameraFraming, ModelTransform, Vec3};

/// Eye height of the derived perspective camera
pub const FRAMING_HEIGHT: f64 = 3.0;
/// Closest the derived camera ever sits to the centroid
pub const MIN_FRAMING_DISTANCE: f64 = 8.0;
/// Multiplier applied to the largest radial spread
pub const SPREAD_FACTOR: f64 = 2.0;
/// Overhead eye used by the top-down view
pub const TOP_DOWN_EYE: Vec3 = [0.0, 20.0, 0.0];

/// How the viewport projects the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// 3D perspective view framed on the models
    #[default]
    Perspective,
    /// 2D orthographic view looking straight down
    TopDown,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Perspective => Self::TopDown,
            Self::TopDown => Self::Perspective,
        }
    }
}

/// Compute the camera framing for a model set.
///
/// Pure and deterministic: depends only on the model positions.
pub fn compute_camera_framing(models: &[ModelTransform]) -> CameraFraming {
    if models.is_empty() {
        return CameraFraming::FALLBACK;
    }

    let ground: Vec<DVec2> = models
        .iter()
        .map(|m| DVec2::new(m.position[0], m.position[2]))
        .collect();
    let centroid = ground.iter().copied().sum::<DVec2>() / ground.len() as f64;

    let spread = ground
        .iter()
        .map(|p| p.distance(centroid))
        .fold(0.0_f64, f64::max);
    let distance = MIN_FRAMING_DISTANCE.max(spread * SPREAD_FACTOR);

    CameraFraming {
        position: [centroid.x, FRAMING_HEIGHT, centroid.y + distance],
        target: [centroid.x, 0.0, centroid.y],
    }
}

/// The camera the viewport should render with.
///
/// The top-down view pins the eye overhead regardless of the models.
pub fn viewer_camera(mode: ViewMode, framing: &CameraFraming) -> CameraFraming {
    match mode {
        ViewMode::Perspective => *framing,
        ViewMode::TopDown => CameraFraming {
            position: TOP_DOWN_EYE,
            target: [0.0, 0.0, 0.0],
        },
    }
}
