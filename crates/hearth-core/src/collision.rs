//! Drag collision predicate
//!
//! Models are treated as spheres of a fixed radius around their origin. A
//! proposed position is rejected outright when it would overlap another
//! model; there is no push-out or sliding.

use glam::DVec3;

use crate::scene::{ModelId, ModelTransform, Vec3};

/// Default bounding radius of a model in world units
pub const DEFAULT_MODEL_RADIUS: f64 = 2.0;

/// Rejects positions closer than two model radii to any other model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionGuard {
    model_radius: f64,
}

impl Default for CollisionGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_RADIUS)
    }
}

impl CollisionGuard {
    pub fn new(model_radius: f64) -> Self {
        Self { model_radius }
    }

    /// Minimum allowed center-to-center distance
    pub fn min_separation(&self) -> f64 {
        self.model_radius * 2.0
    }

    /// Whether moving `id` to `candidate` would bring it too close to any
    /// other model in `models`
    pub fn collides(&self, id: ModelId, candidate: Vec3, models: &[ModelTransform]) -> bool {
        let candidate = DVec3::from_array(candidate);
        let min = self.min_separation();
        models
            .iter()
            .filter(|other| other.id != id)
            .any(|other| candidate.distance(DVec3::from_array(other.position)) < min)
    }
}
