//! Hearth Core - Scene document types and scene geometry
//!
//! This crate provides the foundational types for the Hearth editor:
//! - Scene document model (model transforms, camera framing, timestamps)
//! - Schema decoding that fills defaults for missing or malformed fields
//! - Camera auto-framing derived from model positions
//! - Collision predicate used while dragging models
//! - Hardcoded initial and reset layouts

pub mod collision;
pub mod framing;
pub mod layout;
pub mod scene;

pub use collision::CollisionGuard;
pub use framing::{compute_camera_framing, viewer_camera, ViewMode};
pub use layout::{initial_layout, reset_layout};
pub use scene::{
    now_millis, CameraFraming, ModelId, ModelTransform, SceneDocument, UnknownModelId, Vec3,
};
