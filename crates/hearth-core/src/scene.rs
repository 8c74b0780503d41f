//! Scene document types
//!
//! A scene document is the unit of persistence: the ordered list of model
//! transforms, the derived camera framing and a last-updated timestamp.
//! Stored documents are never trusted: [`SceneDocument::from_value`] decodes
//! whatever shape it is given and fills defaults for anything missing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Three floats in world units (position, scale) or radians (rotation)
pub type Vec3 = [f64; 3];

const DEFAULT_POSITION: Vec3 = [0.0, 0.0, 0.0];
const DEFAULT_ROTATION: Vec3 = [0.0, 0.0, 0.0];
const DEFAULT_SCALE: Vec3 = [1.0, 1.0, 1.0];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown model identifier: {0}")]
pub struct UnknownModelId(pub String);

/// Identifier of a placeable model. The set is fixed; models are never
/// created or destroyed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelId {
    Kitchen1,
    Kitchen2,
}

impl ModelId {
    /// Every model identifier, in layout order
    pub const ALL: [ModelId; 2] = [ModelId::Kitchen1, ModelId::Kitchen2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kitchen1 => "kitchen1",
            Self::Kitchen2 => "kitchen2",
        }
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = UnknownModelId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownModelId(s.to_string()))
    }
}

/// Pose of a placed model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelTransform {
    pub id: ModelId,
    /// World-space position
    pub position: Vec3,
    /// Euler angles in radians
    pub rotation: Vec3,
    /// Per-axis scale multiplier
    pub scale: Vec3,
}

impl ModelTransform {
    pub fn new(id: ModelId, position: Vec3, rotation: Vec3) -> Self {
        Self {
            id,
            position,
            rotation,
            scale: DEFAULT_SCALE,
        }
    }

    fn from_object(object: &Map<String, Value>) -> Option<Self> {
        let id = match object.get("id").and_then(Value::as_str) {
            Some(raw) => match raw.parse::<ModelId>() {
                Ok(id) => id,
                Err(e) => {
                    warn!(error = %e, "Dropping stored model with unknown id");
                    return None;
                }
            },
            None => {
                warn!("Dropping stored model without an id");
                return None;
            }
        };

        Some(Self {
            id,
            position: vec3_field(object, "position", DEFAULT_POSITION),
            rotation: vec3_field(object, "rotation", DEFAULT_ROTATION),
            scale: vec3_field(object, "scale", DEFAULT_SCALE),
        })
    }
}

/// Viewer vantage: eye position and look-at target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFraming {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraFraming {
    /// Camera used when there is nothing to frame
    pub const FALLBACK: CameraFraming = CameraFraming {
        position: [5.0, 5.0, 5.0],
        target: [0.0, 0.0, 0.0],
    };

    fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_object) {
            Some(object) => Self {
                position: vec3_field(object, "position", Self::FALLBACK.position),
                target: vec3_field(object, "target", Self::FALLBACK.target),
            },
            None => Self::FALLBACK,
        }
    }
}

impl Default for CameraFraming {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// The persisted scene record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Model transforms in insertion order
    pub models: Vec<ModelTransform>,
    pub camera: CameraFraming,
    /// Milliseconds since the Unix epoch
    #[serde(rename = "lastUpdated")]
    pub last_updated: i64,
}

impl SceneDocument {
    pub fn new(models: Vec<ModelTransform>, camera: CameraFraming) -> Self {
        Self {
            models,
            camera,
            last_updated: 0,
        }
    }

    /// Decode a stored document, filling defaults for missing or malformed
    /// fields. Entries with unknown ids are dropped and duplicate ids keep
    /// their first occurrence.
    pub fn from_value(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            warn!("Stored scene document is not an object, using empty scene");
            return Self::new(Vec::new(), CameraFraming::FALLBACK);
        };

        let mut models: Vec<ModelTransform> = Vec::new();
        if let Some(entries) = root.get("models").and_then(Value::as_array) {
            for entry in entries {
                let Some(model) = entry.as_object().and_then(ModelTransform::from_object) else {
                    continue;
                };
                if models.iter().any(|m| m.id == model.id) {
                    warn!(model = %model.id, "Dropping duplicate stored model");
                    continue;
                }
                models.push(model);
            }
        }

        Self {
            models,
            camera: CameraFraming::from_value(root.get("camera")),
            last_updated: root.get("lastUpdated").and_then(Value::as_i64).unwrap_or(0),
        }
    }

    /// Find a model by id
    pub fn model(&self, id: ModelId) -> Option<&ModelTransform> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Find a model by id for mutation
    pub fn model_mut(&mut self, id: ModelId) -> Option<&mut ModelTransform> {
        self.models.iter_mut().find(|m| m.id == id)
    }

    /// Compare two documents ignoring the timestamp
    pub fn same_content(&self, other: &SceneDocument) -> bool {
        self.models == other.models && self.camera == other.camera
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn vec3_field(object: &Map<String, Value>, field: &str, default: Vec3) -> Vec3 {
    object.get(field).and_then(parse_vec3).unwrap_or(default)
}

/// Parse an array of exactly three finite numbers
fn parse_vec3(value: &Value) -> Option<Vec3> {
    let items = value.as_array()?;
    if items.len() != 3 {
        return None;
    }
    let mut out = [0.0; 3];
    for (slot, item) in out.iter_mut().zip(items) {
        let v = item.as_f64()?;
        if !v.is_finite() {
            return None;
        }
        *slot = v;
    }
    Some(out)
}
