//! Hearth Editor - Scene state and interaction handling
//!
//! This crate holds the editing core that sits between the viewport and
//! the document store:
//! - [`SceneController`]: live model transforms, camera framing, the
//!   selection and the immediate/debounced save paths
//! - [`InteractionHandler`]: select/drag/rotate state machine turning
//!   pointer and key input into [`Intent`]s; owned by the controller
//! - [`SceneWriter`]: background task applying store writes in order
//! - [`SceneGateway`]: typed scene reads, full saves and point-updates
//! - [`EditorConfig`]: TOML configuration and store selection
//!
//! Rendering, picking and page layout live outside this crate.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod gateway;
pub mod interaction;
pub mod writer;

pub use config::{load_config, ConfigError, EditorConfig, EditorSettings, StoreBackend, StoreConfig};
pub use controller::SceneController;
pub use debounce::DebouncedTask;
pub use gateway::SceneGateway;
pub use interaction::{Axis, CursorHint, Intent, InteractionHandler, InteractionSettings, InteractionState};
pub use writer::SceneWriter;
