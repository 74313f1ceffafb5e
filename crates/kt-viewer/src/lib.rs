//! Kinematic tree viewer driver
//!
//! Loads a URDF, optionally joins fixed links and rotates joint axes onto +Z,
//! then emits a scene graph and serializes it for an external viewer.

pub mod cli;
pub mod config;
pub mod pipeline;

pub use cli::Args;
pub use config::{OutputFormat, ViewerConfig};
pub use pipeline::{PipelineOutput, SceneDocument, run, run_tree};
