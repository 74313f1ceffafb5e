//! Scene-graph emission
//!
//! Turns a [`kt_core::KinematicTree`] into a hierarchy of [`SceneNode`]s ready
//! for an external viewer:
//! - one node per link, positioned by its incoming joint
//! - visual geometry converted to primitives, meshes resolved to files
//! - optional cylinder markers along actuated joint axes
//!
//! Geometry that cannot be converted is skipped and reported, never fatal.

pub mod emit;
pub mod error;
pub mod mesh;
pub mod node;
pub mod resolve;

pub use emit::{DEFAULT_AXES_COLOR, EmitOptions, Emission, emit_scene, marker_rotation};
pub use error::{ConversionError, ConversionErrorKind, MeshError};
pub use mesh::{load_mesh, load_obj, load_stl};
pub use node::{GeometryAttachment, Marker, SceneNode, SceneStats, Shape, TriangleMesh};
pub use resolve::{MeshFormat, MeshResolver, discover_ros_packages};
