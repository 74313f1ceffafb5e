//! Kinematic Tree Core
//!
//! This crate contains the kinematic tree model and the tree-to-tree stages
//! that run before a robot description can be visualized:
//! - KinematicTree: validated arena of links and joints
//! - Fixed-joint collapsing (merging fixed children into their parent link)
//! - Joint-axis normalization onto a canonical axis
//! - URDF import

pub mod collapse;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod import;
pub mod inertia;
pub mod normalize;
pub mod pose;
pub mod tree;

pub use constants::*;
pub use error::*;
pub use geometry::*;
pub use import::*;
pub use inertia::*;
pub use normalize::*;
pub use pose::*;
pub use tree::*;
