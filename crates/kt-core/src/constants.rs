//! Global constants for kt-core

use glam::Vec3;

/// Default canonical axis joints are normalized onto
pub const DEFAULT_TARGET_AXIS: Vec3 = Vec3::Z;

/// Preferred vector for building the 180° rotation when a joint axis is
/// anti-parallel to the target axis
pub const ANTIPARALLEL_FALLBACK_AXIS: Vec3 = Vec3::X;

/// Squared length of `a × b` below which two unit axes are treated as parallel
pub const AXIS_PARALLEL_EPSILON: f32 = 1e-6;

/// Masses below this are treated as massless when merging inertials
pub const MASS_EPSILON: f32 = 1e-9;

/// Default color for visuals without a material (gray, RGBA)
pub const DEFAULT_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 1.0];
