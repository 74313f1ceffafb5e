//! Geometry type definitions and conversions

use serde::{Deserialize, Serialize};

/// Geometry type for visual/collision elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeometryType {
    /// Mesh geometry referenced by URI (`package://`, `file://` or a plain path)
    Mesh {
        filename: String,
        /// Scale factor for the mesh (None means [1.0, 1.0, 1.0])
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scale: Option<[f32; 3]>,
    },
    Box {
        size: [f32; 3],
    },
    /// Cylinder along the local Z axis
    Cylinder {
        radius: f32,
        length: f32,
    },
    Sphere {
        radius: f32,
    },
    Capsule {
        radius: f32,
        length: f32,
    },
}

impl GeometryType {
    /// Short label used in logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            GeometryType::Mesh { .. } => "mesh",
            GeometryType::Box { .. } => "box",
            GeometryType::Cylinder { .. } => "cylinder",
            GeometryType::Sphere { .. } => "sphere",
            GeometryType::Capsule { .. } => "capsule",
        }
    }
}

impl From<&urdf_rs::Geometry> for GeometryType {
    fn from(geometry: &urdf_rs::Geometry) -> Self {
        match geometry {
            urdf_rs::Geometry::Mesh { filename, scale } => GeometryType::Mesh {
                filename: filename.clone(),
                scale: scale
                    .as_ref()
                    .map(|s| [s.0[0] as f32, s.0[1] as f32, s.0[2] as f32]),
            },
            urdf_rs::Geometry::Box { size } => GeometryType::Box {
                size: [size.0[0] as f32, size.0[1] as f32, size.0[2] as f32],
            },
            urdf_rs::Geometry::Cylinder { radius, length } => GeometryType::Cylinder {
                radius: *radius as f32,
                length: *length as f32,
            },
            urdf_rs::Geometry::Sphere { radius } => GeometryType::Sphere {
                radius: *radius as f32,
            },
            urdf_rs::Geometry::Capsule { radius, length } => GeometryType::Capsule {
                radius: *radius as f32,
                length: *length as f32,
            },
        }
    }
}
