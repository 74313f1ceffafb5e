//! Scene-graph node types

use std::path::PathBuf;

use glam::Vec3;
use kt_core::Pose;
use serde::{Deserialize, Serialize};

/// A node in the emitted scene graph.
///
/// One node per link. The root node carries an identity transform; every
/// other node is positioned by its incoming joint's pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Name of the link this node renders
    pub name: String,
    /// Joint connecting this node to its parent (None for the root)
    pub joint: Option<String>,
    /// Transform relative to the parent node
    pub transform: Pose,
    /// Renderable geometry in node-local coordinates
    pub geometry: Vec<GeometryAttachment>,
    /// Joint-axis markers for actuated joints leaving this node
    pub markers: Vec<Marker>,
    /// Child nodes in joint order
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Create an empty node
    pub fn new(name: impl Into<String>, transform: Pose) -> Self {
        Self {
            name: name.into(),
            joint: None,
            transform,
            geometry: Vec::new(),
            markers: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Find a node by link name (depth-first)
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Iterate over this node and all descendants, depth-first
    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Count nodes, geometry attachments and markers in this subtree
    pub fn stats(&self) -> SceneStats {
        self.iter().fold(SceneStats::default(), |mut stats, node| {
            stats.nodes += 1;
            stats.geometry += node.geometry.len();
            stats.markers += node.markers.len();
            stats
        })
    }
}

/// Geometry placed on a scene node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryAttachment {
    /// Entry name (visual name, or `{link}/visual_{index}`)
    pub name: String,
    /// Pose relative to the owning node
    pub pose: Pose,
    /// Primitive shape
    pub shape: Shape,
    /// RGBA color
    pub color: [f32; 4],
}

/// Renderable primitive.
///
/// Cylinders and capsules are aligned with local +Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box with full extents
    Box {
        /// Edge lengths along x, y, z
        size: Vec3,
    },
    /// Cylinder along +Z centered at the origin
    Cylinder {
        /// Radius
        radius: f32,
        /// Length along Z
        length: f32,
    },
    /// Sphere at the origin
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Capsule along +Z centered at the origin
    Capsule {
        /// Radius of the hemispherical caps
        radius: f32,
        /// Length of the cylindrical section
        length: f32,
    },
    /// Mesh loaded from a resolved file
    Mesh {
        /// Resolved filesystem path
        source: PathBuf,
        /// Per-axis scale
        scale: Vec3,
        /// Triangle data, present when eager loading was requested
        data: Option<TriangleMesh>,
    },
}

impl Shape {
    /// Short kind name for logging
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Box { .. } => "box",
            Shape::Cylinder { .. } => "cylinder",
            Shape::Sphere { .. } => "sphere",
            Shape::Capsule { .. } => "capsule",
            Shape::Mesh { .. } => "mesh",
        }
    }
}

/// Indexed triangle data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions (already scaled)
    pub positions: Vec<[f32; 3]>,
    /// Triangle indices, three per face
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Thin cylinder visualizing an actuated joint's axis.
///
/// `pose` is expressed in the parent node's frame; the cylinder starts at the
/// joint origin and extends `length` along the positive axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Joint this marker visualizes
    pub joint: String,
    /// Pose of the cylinder center relative to the parent node
    pub pose: Pose,
    /// Cylinder radius
    pub radius: f32,
    /// Cylinder length
    pub length: f32,
    /// RGBA color
    pub color: [f32; 4],
}

/// Summary counts for an emitted scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneStats {
    /// Number of nodes
    pub nodes: usize,
    /// Number of geometry attachments
    pub geometry: usize,
    /// Number of joint-axis markers
    pub markers: usize,
}

impl std::fmt::Display for SceneStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} nodes, {} geometry, {} markers",
            self.nodes, self.geometry, self.markers
        )
    }
}
