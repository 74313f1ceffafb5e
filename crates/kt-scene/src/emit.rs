//! Scene-graph emission from a kinematic tree

use glam::{Quat, Vec3};
use kt_core::{
    ANTIPARALLEL_FALLBACK_AXIS, GeometryType, Joint, KinematicTree, Link, NotFoundError, Pose,
    VisualElement, rotation_between,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ConversionError, ConversionErrorKind};
use crate::mesh::load_mesh;
use crate::node::{GeometryAttachment, Marker, SceneNode, Shape};
use crate::resolve::MeshResolver;

/// Default joint-axis marker color (orange)
pub const DEFAULT_AXES_COLOR: [f32; 4] = [1.0, 0.5, 0.0, 1.0];

/// Options controlling scene emission
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Attach a cylinder marker to every actuated joint
    pub display_axes: bool,
    /// Marker cylinder radius
    pub axes_radius: f32,
    /// Marker cylinder length
    pub axes_length: f32,
    /// Marker color
    pub axes_color: [f32; 4],
    /// Read mesh files and attach their triangles
    pub load_meshes: bool,
    /// Mesh filename resolution
    pub resolver: MeshResolver,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            display_axes: true,
            axes_radius: 0.001,
            axes_length: 0.015,
            axes_color: DEFAULT_AXES_COLOR,
            load_meshes: false,
            resolver: MeshResolver::default(),
        }
    }
}

impl EmitOptions {
    /// Enable or disable joint-axis markers
    pub fn with_axes(mut self, display: bool) -> Self {
        self.display_axes = display;
        self
    }

    /// Set marker radius and length
    pub fn axes_size(mut self, radius: f32, length: f32) -> Self {
        self.axes_radius = radius;
        self.axes_length = length;
        self
    }

    /// Set the mesh resolver
    pub fn with_resolver(mut self, resolver: MeshResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Enable or disable eager mesh loading
    pub fn with_mesh_loading(mut self, load: bool) -> Self {
        self.load_meshes = load;
        self
    }
}

/// Result of emitting a scene
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    /// Scene rooted at the starting link
    pub root: SceneNode,
    /// Geometry entries that could not be converted, in traversal order
    pub skipped: Vec<ConversionError>,
}

/// Emit a scene graph rooted at `from_link` (or the tree root).
///
/// The root node has an identity transform. Geometry that cannot be converted
/// is left out of its node and reported in [`Emission::skipped`].
pub fn emit_scene(
    tree: &KinematicTree,
    from_link: Option<&str>,
    options: &EmitOptions,
) -> Result<Emission, NotFoundError> {
    let start = tree.resolve_start(from_link)?;

    let mut skipped = Vec::new();
    let root = emit_link(tree, start, Pose::IDENTITY, None, options, &mut skipped);

    info!("Emitted scene: {} ({} skipped)", root.stats(), skipped.len());
    Ok(Emission { root, skipped })
}

fn emit_link(
    tree: &KinematicTree,
    link_id: Uuid,
    transform: Pose,
    joint: Option<&Joint>,
    options: &EmitOptions,
    skipped: &mut Vec<ConversionError>,
) -> SceneNode {
    let Some(link) = tree.link_by_id(link_id) else {
        return SceneNode::new(String::new(), transform);
    };

    let mut node = SceneNode::new(&link.name, transform);
    node.joint = joint.map(|j| j.name.clone());

    for (index, visual) in link.visuals.iter().enumerate() {
        match convert_visual(link, index, visual, options) {
            Ok(attachment) => node.geometry.push(attachment),
            Err(error) => {
                warn!("Skipping {} geometry: {}", visual.geometry.kind_name(), error);
                skipped.push(error);
            }
        }
    }

    for &(joint_id, child_id) in tree.children(link_id) {
        let Some(child_joint) = tree.joint_by_id(joint_id) else {
            continue;
        };
        if options.display_axes
            && let Some(marker) = axis_marker(child_joint, options)
        {
            node.markers.push(marker);
        }
        node.children.push(emit_link(
            tree,
            child_id,
            child_joint.origin,
            Some(child_joint),
            options,
            skipped,
        ));
    }

    node
}

/// Marker for an actuated joint, in the parent link frame
fn axis_marker(joint: &Joint, options: &EmitOptions) -> Option<Marker> {
    let axis = joint.axis()?.try_normalize()?;
    let local = Pose::new(axis * (options.axes_length * 0.5), marker_rotation(axis));
    Some(Marker {
        joint: joint.name.clone(),
        pose: joint.origin * local,
        radius: options.axes_radius,
        length: options.axes_length,
        color: options.axes_color,
    })
}

fn convert_visual(
    link: &Link,
    index: usize,
    visual: &VisualElement,
    options: &EmitOptions,
) -> Result<GeometryAttachment, ConversionError> {
    let name = visual
        .name
        .clone()
        .unwrap_or_else(|| format!("{}/visual_{}", link.name, index));

    let shape = convert_geometry(&visual.geometry, options).map_err(|kind| ConversionError {
        link: link.name.clone(),
        geometry: name.clone(),
        kind,
    })?;
    debug!("{}: {} '{}'", link.name, shape.kind_name(), name);

    Ok(GeometryAttachment {
        name,
        pose: visual.origin,
        shape,
        color: visual.color,
    })
}

fn convert_geometry(
    geometry: &GeometryType,
    options: &EmitOptions,
) -> Result<Shape, ConversionErrorKind> {
    Ok(match geometry {
        GeometryType::Box { size } => Shape::Box {
            size: Vec3::from(*size),
        },
        GeometryType::Cylinder { radius, length } => Shape::Cylinder {
            radius: *radius,
            length: *length,
        },
        GeometryType::Sphere { radius } => Shape::Sphere { radius: *radius },
        GeometryType::Capsule { radius, length } => Shape::Capsule {
            radius: *radius,
            length: *length,
        },
        GeometryType::Mesh { filename, scale } => {
            let source = options.resolver.resolve(filename)?;
            let scale = scale.map(Vec3::from).unwrap_or(Vec3::ONE);
            let data = if options.load_meshes {
                let mesh = load_mesh(&source, scale)?;
                debug!("Loaded {} triangles from {}", mesh.triangle_count(), source.display());
                Some(mesh)
            } else {
                None
            };
            Shape::Mesh {
                source,
                scale,
                data,
            }
        }
    })
}

/// Rotation that maps a marker cylinder's +Z onto `axis` (identity for a zero axis)
pub fn marker_rotation(axis: Vec3) -> Quat {
    rotation_between(Vec3::Z, axis, ANTIPARALLEL_FALLBACK_AXIS).unwrap_or(Quat::IDENTITY)
}
