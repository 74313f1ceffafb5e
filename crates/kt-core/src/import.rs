//! URDF import functionality
//!
//! Reads URDF files into a validated [`KinematicTree`].

use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;
use tracing::info;

use crate::constants::DEFAULT_COLOR;
use crate::error::MalformedTreeError;
use crate::geometry::GeometryType;
use crate::inertia::{InertiaMatrix, InertialProperties};
use crate::pose::Pose;
use crate::tree::{
    CollisionElement, Joint, JointBuilder, JointLimits, JointType, KinematicTree, Link,
    TreeBuilder, VisualElement,
};

/// Errors that can occur during URDF import
#[derive(Debug, Clone, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to parse URDF: {0}")]
    UrdfParse(String),

    #[error("Malformed kinematic tree: {0}")]
    Malformed(#[from] MalformedTreeError),
}

/// Import options for URDF loading
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Color for visuals without a resolvable material
    pub default_color: [f32; 4],
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR,
        }
    }
}

/// Load a URDF file into a kinematic tree
pub fn load_urdf_file(path: &Path, options: &ImportOptions) -> Result<KinematicTree, ImportError> {
    let robot = urdf_rs::read_file(path).map_err(|e| ImportError::UrdfParse(e.to_string()))?;
    let tree = tree_from_robot(&robot, options)?;
    info!(
        "Loaded robot '{}' from {}: {} links, {} joints",
        tree.name,
        path.display(),
        tree.link_count(),
        tree.joint_count()
    );
    Ok(tree)
}

/// Parse URDF XML text into a kinematic tree
pub fn load_urdf_str(xml: &str, options: &ImportOptions) -> Result<KinematicTree, ImportError> {
    let robot = urdf_rs::read_from_string(xml).map_err(|e| ImportError::UrdfParse(e.to_string()))?;
    Ok(tree_from_robot(&robot, options)?)
}

/// Convert a parsed URDF robot into a validated kinematic tree
pub fn tree_from_robot(
    robot: &urdf_rs::Robot,
    options: &ImportOptions,
) -> Result<KinematicTree, MalformedTreeError> {
    let material_colors = collect_material_colors(&robot.materials);

    let mut builder = TreeBuilder::new(&robot.name);
    for urdf_link in &robot.links {
        builder.add_link(convert_link(urdf_link, &material_colors, options));
    }
    for urdf_joint in &robot.joints {
        builder.add_joint(convert_joint(urdf_joint));
    }
    builder.build()
}

/// Collect named top-level material colors
fn collect_material_colors(materials: &[urdf_rs::Material]) -> HashMap<String, [f32; 4]> {
    materials
        .iter()
        .filter_map(|m| m.color.as_ref().map(|c| (m.name.clone(), rgba(c))))
        .collect()
}

fn rgba(color: &urdf_rs::Color) -> [f32; 4] {
    [
        color.rgba.0[0] as f32,
        color.rgba.0[1] as f32,
        color.rgba.0[2] as f32,
        color.rgba.0[3] as f32,
    ]
}

fn convert_link(
    urdf_link: &urdf_rs::Link,
    material_colors: &HashMap<String, [f32; 4]>,
    options: &ImportOptions,
) -> Link {
    let mut link = Link::new(&urdf_link.name);

    link.visuals = urdf_link
        .visual
        .iter()
        .map(|visual| {
            let (color, material_name) = extract_material_info(visual, material_colors, options);
            VisualElement {
                name: visual.name.clone(),
                origin: Pose::from(&visual.origin),
                geometry: GeometryType::from(&visual.geometry),
                color,
                material_name,
            }
        })
        .collect();

    link.collisions = urdf_link
        .collision
        .iter()
        .map(|collision| CollisionElement {
            name: collision.name.clone(),
            origin: Pose::from(&collision.origin),
            geometry: GeometryType::from(&collision.geometry),
        })
        .collect();

    let inertia = InertiaMatrix::from(&urdf_link.inertial.inertia);
    let mass = urdf_link.inertial.mass.value as f32;
    // urdf-rs fills in a zero inertial when the element is absent
    if mass != 0.0 || !inertia.is_zero() {
        link.inertial = Some(InertialProperties::new(
            Pose::from(&urdf_link.inertial.origin),
            mass,
            inertia,
        ));
    }

    link
}

/// Extract material color and name from a visual element
fn extract_material_info(
    visual: &urdf_rs::Visual,
    material_colors: &HashMap<String, [f32; 4]>,
    options: &ImportOptions,
) -> ([f32; 4], Option<String>) {
    let Some(mat) = &visual.material else {
        return (options.default_color, None);
    };

    let color = mat
        .color
        .as_ref()
        .map(rgba)
        .or_else(|| material_colors.get(&mat.name).copied())
        .unwrap_or(options.default_color);
    let name = (!mat.name.is_empty()).then(|| mat.name.clone());

    (color, name)
}

fn convert_joint(urdf_joint: &urdf_rs::Joint) -> JointBuilder {
    let joint_type = JointType::from(&urdf_joint.joint_type);
    let axis = Vec3::new(
        urdf_joint.axis.xyz.0[0] as f32,
        urdf_joint.axis.xyz.0[1] as f32,
        urdf_joint.axis.xyz.0[2] as f32,
    );

    let mut builder = Joint::builder(
        &urdf_joint.name,
        &urdf_joint.parent.link,
        &urdf_joint.child.link,
    )
    .joint_type(joint_type)
    .origin(Pose::from(&urdf_joint.origin))
    .axis(axis);

    if joint_type.has_limits() {
        builder = builder.limits(JointLimits {
            lower: urdf_joint.limit.lower as f32,
            upper: urdf_joint.limit.upper as f32,
            effort: urdf_joint.limit.effort as f32,
            velocity: urdf_joint.limit.velocity as f32,
        });
    }
    if let Some(dynamics) = &urdf_joint.dynamics {
        builder = builder.dynamics(dynamics.damping as f32, dynamics.friction as f32);
    }
    if let Some(mimic) = &urdf_joint.mimic {
        builder = builder.mimic(
            &mimic.joint,
            mimic.multiplier.unwrap_or(1.0) as f32,
            mimic.offset.unwrap_or(0.0) as f32,
        );
    }

    builder
}
