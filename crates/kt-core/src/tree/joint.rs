//! Joint types and builder for the kinematic tree

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pose::Pose;

/// A joint connecting two links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub id: Uuid,
    pub name: String,
    pub kind: JointKind,
    /// Parent link ID
    pub parent_link: Uuid,
    /// Child link ID
    pub child_link: Uuid,
    /// Child frame relative to the parent link frame
    pub origin: Pose,
    pub dynamics: Option<JointDynamics>,
    pub mimic: Option<JointMimic>,
}

impl Joint {
    /// Create a builder for constructing joints with fluent API
    pub fn builder(
        name: impl Into<String>,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> JointBuilder {
        JointBuilder::new(name, parent, child)
    }

    pub fn joint_type(&self) -> JointType {
        self.kind.joint_type()
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.kind, JointKind::Fixed)
    }

    pub fn axis(&self) -> Option<Vec3> {
        self.kind.axis()
    }
}

/// Joint kind with its kind-specific payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JointKind {
    Fixed,
    Revolute { axis: Vec3, limits: JointLimits },
    Continuous { axis: Vec3 },
    Prismatic { axis: Vec3, limits: JointLimits },
    /// Motion in the plane perpendicular to `axis`
    Planar { axis: Vec3 },
    Floating,
}

impl JointKind {
    pub fn joint_type(&self) -> JointType {
        match self {
            JointKind::Fixed => JointType::Fixed,
            JointKind::Revolute { .. } => JointType::Revolute,
            JointKind::Continuous { .. } => JointType::Continuous,
            JointKind::Prismatic { .. } => JointType::Prismatic,
            JointKind::Planar { .. } => JointType::Planar,
            JointKind::Floating => JointType::Floating,
        }
    }

    /// Joint axis in the joint frame, for kinds that have one
    pub fn axis(&self) -> Option<Vec3> {
        match self {
            JointKind::Revolute { axis, .. }
            | JointKind::Continuous { axis }
            | JointKind::Prismatic { axis, .. }
            | JointKind::Planar { axis } => Some(*axis),
            JointKind::Fixed | JointKind::Floating => None,
        }
    }

    /// Replace the axis; no-op for kinds without one
    pub fn set_axis(&mut self, new_axis: Vec3) {
        match self {
            JointKind::Revolute { axis, .. }
            | JointKind::Continuous { axis }
            | JointKind::Prismatic { axis, .. }
            | JointKind::Planar { axis } => *axis = new_axis,
            JointKind::Fixed | JointKind::Floating => {}
        }
    }

    pub fn limits(&self) -> Option<JointLimits> {
        match self {
            JointKind::Revolute { limits, .. } | JointKind::Prismatic { limits, .. } => {
                Some(*limits)
            }
            _ => None,
        }
    }
}

/// Joint type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JointType {
    #[default]
    Fixed,
    Revolute,
    Continuous,
    Prismatic,
    Floating,
    Planar,
}

impl JointType {
    /// Check if this joint type has limits
    pub fn has_limits(&self) -> bool {
        matches!(self, JointType::Revolute | JointType::Prismatic)
    }
}

impl From<&urdf_rs::JointType> for JointType {
    fn from(urdf_type: &urdf_rs::JointType) -> Self {
        match urdf_type {
            urdf_rs::JointType::Fixed => JointType::Fixed,
            urdf_rs::JointType::Revolute => JointType::Revolute,
            urdf_rs::JointType::Continuous => JointType::Continuous,
            urdf_rs::JointType::Prismatic => JointType::Prismatic,
            urdf_rs::JointType::Floating => JointType::Floating,
            urdf_rs::JointType::Planar => JointType::Planar,
            urdf_rs::JointType::Spherical => JointType::Floating, // Approximate as floating
        }
    }
}

/// Joint limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointLimits {
    /// Lower position limit (rad or m)
    pub lower: f32,
    /// Upper position limit (rad or m)
    pub upper: f32,
    /// Maximum effort (N or Nm)
    pub effort: f32,
    /// Maximum velocity (rad/s or m/s)
    pub velocity: f32,
}

impl Default for JointLimits {
    fn default() -> Self {
        Self {
            lower: -std::f32::consts::PI,
            upper: std::f32::consts::PI,
            effort: 100.0,
            velocity: 1.0,
        }
    }
}

impl JointLimits {
    /// Create default limits for prismatic joints (-1m to 1m)
    pub fn default_prismatic() -> Self {
        Self {
            lower: -1.0,
            upper: 1.0,
            effort: 100.0,
            velocity: 1.0,
        }
    }
}

/// Joint dynamics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointDynamics {
    pub damping: f32,
    pub friction: f32,
}

/// Joint mimic configuration
/// Makes this joint follow another joint's position: value = multiplier * other_joint + offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointMimic {
    /// Name of the joint to mimic
    pub joint: String,
    pub multiplier: f32,
    pub offset: f32,
}

/// Builder for joints whose links are referenced by name.
///
/// The link IDs are resolved when the joint is added to a
/// [`TreeBuilder`](super::TreeBuilder).
#[derive(Debug, Clone)]
pub struct JointBuilder {
    pub(crate) name: String,
    pub(crate) parent: String,
    pub(crate) child: String,
    joint_type: JointType,
    origin: Pose,
    axis: Vec3,
    limits: Option<JointLimits>,
    dynamics: Option<JointDynamics>,
    mimic: Option<JointMimic>,
}

impl JointBuilder {
    /// Create a new joint builder (fixed, identity origin, axis +X)
    pub fn new(
        name: impl Into<String>,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            child: child.into(),
            joint_type: JointType::Fixed,
            origin: Pose::IDENTITY,
            axis: Vec3::X,
            limits: None,
            dynamics: None,
            mimic: None,
        }
    }

    /// Set the joint type
    pub fn joint_type(mut self, joint_type: JointType) -> Self {
        self.joint_type = joint_type;
        self
    }

    /// Set as a fixed joint
    pub fn fixed(self) -> Self {
        self.joint_type(JointType::Fixed)
    }

    /// Set as a revolute joint
    pub fn revolute(self) -> Self {
        self.joint_type(JointType::Revolute)
    }

    /// Set as a continuous joint
    pub fn continuous(self) -> Self {
        self.joint_type(JointType::Continuous)
    }

    /// Set as a prismatic joint
    pub fn prismatic(self) -> Self {
        self.joint_type(JointType::Prismatic)
    }

    /// Set the joint origin
    pub fn origin(mut self, pose: Pose) -> Self {
        self.origin = pose;
        self
    }

    /// Set the joint origin position
    pub fn xyz(mut self, x: f32, y: f32, z: f32) -> Self {
        self.origin.translation = Vec3::new(x, y, z);
        self
    }

    /// Set the joint origin rotation (roll, pitch, yaw)
    pub fn rpy(mut self, roll: f32, pitch: f32, yaw: f32) -> Self {
        self.origin = Pose::from_xyz_rpy(self.origin.xyz(), [roll, pitch, yaw]);
        self
    }

    /// Set the joint axis (normalized; a zero vector keeps the current axis)
    pub fn axis(mut self, axis: Vec3) -> Self {
        self.axis = axis.try_normalize().unwrap_or(self.axis);
        self
    }

    /// Set the joint axis from x, y, z components
    pub fn axis_xyz(self, x: f32, y: f32, z: f32) -> Self {
        self.axis(Vec3::new(x, y, z))
    }

    /// Set the joint limits
    pub fn limits(mut self, limits: JointLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Set the joint dynamics
    pub fn dynamics(mut self, damping: f32, friction: f32) -> Self {
        self.dynamics = Some(JointDynamics { damping, friction });
        self
    }

    /// Set mimic configuration with multiplier and offset
    pub fn mimic(mut self, joint: impl Into<String>, multiplier: f32, offset: f32) -> Self {
        self.mimic = Some(JointMimic {
            joint: joint.into(),
            multiplier,
            offset,
        });
        self
    }

    fn kind(&self) -> JointKind {
        let axis = self.axis;
        match self.joint_type {
            JointType::Fixed => JointKind::Fixed,
            JointType::Revolute => JointKind::Revolute {
                axis,
                limits: self.limits.unwrap_or_default(),
            },
            JointType::Continuous => JointKind::Continuous { axis },
            JointType::Prismatic => JointKind::Prismatic {
                axis,
                limits: self.limits.unwrap_or_else(JointLimits::default_prismatic),
            },
            JointType::Planar => JointKind::Planar { axis },
            JointType::Floating => JointKind::Floating,
        }
    }

    /// Build the joint between two resolved links
    pub(crate) fn build(self, parent_link: Uuid, child_link: Uuid) -> Joint {
        Joint {
            id: Uuid::new_v4(),
            kind: self.kind(),
            name: self.name,
            parent_link,
            child_link,
            origin: self.origin,
            dynamics: self.dynamics,
            mimic: self.mimic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_kind_payload() {
        let joint = Joint::builder("j", "a", "b")
            .revolute()
            .axis_xyz(0.0, 2.0, 0.0)
            .limits(JointLimits {
                lower: -1.0,
                upper: 1.0,
                ..JointLimits::default()
            })
            .build(Uuid::nil(), Uuid::nil());
        assert_eq!(joint.joint_type(), JointType::Revolute);
        assert_eq!(joint.axis(), Some(Vec3::Y));
        assert_eq!(joint.kind.limits().map(|l| l.upper), Some(1.0));
    }

    #[test]
    fn test_fixed_has_no_axis() {
        let joint = Joint::builder("j", "a", "b")
            .axis(Vec3::Z)
            .build(Uuid::nil(), Uuid::nil());
        assert!(joint.is_fixed());
        assert_eq!(joint.axis(), None);
    }

    #[test]
    fn test_set_axis() {
        let mut kind = JointKind::Continuous { axis: Vec3::X };
        kind.set_axis(Vec3::Z);
        assert_eq!(kind.axis(), Some(Vec3::Z));

        let mut fixed = JointKind::Fixed;
        fixed.set_axis(Vec3::Z);
        assert_eq!(fixed.axis(), None);
    }

    #[test]
    fn test_joint_type_from_urdf() {
        assert_eq!(
            JointType::from(&urdf_rs::JointType::Revolute),
            JointType::Revolute
        );
        assert_eq!(
            JointType::from(&urdf_rs::JointType::Spherical),
            JointType::Floating
        );
    }
}
