//! Joint-axis normalization
//!
//! Rotates each actuated joint's frame so that its axis coincides with a
//! canonical target axis. The child link's attached frames are counter-rotated
//! so no geometry moves in the world.

use std::f32::consts::PI;

use glam::{Quat, Vec3};
use tracing::{debug, info, warn};

use crate::constants::{ANTIPARALLEL_FALLBACK_AXIS, AXIS_PARALLEL_EPSILON, DEFAULT_TARGET_AXIS};
use crate::error::NotFoundError;
use crate::pose::Pose;
use crate::tree::KinematicTree;

/// Minimal rotation taking `from` onto `to`, or `None` if either is zero.
///
/// Obtuse pairs are handled as a half turn about `from × to` followed by the
/// remaining acute arc. When the two are anti-parallel the half turn is about
/// `from × fallback` instead, trying X, Y, Z in turn if `fallback` is parallel
/// to `from`. The result always maps `from` onto `to`.
pub fn rotation_between(from: Vec3, to: Vec3, fallback: Vec3) -> Option<Quat> {
    let from = from.try_normalize()?;
    let to = to.try_normalize()?;

    if from.dot(to) >= 0.0 {
        return Some(arc(from, to));
    }

    let cross = from.cross(to);
    let half_turn_axis = if cross.length_squared() > AXIS_PARALLEL_EPSILON {
        cross.normalize()
    } else {
        [fallback, Vec3::X, Vec3::Y, Vec3::Z]
            .into_iter()
            .map(|candidate| from.cross(candidate))
            .find(|axis| axis.length_squared() > AXIS_PARALLEL_EPSILON)?
            .normalize()
    };
    let half_turn = Quat::from_axis_angle(half_turn_axis, PI);
    let flipped = (half_turn * from).normalize();
    Some((arc(flipped, to) * half_turn).normalize())
}

/// Shortest arc between two unit vectors at most a right angle apart
fn arc(from: Vec3, to: Vec3) -> Quat {
    let c = from.cross(to);
    Quat::from_xyzw(c.x, c.y, c.z, 1.0 + from.dot(to)).normalize()
}

/// Rotates actuated joint axes onto a canonical axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisNormalizer {
    target: Vec3,
    fallback: Vec3,
}

impl Default for AxisNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_AXIS)
    }
}

impl AxisNormalizer {
    /// Normalizer onto `target` (normalized; a zero vector falls back to +Z)
    pub fn new(target: Vec3) -> Self {
        Self {
            target: target.try_normalize().unwrap_or(DEFAULT_TARGET_AXIS),
            fallback: ANTIPARALLEL_FALLBACK_AXIS,
        }
    }

    /// Use a different preferred vector for anti-parallel half turns
    pub fn with_fallback(mut self, fallback: Vec3) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Rotation that maps `axis` onto the target axis (`None` for a zero axis)
    pub fn rotation_onto_target(&self, axis: Vec3) -> Option<Quat> {
        rotation_between(axis, self.target, self.fallback)
    }

    /// Return a new tree in which every actuated joint strictly below
    /// `from_link` (default root) has its axis equal to the target.
    pub fn apply(
        &self,
        tree: &KinematicTree,
        from_link: Option<&str>,
    ) -> Result<KinematicTree, NotFoundError> {
        let start = tree.resolve_start(from_link)?;
        let mut out = tree.clone();
        let mut rotated = 0usize;

        for joint_id in tree.joints_below(start) {
            let joint = &tree.joints[&joint_id];
            let Some(axis) = joint.axis() else {
                continue;
            };

            let Some(rotation) = self.rotation_onto_target(axis) else {
                warn!("Joint '{}' has a zero axis, leaving it unchanged", joint.name);
                continue;
            };
            let child_id = joint.child_link;

            let Some(out_joint) = out.joints.get_mut(&joint_id) else {
                continue;
            };
            out_joint.kind.set_axis(self.target);
            if rotation == Quat::IDENTITY {
                continue;
            }
            let compensation = Pose::from_rotation(rotation);
            out_joint.origin = out_joint.origin * compensation.inverse();
            debug!(
                "Rotated joint '{}' axis {:?} onto {:?}",
                joint.name, axis, self.target
            );

            // Compensate everything expressed in the child frame
            if let Some(child) = out.links.get_mut(&child_id) {
                child.reframe(&compensation);
            }
            let grandchild_joints: Vec<_> = out
                .children(child_id)
                .iter()
                .map(|(grandchild_joint, _)| *grandchild_joint)
                .collect();
            for grandchild_joint in grandchild_joints {
                if let Some(j) = out.joints.get_mut(&grandchild_joint) {
                    j.origin = compensation * j.origin;
                }
            }
            rotated += 1;
        }

        info!(
            "Rotated {} joint axis/axes onto {:?} below '{}'",
            rotated, self.target, tree.links[&start].name
        );
        Ok(out)
    }
}

impl KinematicTree {
    /// Rotate every actuated joint axis below `from_link` onto `axis`
    pub fn rotate_axes_to(
        &self,
        from_link: Option<&str>,
        axis: Vec3,
    ) -> Result<KinematicTree, NotFoundError> {
        AxisNormalizer::new(axis).apply(self, from_link)
    }
}
