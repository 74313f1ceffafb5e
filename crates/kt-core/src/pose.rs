//! Rigid transforms between link and joint frames

use std::ops::Mul;

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Pose (position and orientation) of a frame relative to its parent frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation,
        }
    }

    /// Build a pose from URDF-style position and fixed-axis roll/pitch/yaw
    pub fn from_xyz_rpy(xyz: [f32; 3], rpy: [f32; 3]) -> Self {
        Self {
            translation: Vec3::from(xyz),
            rotation: Quat::from_euler(EulerRot::ZYX, rpy[2], rpy[1], rpy[0]),
        }
    }

    /// Position as an array
    pub fn xyz(&self) -> [f32; 3] {
        self.translation.to_array()
    }

    /// Orientation as URDF roll, pitch, yaw in radians
    pub fn rpy(&self) -> [f32; 3] {
        let (yaw, pitch, roll) = self.rotation.to_euler(EulerRot::ZYX);
        [roll, pitch, yaw]
    }

    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            translation: rotation * -self.translation,
            rotation,
        }
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }

    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// Compare two poses within a tolerance (q and -q are the same rotation)
    pub fn abs_diff_eq(&self, other: &Pose, max_abs_diff: f32) -> bool {
        self.translation.abs_diff_eq(other.translation, max_abs_diff)
            && (self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
                || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff))
    }
}

impl Mul for Pose {
    type Output = Pose;

    fn mul(self, rhs: Pose) -> Pose {
        Pose {
            translation: self.translation + self.rotation * rhs.translation,
            rotation: (self.rotation * rhs.rotation).normalize(),
        }
    }
}

impl From<&urdf_rs::Pose> for Pose {
    fn from(urdf_pose: &urdf_rs::Pose) -> Self {
        Self::from_xyz_rpy(
            [
                urdf_pose.xyz.0[0] as f32,
                urdf_pose.xyz.0[1] as f32,
                urdf_pose.xyz.0[2] as f32,
            ],
            [
                urdf_pose.rpy.0[0] as f32,
                urdf_pose.rpy.0[1] as f32,
                urdf_pose.rpy.0[2] as f32,
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rpy_round_trip() {
        let pose = Pose::from_xyz_rpy([1.0, 2.0, 3.0], [0.1, 0.2, 0.3]);
        let rpy = pose.rpy();
        assert!((rpy[0] - 0.1).abs() < 1e-5);
        assert!((rpy[1] - 0.2).abs() < 1e-5);
        assert!((rpy[2] - 0.3).abs() < 1e-5);
        assert_eq!(pose.xyz(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_yaw_rotates_about_z() {
        let pose = Pose::from_xyz_rpy([0.0; 3], [0.0, 0.0, FRAC_PI_2]);
        let v = pose.transform_vector(Vec3::X);
        assert!(v.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_compose_matches_matrices() {
        let a = Pose::from_xyz_rpy([1.0, 0.0, 0.5], [0.3, -0.2, 1.1]);
        let b = Pose::from_xyz_rpy([0.0, 2.0, -1.0], [-0.7, 0.4, 0.2]);
        let mat = |p: Pose| Mat4::from_rotation_translation(p.rotation, p.translation);
        let composed = mat(a * b);
        let expected = mat(a) * mat(b);
        assert!(composed.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_inverse() {
        let a = Pose::from_xyz_rpy([1.0, -2.0, 0.5], [0.3, 0.2, -1.1]);
        assert!((a * a.inverse()).abs_diff_eq(&Pose::IDENTITY, 1e-6));
        assert!((a.inverse() * a).abs_diff_eq(&Pose::IDENTITY, 1e-6));
    }

    #[test]
    fn test_from_urdf_pose() {
        let urdf_pose = urdf_rs::Pose {
            xyz: urdf_rs::Vec3([1.0, 2.0, 3.0]),
            rpy: urdf_rs::Vec3([0.0, 0.0, 0.0]),
        };
        let pose = Pose::from(&urdf_pose);
        assert_eq!(pose.translation, Vec3::new(1.0, 2.0, 3.0));
        assert!(pose.rotation.abs_diff_eq(Quat::IDENTITY, 1e-7));
    }
}
