//! Inertia tensors and rigid-body composition

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::MASS_EPSILON;
use crate::pose::Pose;

/// Inertia tensor (symmetric 3x3 matrix)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InertiaMatrix {
    pub ixx: f32,
    pub ixy: f32,
    pub ixz: f32,
    pub iyy: f32,
    pub iyz: f32,
    pub izz: f32,
}

impl From<&urdf_rs::Inertia> for InertiaMatrix {
    fn from(urdf_inertia: &urdf_rs::Inertia) -> Self {
        Self {
            ixx: urdf_inertia.ixx as f32,
            ixy: urdf_inertia.ixy as f32,
            ixz: urdf_inertia.ixz as f32,
            iyy: urdf_inertia.iyy as f32,
            iyz: urdf_inertia.iyz as f32,
            izz: urdf_inertia.izz as f32,
        }
    }
}

impl InertiaMatrix {
    pub const ZERO: Self = Self {
        ixx: 0.0,
        ixy: 0.0,
        ixz: 0.0,
        iyy: 0.0,
        iyz: 0.0,
        izz: 0.0,
    };

    /// Diagonal inertia tensor
    pub fn diagonal(ixx: f32, iyy: f32, izz: f32) -> Self {
        Self {
            ixx,
            iyy,
            izz,
            ..Self::ZERO
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_cols(
            Vec3::new(self.ixx, self.ixy, self.ixz),
            Vec3::new(self.ixy, self.iyy, self.iyz),
            Vec3::new(self.ixz, self.iyz, self.izz),
        )
    }

    /// Read the upper triangle of a (symmetric) matrix
    pub fn from_mat3(m: Mat3) -> Self {
        Self {
            ixx: m.x_axis.x,
            ixy: m.y_axis.x,
            ixz: m.z_axis.x,
            iyy: m.y_axis.y,
            iyz: m.z_axis.y,
            izz: m.z_axis.z,
        }
    }

    /// Express the tensor in a frame rotated by `rotation` (R I Rᵀ)
    pub fn rotated(&self, rotation: Quat) -> Self {
        let r = Mat3::from_quat(rotation);
        Self::from_mat3(r * self.to_mat3() * r.transpose())
    }
}

/// Inertial properties for a link
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertialProperties {
    /// Center of mass frame relative to the link frame
    pub origin: Pose,
    pub mass: f32,
    /// Inertia about the center of mass, in the `origin` frame
    pub inertia: InertiaMatrix,
}

impl InertialProperties {
    pub fn new(origin: Pose, mass: f32, inertia: InertiaMatrix) -> Self {
        Self {
            origin,
            mass,
            inertia,
        }
    }

    /// Re-express these properties in a parent frame, where `pose` is this frame
    /// relative to the parent
    pub fn transformed(&self, pose: &Pose) -> Self {
        Self {
            origin: *pose * self.origin,
            ..*self
        }
    }

    /// Inertia tensor about the center of mass, axes aligned with the link frame
    pub fn inertia_in_link_frame(&self) -> Mat3 {
        self.inertia.rotated(self.origin.rotation).to_mat3()
    }

    /// Combine two bodies expressed in the same link frame into one.
    ///
    /// The result sits at the combined center of mass with axes aligned to the
    /// link frame.
    pub fn combine(&self, other: &Self) -> Self {
        let mass = self.mass + other.mass;
        let com = if mass > MASS_EPSILON {
            (self.origin.translation * self.mass + other.origin.translation * other.mass) / mass
        } else {
            self.origin.translation
        };

        let inertia = self.inertia_in_link_frame()
            + parallel_axis(self.mass, self.origin.translation - com)
            + other.inertia_in_link_frame()
            + parallel_axis(other.mass, other.origin.translation - com);

        Self {
            origin: Pose::from_translation(com),
            mass,
            inertia: InertiaMatrix::from_mat3(inertia),
        }
    }
}

/// Parallel-axis term m (|d|² E − d dᵀ)
fn parallel_axis(mass: f32, d: Vec3) -> Mat3 {
    let outer = Mat3::from_cols(d * d.x, d * d.y, d * d.z);
    (Mat3::IDENTITY * d.length_squared() - outer) * mass
}
