//! Link and geometry element types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_COLOR;
use crate::geometry::GeometryType;
use crate::inertia::InertialProperties;
use crate::pose::Pose;

/// A rigid body in the kinematic tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: Uuid,
    pub name: String,
    /// Visual elements, poses relative to the link frame
    pub visuals: Vec<VisualElement>,
    /// Collision elements, poses relative to the link frame
    pub collisions: Vec<CollisionElement>,
    /// Inertial properties (None for massless links)
    pub inertial: Option<InertialProperties>,
}

impl Link {
    /// Create a new empty link (no geometry)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            visuals: Vec::new(),
            collisions: Vec::new(),
            inertial: None,
        }
    }

    pub fn with_visual(mut self, visual: VisualElement) -> Self {
        self.visuals.push(visual);
        self
    }

    pub fn with_inertial(mut self, inertial: InertialProperties) -> Self {
        self.inertial = Some(inertial);
        self
    }

    /// Merge a rigidly attached link into this one.
    ///
    /// `pose` is the frame of `other` relative to this link. Geometry of `other`
    /// is appended after this link's own geometry.
    pub fn absorb(&mut self, other: Link, pose: &Pose) {
        self.visuals
            .extend(other.visuals.into_iter().map(|v| v.transformed(pose)));
        self.collisions
            .extend(other.collisions.into_iter().map(|c| c.transformed(pose)));

        let other_inertial = other.inertial.map(|i| i.transformed(pose));
        self.inertial = match (self.inertial, other_inertial) {
            (Some(own), Some(theirs)) => Some(own.combine(&theirs)),
            (own, theirs) => own.or(theirs),
        };
    }

    /// Pre-multiply every frame attached to this link by `pose`
    pub(crate) fn reframe(&mut self, pose: &Pose) {
        for visual in &mut self.visuals {
            visual.origin = *pose * visual.origin;
        }
        for collision in &mut self.collisions {
            collision.origin = *pose * collision.origin;
        }
        if let Some(inertial) = &mut self.inertial {
            inertial.origin = *pose * inertial.origin;
        }
    }
}

/// Single visual element for a link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualElement {
    /// Optional name for this visual element
    pub name: Option<String>,
    pub origin: Pose,
    pub geometry: GeometryType,
    pub color: [f32; 4],
    pub material_name: Option<String>,
}

impl VisualElement {
    pub fn new(geometry: GeometryType) -> Self {
        Self {
            name: None,
            origin: Pose::IDENTITY,
            geometry,
            color: DEFAULT_COLOR,
            material_name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, origin: Pose) -> Self {
        self.origin = origin;
        self
    }

    fn transformed(self, pose: &Pose) -> Self {
        Self {
            origin: *pose * self.origin,
            ..self
        }
    }
}

/// Single collision element for a link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionElement {
    /// Optional name for this collision element
    pub name: Option<String>,
    pub origin: Pose,
    pub geometry: GeometryType,
}

impl CollisionElement {
    pub fn new(geometry: GeometryType) -> Self {
        Self {
            name: None,
            origin: Pose::IDENTITY,
            geometry,
        }
    }

    fn transformed(self, pose: &Pose) -> Self {
        Self {
            origin: *pose * self.origin,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inertia::InertiaMatrix;
    use glam::Vec3;

    fn sphere() -> GeometryType {
        GeometryType::Sphere { radius: 0.1 }
    }

    #[test]
    fn test_absorb_appends_child_geometry_after_own() {
        let mut parent = Link::new("parent").with_visual(VisualElement::new(sphere()).named("p"));
        let child = Link::new("child").with_visual(
            VisualElement::new(sphere())
                .named("c")
                .at(Pose::from_translation(Vec3::X)),
        );

        parent.absorb(child, &Pose::from_translation(Vec3::Z));

        assert_eq!(parent.visuals.len(), 2);
        assert_eq!(parent.visuals[0].name.as_deref(), Some("p"));
        assert_eq!(parent.visuals[1].name.as_deref(), Some("c"));
        assert!(parent.visuals[1]
            .origin
            .translation
            .abs_diff_eq(Vec3::new(1.0, 0.0, 1.0), 1e-6));
    }

    #[test]
    fn test_absorb_carries_single_inertial() {
        let mut parent = Link::new("parent");
        let child = Link::new("child").with_inertial(InertialProperties::new(
            Pose::IDENTITY,
            2.0,
            InertiaMatrix::diagonal(1.0, 1.0, 1.0),
        ));

        parent.absorb(child, &Pose::from_translation(Vec3::Y));

        let inertial = parent.inertial.expect("inertial carried over");
        assert_eq!(inertial.mass, 2.0);
        assert!(inertial.origin.translation.abs_diff_eq(Vec3::Y, 1e-6));
        assert_eq!(inertial.inertia, InertiaMatrix::diagonal(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_absorb_without_inertials() {
        let mut parent = Link::new("parent");
        parent.absorb(Link::new("child"), &Pose::IDENTITY);
        assert!(parent.inertial.is_none());
    }
}
