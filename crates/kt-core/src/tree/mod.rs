//! Kinematic tree: a validated arena of links and joints

mod joint;
mod queries;
mod types;

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::error::MalformedTreeError;

pub use joint::{Joint, JointBuilder, JointDynamics, JointKind, JointLimits, JointMimic, JointType};
pub use types::{CollisionElement, Link, VisualElement};

/// Robot kinematic tree.
///
/// Links and joints live in ID-keyed arenas; topology is kept in the
/// `children` and `parent` maps. Child order is insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicTree {
    pub name: String,
    /// All links
    pub(crate) links: HashMap<Uuid, Link>,
    /// All joints
    pub(crate) joints: HashMap<Uuid, Joint>,
    /// Children mapping: parent_link -> [(joint_id, child_link)]
    pub(crate) children: HashMap<Uuid, Vec<(Uuid, Uuid)>>,
    /// Parent mapping: child_link -> (joint_id, parent_link)
    pub(crate) parent: HashMap<Uuid, (Uuid, Uuid)>,
    /// Name to ID index for links
    pub(crate) link_name_index: HashMap<String, Uuid>,
    /// Name to ID index for joints
    pub(crate) joint_name_index: HashMap<String, Uuid>,
    pub(crate) root: Uuid,
}

/// Collects named links and joints, then validates them into a [`KinematicTree`]
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    name: String,
    links: Vec<Link>,
    joints: Vec<JointBuilder>,
}

impl TreeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            links: Vec::new(),
            joints: Vec::new(),
        }
    }

    /// Add a link
    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Add a joint; its parent and child are referenced by link name
    pub fn joint(mut self, joint: JointBuilder) -> Self {
        self.joints.push(joint);
        self
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    pub fn add_joint(&mut self, joint: JointBuilder) {
        self.joints.push(joint);
    }

    /// Validate the collected links and joints and build the tree
    pub fn build(self) -> Result<KinematicTree, MalformedTreeError> {
        if self.links.is_empty() {
            return Err(MalformedTreeError::EmptyTree);
        }

        let link_order: Vec<Uuid> = self.links.iter().map(|l| l.id).collect();

        let mut link_name_index = HashMap::new();
        let mut links = HashMap::new();
        for link in self.links {
            if link_name_index.insert(link.name.clone(), link.id).is_some() {
                return Err(MalformedTreeError::DuplicateLink(link.name));
            }
            links.insert(link.id, link);
        }

        let mut joint_name_index = HashMap::new();
        let mut joints: HashMap<Uuid, Joint> = HashMap::new();
        let mut children: HashMap<Uuid, Vec<(Uuid, Uuid)>> = HashMap::new();
        let mut parent: HashMap<Uuid, (Uuid, Uuid)> = HashMap::new();

        for builder in self.joints {
            if joint_name_index.contains_key(&builder.name) {
                return Err(MalformedTreeError::DuplicateJoint(builder.name));
            }
            let resolve = |link: &str| {
                link_name_index
                    .get(link)
                    .copied()
                    .ok_or_else(|| MalformedTreeError::MissingLink {
                        joint: builder.name.clone(),
                        link: link.to_string(),
                    })
            };
            let parent_id = resolve(&builder.parent)?;
            let child_id = resolve(&builder.child)?;

            if parent_id == child_id {
                return Err(MalformedTreeError::Cycle(builder.child));
            }
            if let Some((first_joint, _)) = parent.get(&child_id) {
                return Err(MalformedTreeError::MultipleParents {
                    link: builder.child,
                    first: joints[first_joint].name.clone(),
                    second: builder.name,
                });
            }

            let joint = builder.build(parent_id, child_id);
            let joint_id = joint.id;
            joint_name_index.insert(joint.name.clone(), joint_id);
            joints.insert(joint_id, joint);
            children
                .entry(parent_id)
                .or_default()
                .push((joint_id, child_id));
            parent.insert(child_id, (joint_id, parent_id));
        }

        let roots: Vec<Uuid> = link_order
            .iter()
            .filter(|id| !parent.contains_key(id))
            .copied()
            .collect();
        let root = match roots.as_slice() {
            [root] => *root,
            // Every link has a parent, so the graph must loop back on itself
            [] => return Err(MalformedTreeError::Cycle(links[&link_order[0]].name.clone())),
            _ => {
                return Err(MalformedTreeError::MultipleRoots(
                    roots.iter().map(|id| links[id].name.clone()).collect(),
                ));
            }
        };

        // With one root and single parents, anything unreachable sits on a cycle
        let mut reachable = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if reachable.insert(id) {
                if let Some(child_list) = children.get(&id) {
                    stack.extend(child_list.iter().map(|(_, child_id)| *child_id));
                }
            }
        }
        if let Some(orphan) = link_order.iter().find(|id| !reachable.contains(id)) {
            return Err(MalformedTreeError::Cycle(links[orphan].name.clone()));
        }

        Ok(KinematicTree {
            name: self.name,
            links,
            joints,
            children,
            parent,
            link_name_index,
            joint_name_index,
            root,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use glam::Vec3;

    use super::*;
    use crate::geometry::GeometryType;
    use crate::pose::Pose;

    pub fn boxed(name: &str, origin: Pose) -> VisualElement {
        VisualElement::new(GeometryType::Box {
            size: [0.1, 0.1, 0.1],
        })
        .named(name)
        .at(origin)
    }

    /// base -(fixed)- shoulder -(revolute, X)- upperarm
    pub fn arm() -> KinematicTree {
        TreeBuilder::new("arm")
            .link(Link::new("base").with_visual(boxed("base_box", Pose::IDENTITY)))
            .link(Link::new("shoulder").with_visual(boxed(
                "shoulder_box",
                Pose::from_translation(Vec3::new(0.0, 0.0, 0.05)),
            )))
            .link(Link::new("upperarm").with_visual(boxed(
                "upperarm_box",
                Pose::from_xyz_rpy([0.0, 0.0, 0.2], [0.0, 0.3, 0.0]),
            )))
            .joint(
                Joint::builder("base_to_shoulder", "base", "shoulder")
                    .fixed()
                    .xyz(0.0, 0.0, 0.1)
                    .rpy(0.0, 0.0, 0.5),
            )
            .joint(
                Joint::builder("shoulder_pitch", "shoulder", "upperarm")
                    .revolute()
                    .xyz(0.0, 0.1, 0.2)
                    .rpy(0.2, 0.0, 0.0)
                    .axis(Vec3::X),
            )
            .build()
            .expect("valid arm")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(names: &[&str]) -> TreeBuilder {
        names
            .iter()
            .fold(TreeBuilder::new("robot"), |b, n| b.link(Link::new(*n)))
    }

    #[test]
    fn test_build_valid_tree() {
        let tree = links(&["a", "b", "c"])
            .joint(Joint::builder("ab", "a", "b"))
            .joint(Joint::builder("ac", "a", "c").continuous())
            .build()
            .unwrap();
        assert_eq!(tree.root_link().name, "a");
        assert_eq!(tree.link_count(), 3);
        assert_eq!(tree.joint_count(), 2);
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(
            TreeBuilder::new("robot").build(),
            Err(MalformedTreeError::EmptyTree)
        );
    }

    #[test]
    fn test_duplicate_link() {
        let err = links(&["a", "a"]).build().unwrap_err();
        assert_eq!(err, MalformedTreeError::DuplicateLink("a".into()));
    }

    #[test]
    fn test_duplicate_joint() {
        let err = links(&["a", "b", "c"])
            .joint(Joint::builder("j", "a", "b"))
            .joint(Joint::builder("j", "a", "c"))
            .build()
            .unwrap_err();
        assert_eq!(err, MalformedTreeError::DuplicateJoint("j".into()));
    }

    #[test]
    fn test_missing_link() {
        let err = links(&["a"])
            .joint(Joint::builder("j", "a", "ghost"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            MalformedTreeError::MissingLink {
                joint: "j".into(),
                link: "ghost".into()
            }
        );
    }

    #[test]
    fn test_multiple_parents() {
        let err = links(&["a", "b", "c"])
            .joint(Joint::builder("ac", "a", "c"))
            .joint(Joint::builder("bc", "b", "c"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            MalformedTreeError::MultipleParents {
                link: "c".into(),
                first: "ac".into(),
                second: "bc".into()
            }
        );
    }

    #[test]
    fn test_multiple_roots() {
        let err = links(&["a", "b"]).build().unwrap_err();
        assert_eq!(
            err,
            MalformedTreeError::MultipleRoots(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_detached_cycle() {
        let err = links(&["root", "x", "y"])
            .joint(Joint::builder("xy", "x", "y"))
            .joint(Joint::builder("yx", "y", "x"))
            .build()
            .unwrap_err();
        assert_eq!(err, MalformedTreeError::Cycle("x".into()));
    }

    #[test]
    fn test_full_cycle_has_no_root() {
        let err = links(&["x", "y"])
            .joint(Joint::builder("xy", "x", "y"))
            .joint(Joint::builder("yx", "y", "x"))
            .build()
            .unwrap_err();
        assert_eq!(err, MalformedTreeError::Cycle("x".into()));
    }

    #[test]
    fn test_self_loop() {
        let err = links(&["a"])
            .joint(Joint::builder("aa", "a", "a"))
            .build()
            .unwrap_err();
        assert_eq!(err, MalformedTreeError::Cycle("a".into()));
    }
}
