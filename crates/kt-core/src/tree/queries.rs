//! Query methods for KinematicTree

use uuid::Uuid;

use super::KinematicTree;
use super::joint::Joint;
use super::types::Link;
use crate::error::NotFoundError;
use crate::pose::Pose;

impl KinematicTree {
    // ============== Lookup ==============

    /// The root link
    pub fn root_link(&self) -> &Link {
        &self.links[&self.root]
    }

    /// Find a link by name
    pub fn link(&self, name: &str) -> Result<&Link, NotFoundError> {
        self.link_name_index
            .get(name)
            .and_then(|id| self.links.get(id))
            .ok_or_else(|| NotFoundError::Link(name.to_string()))
    }

    /// Find a joint by name
    pub fn joint(&self, name: &str) -> Result<&Joint, NotFoundError> {
        self.joint_name_index
            .get(name)
            .and_then(|id| self.joints.get(id))
            .ok_or_else(|| NotFoundError::Joint(name.to_string()))
    }

    /// Find a link ID by name
    pub fn link_id(&self, name: &str) -> Result<Uuid, NotFoundError> {
        self.link_name_index
            .get(name)
            .copied()
            .ok_or_else(|| NotFoundError::Link(name.to_string()))
    }

    /// Resolve an optional starting link name, defaulting to the root
    pub fn resolve_start(&self, from_link: Option<&str>) -> Result<Uuid, NotFoundError> {
        match from_link {
            Some(name) => self.link_id(name),
            None => Ok(self.root),
        }
    }

    /// Get a link by ID
    pub fn link_by_id(&self, link_id: Uuid) -> Option<&Link> {
        self.links.get(&link_id)
    }

    /// Get a joint by ID
    pub fn joint_by_id(&self, joint_id: Uuid) -> Option<&Joint> {
        self.joints.get(&joint_id)
    }

    /// All links, in no particular order
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// All joints, in no particular order
    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.joints.values()
    }

    /// Count total number of links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Count total number of joints
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    // ============== Topology ==============

    /// Direct children of a link as (joint_id, child_link_id), in traversal order
    pub fn children(&self, link_id: Uuid) -> &[(Uuid, Uuid)] {
        self.children
            .get(&link_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Links of the subtree rooted at `start`, depth-first pre-order
    pub fn links_depth_first(&self, start: Uuid) -> Vec<Uuid> {
        let mut result = Vec::new();
        self.collect_depth_first(start, &mut result);
        result
    }

    fn collect_depth_first(&self, link_id: Uuid, result: &mut Vec<Uuid>) {
        result.push(link_id);
        for (_, child_id) in self.children(link_id) {
            self.collect_depth_first(*child_id, result);
        }
    }

    /// Joints strictly below `start`, depth-first pre-order
    pub fn joints_below(&self, start: Uuid) -> Vec<Uuid> {
        self.links_depth_first(start)
            .into_iter()
            .flat_map(|link_id| self.children(link_id).iter().map(|(joint_id, _)| *joint_id))
            .collect()
    }

    /// Joints strictly below `start`, depth-first post-order (deepest first)
    pub(crate) fn joints_below_post_order(&self, start: Uuid) -> Vec<Uuid> {
        let mut result = Vec::new();
        self.collect_post_order(start, &mut result);
        result
    }

    fn collect_post_order(&self, link_id: Uuid, result: &mut Vec<Uuid>) {
        for (joint_id, child_id) in self.children(link_id) {
            self.collect_post_order(*child_id, result);
            result.push(*joint_id);
        }
    }

    /// Names of the joints below the starting link (default root), depth-first
    pub fn joint_names_below(&self, from_link: Option<&str>) -> Result<Vec<String>, NotFoundError> {
        let start = self.resolve_start(from_link)?;
        Ok(self
            .joints_below(start)
            .into_iter()
            .filter_map(|id| self.joints.get(&id).map(|j| j.name.clone()))
            .collect())
    }

    // ============== Transforms ==============

    /// World pose of a link, composed from the root along parent joints
    pub fn world_pose_by_id(&self, link_id: Uuid) -> Pose {
        let mut pose = Pose::IDENTITY;
        let mut current = link_id;
        while let Some((joint_id, parent_id)) = self.parent.get(&current) {
            if let Some(joint) = self.joints.get(joint_id) {
                pose = joint.origin * pose;
            }
            current = *parent_id;
        }
        pose
    }

    /// World pose of a named link
    pub fn world_pose(&self, link_name: &str) -> Result<Pose, NotFoundError> {
        Ok(self.world_pose_by_id(self.link_id(link_name)?))
    }

    /// World poses of a link's visual elements, in visual order
    pub fn visual_world_poses(&self, link_name: &str) -> Result<Vec<Pose>, NotFoundError> {
        let link = self.link(link_name)?;
        let link_pose = self.world_pose_by_id(link.id);
        Ok(link.visuals.iter().map(|v| link_pose * v.origin).collect())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::super::test_support::arm;
    use crate::error::NotFoundError;

    #[test]
    fn test_lookup_by_name() {
        let tree = arm();
        assert_eq!(tree.link("shoulder").unwrap().name, "shoulder");
        assert_eq!(tree.joint("shoulder_pitch").unwrap().name, "shoulder_pitch");
        assert_eq!(
            tree.link("elbow").unwrap_err(),
            NotFoundError::Link("elbow".into())
        );
        assert_eq!(
            tree.joint("elbow").unwrap_err(),
            NotFoundError::Joint("elbow".into())
        );
    }

    #[test]
    fn test_traversal_order() {
        let tree = arm();
        let names: Vec<_> = tree
            .links_depth_first(tree.resolve_start(None).unwrap())
            .into_iter()
            .map(|id| tree.link_by_id(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, ["base", "shoulder", "upperarm"]);
        assert_eq!(
            tree.joint_names_below(None).unwrap(),
            ["base_to_shoulder", "shoulder_pitch"]
        );
        assert_eq!(
            tree.joint_names_below(Some("shoulder")).unwrap(),
            ["shoulder_pitch"]
        );
        assert!(tree.joint_names_below(Some("upperarm")).unwrap().is_empty());
    }

    #[test]
    fn test_world_pose_composes_parent_joints() {
        let tree = arm();
        let expected =
            tree.joint("base_to_shoulder").unwrap().origin * tree.joint("shoulder_pitch").unwrap().origin;
        let pose = tree.world_pose("upperarm").unwrap();
        assert!(pose.abs_diff_eq(&expected, 1e-6));
        assert!(tree
            .world_pose("base")
            .unwrap()
            .translation
            .abs_diff_eq(Vec3::ZERO, 0.0));
    }
}
