//! Fixed-joint collapsing
//!
//! A fixed joint's child link is merged into its parent link: geometry and
//! inertial data are re-expressed in the parent frame, and the child's own
//! child joints are re-attached to the parent in the slot the fixed joint
//! occupied.

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{NotFoundError, TreeError};
use crate::tree::KinematicTree;

impl KinematicTree {
    /// Remove every fixed joint strictly below `from_link` (default root).
    ///
    /// Returns a new tree; `self` is left untouched. Links outside the subtree
    /// pass through unchanged.
    pub fn join_fixed_links(&self, from_link: Option<&str>) -> Result<KinematicTree, NotFoundError> {
        let start = self.resolve_start(from_link)?;

        let fixed: Vec<Uuid> = self
            .joints_below_post_order(start)
            .into_iter()
            .filter(|id| self.joints[id].is_fixed())
            .collect();

        let mut tree = self.clone();
        for joint_id in &fixed {
            tree.contract(*joint_id);
        }

        info!(
            "Joined {} fixed joint(s) below '{}': {} links remain",
            fixed.len(),
            self.links[&start].name,
            tree.link_count()
        );
        Ok(tree)
    }

    /// Merge the child of a single fixed joint into its parent link
    pub fn contract_fixed_joint(&self, joint_name: &str) -> Result<KinematicTree, TreeError> {
        let joint = self.joint(joint_name)?;
        if !joint.is_fixed() {
            return Err(TreeError::NotFixed(joint_name.to_string()));
        }
        let mut tree = self.clone();
        tree.contract(joint.id);
        Ok(tree)
    }

    fn contract(&mut self, joint_id: Uuid) {
        let Some(joint) = self.joints.remove(&joint_id) else {
            return;
        };
        self.joint_name_index.remove(&joint.name);
        let parent_id = joint.parent_link;
        let child_id = joint.child_link;
        self.parent.remove(&child_id);

        let Some(child) = self.links.remove(&child_id) else {
            return;
        };
        self.link_name_index.remove(&child.name);

        let grandchildren = self.children.remove(&child_id).unwrap_or_default();
        for (grandchild_joint, grandchild) in &grandchildren {
            if let Some(j) = self.joints.get_mut(grandchild_joint) {
                j.origin = joint.origin * j.origin;
                j.parent_link = parent_id;
            }
            self.parent
                .insert(*grandchild, (*grandchild_joint, parent_id));
        }

        if let Some(siblings) = self.children.get_mut(&parent_id)
            && let Some(slot) = siblings.iter().position(|(id, _)| *id == joint_id)
        {
            siblings.splice(slot..=slot, grandchildren);
        }

        if let Some(parent) = self.links.get_mut(&parent_id) {
            debug!("Merging link '{}' into '{}'", child.name, parent.name);
            parent.absorb(child, &joint.origin);
        }
    }
}
