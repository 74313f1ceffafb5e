//! Load → collapse → normalize → emit

use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use kt_core::{AxisNormalizer, ImportOptions, KinematicTree, load_urdf_file};
use kt_scene::{EmitOptions, Emission, MeshResolver, SceneNode, SceneStats, emit_scene};
use serde::Serialize;
use tracing::info;

use crate::config::{OutputFormat, ViewerConfig};

/// Result of one pipeline run
#[derive(Debug)]
pub struct PipelineOutput {
    /// Robot name from the URDF
    pub robot: String,
    /// Joints below the starting link in the loaded (uncollapsed) tree
    pub joint_names: Vec<String>,
    /// The final tree after the enabled stages
    pub tree: KinematicTree,
    pub emission: Emission,
}

/// Run the enabled stages on a URDF file
pub fn run(input: &Path, config: &ViewerConfig) -> Result<PipelineOutput> {
    let tree = load_urdf_file(input, &ImportOptions::default())
        .with_context(|| format!("loading {}", input.display()))?;
    let base_dir = input.parent().unwrap_or(Path::new("."));
    run_tree(tree, base_dir, config)
}

/// Run the enabled stages on an already loaded tree
pub fn run_tree(tree: KinematicTree, base_dir: &Path, config: &ViewerConfig) -> Result<PipelineOutput> {
    let from_link = config.start_link();
    let joint_names = tree.joint_names_below(from_link)?;

    let mut tree = tree;
    if config.join_fixed_links {
        tree = tree.join_fixed_links(from_link)?;
        info!("Joined fixed links: {} links remain", tree.link_count());
    }
    if config.rotate_axes_z {
        tree = AxisNormalizer::new(Vec3::Z).apply(&tree, from_link)?;
    }

    let emission = emit_scene(&tree, from_link, &emit_options(base_dir, config))?;
    Ok(PipelineOutput {
        robot: tree.name.clone(),
        joint_names,
        tree,
        emission,
    })
}

fn emit_options(base_dir: &Path, config: &ViewerConfig) -> EmitOptions {
    let mut resolver = MeshResolver::new(base_dir);
    for (name, dir) in &config.packages {
        resolver = resolver.with_package(name, dir);
    }
    if config.discover_ros_packages {
        resolver = resolver.with_ros_packages();
    }
    EmitOptions::default()
        .with_axes(config.display_axes)
        .axes_size(config.axes_radius, config.axes_length)
        .with_mesh_loading(config.load_meshes)
        .with_resolver(resolver)
}

/// Skipped geometry entry in the serialized document
#[derive(Debug, Serialize)]
pub struct SkippedEntry {
    pub link: String,
    pub geometry: String,
    pub reason: String,
}

/// Serialized form handed to an external viewer
#[derive(Debug, Serialize)]
pub struct SceneDocument<'a> {
    pub robot: &'a str,
    pub stats: SceneStats,
    pub root: &'a SceneNode,
    pub skipped: Vec<SkippedEntry>,
}

impl PipelineOutput {
    /// Build the serializable document
    pub fn document(&self) -> SceneDocument<'_> {
        SceneDocument {
            robot: &self.robot,
            stats: self.emission.root.stats(),
            root: &self.emission.root,
            skipped: self
                .emission
                .skipped
                .iter()
                .map(|e| SkippedEntry {
                    link: e.link.clone(),
                    geometry: e.geometry.clone(),
                    reason: e.kind.to_string(),
                })
                .collect(),
        }
    }

    /// Serialize the scene document
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        let document = self.document();
        Ok(match format {
            OutputFormat::Ron => {
                ron::ser::to_string_pretty(&document, ron::ser::PrettyConfig::default())?
            }
            OutputFormat::Json => serde_json::to_string_pretty(&document)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRIPPER_URDF: &str = r#"
<robot name="gripper">
  <link name="world"/>
  <link name="mount">
    <visual name="mount_box"><geometry><box size="0.1 0.1 0.02"/></geometry></visual>
  </link>
  <link name="camera">
    <visual name="camera_mesh"><geometry><mesh filename="meshes/camera.dae"/></geometry></visual>
  </link>
  <link name="finger">
    <visual name="finger_box"><geometry><box size="0.01 0.01 0.05"/></geometry></visual>
  </link>
  <joint name="wrist" type="continuous">
    <parent link="world"/>
    <child link="mount"/>
    <axis xyz="0 1 0"/>
  </joint>
  <joint name="camera_mount" type="fixed">
    <parent link="mount"/>
    <child link="camera"/>
    <origin xyz="0 0 0.05" rpy="0 0 0"/>
  </joint>
  <joint name="slide" type="prismatic">
    <parent link="mount"/>
    <child link="finger"/>
    <origin xyz="0.03 0 0.02" rpy="0 0 0"/>
    <axis xyz="1 0 0"/>
    <limit lower="0" upper="0.04" effort="5" velocity="0.1"/>
  </joint>
</robot>
"#;

    fn write_urdf(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("gripper.urdf");
        std::fs::write(&path, GRIPPER_URDF).unwrap();
        path
    }

    fn offline() -> ViewerConfig {
        ViewerConfig {
            discover_ros_packages: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_emit_full_tree() {
        let dir = tempfile::tempdir().unwrap();
        let output = run(&write_urdf(dir.path()), &offline()).unwrap();

        assert_eq!(output.robot, "gripper");
        assert_eq!(output.joint_names, ["wrist", "camera_mount", "slide"]);
        assert_eq!(output.emission.root.stats().nodes, 4);
        assert_eq!(output.emission.root.stats().markers, 2);
        assert_eq!(output.emission.skipped.len(), 1);
    }

    #[test]
    fn test_join_and_rotate() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig {
            join_fixed_links: true,
            rotate_axes_z: true,
            ..offline()
        };
        let output = run(&write_urdf(dir.path()), &config).unwrap();

        assert_eq!(output.tree.link_count(), 3);
        for joint in output.tree.joints() {
            assert_eq!(joint.axis(), Some(Vec3::Z));
        }
        let mount = output.emission.root.find("mount").unwrap();
        assert_eq!(mount.geometry.len(), 1);
        assert_eq!(output.emission.skipped[0].link, "mount");
        assert_eq!(output.emission.skipped[0].geometry, "camera_mesh");
    }

    #[test]
    fn test_from_link_subtree() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig {
            from_link: Some("mount".into()),
            display_axes: false,
            ..offline()
        };
        let output = run(&write_urdf(dir.path()), &config).unwrap();

        assert_eq!(output.joint_names, ["camera_mount", "slide"]);
        assert_eq!(output.emission.root.name, "mount");
        assert_eq!(output.emission.root.stats().markers, 0);
    }

    #[test]
    fn test_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig {
            from_link: Some("ghost".into()),
            ..offline()
        };
        assert!(run(&write_urdf(dir.path()), &config).is_err());
        assert!(run(&dir.path().join("missing.urdf"), &offline()).is_err());
    }

    #[test]
    fn test_render_formats() {
        let dir = tempfile::tempdir().unwrap();
        let output = run(&write_urdf(dir.path()), &offline()).unwrap();

        let json = output.render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["robot"], "gripper");
        assert_eq!(value["stats"]["nodes"], 4);
        assert_eq!(value["skipped"][0]["geometry"], "camera_mesh");

        let ron_text = output.render(OutputFormat::Ron).unwrap();
        assert!(ron_text.contains("robot: \"gripper\""));
    }
}
