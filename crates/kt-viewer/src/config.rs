//! Viewer configuration

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Serialization format for the emitted scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Ron,
    Json,
}

/// Pipeline settings, loadable from RON and overridden from the command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Link to root the scene at (None or "root" means the tree root)
    pub from_link: Option<String>,
    /// Merge fixed joints into their parent link before emitting
    pub join_fixed_links: bool,
    /// Rotate every actuated joint axis onto +Z
    pub rotate_axes_z: bool,
    /// Attach joint-axis markers
    pub display_axes: bool,
    pub axes_radius: f32,
    pub axes_length: f32,
    /// Read mesh files into the scene
    pub load_meshes: bool,
    /// Explicit `package://` roots
    pub packages: BTreeMap<String, PathBuf>,
    /// Also look up packages from ROS_PACKAGE_PATH / AMENT_PREFIX_PATH / COLCON_PREFIX_PATH
    pub discover_ros_packages: bool,
    pub format: OutputFormat,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            from_link: None,
            join_fixed_links: false,
            rotate_axes_z: false,
            display_axes: true,
            axes_radius: 0.001,
            axes_length: 0.015,
            load_meshes: false,
            packages: BTreeMap::new(),
            discover_ros_packages: true,
            format: OutputFormat::Ron,
        }
    }
}

impl ViewerConfig {
    /// Load a configuration from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_ron(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Parse a configuration from RON text
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Starting link, with the literal "root" mapped to the tree root
    pub fn start_link(&self) -> Option<&str> {
        self.from_link.as_deref().filter(|name| *name != "root")
    }
}
