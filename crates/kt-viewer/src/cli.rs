//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::config::{OutputFormat, ViewerConfig};

#[derive(Parser, Debug)]
#[command(name = "kt-view")]
#[command(about = "Load a URDF, simplify its kinematic tree and emit a scene graph")]
pub struct Args {
    /// URDF file to load
    pub input: PathBuf,

    /// Link to root the scene at ("root" for the tree root)
    pub from_link: Option<String>,

    /// RON configuration file (command-line flags override it)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Merge fixed joints into their parent links
    #[arg(long)]
    pub join_fixed_links: bool,

    /// Rotate all actuated joint axes onto +Z
    #[arg(long)]
    pub rotate_axes_z: bool,

    /// Do not attach joint-axis markers
    #[arg(long)]
    pub no_display_axes: bool,

    /// Joint-axis marker radius
    #[arg(long)]
    pub axes_radius: Option<f32>,

    /// Joint-axis marker length
    #[arg(long)]
    pub axes_length: Option<f32>,

    /// Package root for package:// URIs, as NAME=DIR (repeatable)
    #[arg(long = "package", value_parser = parse_package)]
    pub packages: Vec<(String, PathBuf)>,

    /// Read mesh files into the scene
    #[arg(long)]
    pub load_meshes: bool,

    /// Write the scene here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Scene serialization format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl Args {
    /// Apply command-line overrides on top of a base configuration
    pub fn apply(&self, mut config: ViewerConfig) -> ViewerConfig {
        if let Some(from_link) = &self.from_link {
            config.from_link = Some(from_link.clone());
        }
        config.join_fixed_links |= self.join_fixed_links;
        config.rotate_axes_z |= self.rotate_axes_z;
        if self.no_display_axes {
            config.display_axes = false;
        }
        if let Some(radius) = self.axes_radius {
            config.axes_radius = radius;
        }
        if let Some(length) = self.axes_length {
            config.axes_length = length;
        }
        config.load_meshes |= self.load_meshes;
        for (name, dir) in &self.packages {
            config.packages.insert(name.clone(), dir.clone());
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        config
    }
}

fn parse_package(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((name, dir)) if !name.is_empty() && !dir.is_empty() => {
            Ok((name.to_string(), PathBuf::from(dir)))
        }
        _ => Err(format!("expected NAME=DIR, got '{value}'")),
    }
}
