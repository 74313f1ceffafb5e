//! Mesh source resolution (`package://`, `file://` and relative paths)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConversionErrorKind;

/// Mesh file format, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    /// STL (binary or ASCII)
    Stl,
    /// Wavefront OBJ
    Obj,
    /// COLLADA
    Dae,
    /// Anything else
    Unknown,
}

impl MeshFormat {
    /// Detect format from file path
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("stl") => MeshFormat::Stl,
            Some("obj") => MeshFormat::Obj,
            Some("dae") => MeshFormat::Dae,
            _ => MeshFormat::Unknown,
        }
    }

    /// Check if the format can be loaded
    pub fn is_supported(&self) -> bool {
        matches!(self, MeshFormat::Stl | MeshFormat::Obj)
    }

    /// Get format name
    pub fn name(&self) -> &'static str {
        match self {
            MeshFormat::Stl => "STL",
            MeshFormat::Obj => "OBJ",
            MeshFormat::Dae => "DAE (COLLADA)",
            MeshFormat::Unknown => "Unknown",
        }
    }
}

/// Resolves URDF mesh filenames to filesystem paths.
///
/// Relative paths are taken against `base_dir` (normally the URDF's
/// directory). `package://name/...` URIs are looked up in `package_paths`
/// first, then in a few locations around `base_dir`.
#[derive(Debug, Clone, Default)]
pub struct MeshResolver {
    /// Directory relative paths are resolved against
    pub base_dir: PathBuf,
    /// Package name to package root directory
    pub package_paths: HashMap<String, PathBuf>,
}

impl MeshResolver {
    /// Create a resolver for the given base directory
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            package_paths: HashMap::new(),
        }
    }

    /// Map a package name to its root directory
    pub fn with_package(mut self, name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.package_paths.insert(name.into(), root.into());
        self
    }

    /// Add packages discovered from the ROS environment.
    ///
    /// Explicit mappings win over discovered ones.
    pub fn with_ros_packages(mut self) -> Self {
        for (name, root) in discover_ros_packages() {
            self.package_paths.entry(name).or_insert(root);
        }
        self
    }

    /// Resolve a mesh filename to an existing file of a supported format
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, ConversionErrorKind> {
        if filename.trim().is_empty() {
            return Err(ConversionErrorKind::EmptySource);
        }

        if let Some(rest) = filename.strip_prefix("package://") {
            return self.resolve_package_uri(rest, filename);
        }

        let path_str = filename.strip_prefix("file://").unwrap_or(filename);
        check_format(Path::new(path_str), filename)?;

        let path = if Path::new(path_str).is_absolute() {
            PathBuf::from(path_str)
        } else {
            self.base_dir.join(path_str)
        };

        if !path.exists() {
            return Err(ConversionErrorKind::MeshNotFound(path));
        }
        Ok(path)
    }

    fn resolve_package_uri(
        &self,
        rest: &str,
        original_uri: &str,
    ) -> Result<PathBuf, ConversionErrorKind> {
        let (package_name, relative_path) = rest.split_once('/').unwrap_or((rest, ""));
        check_format(Path::new(relative_path), original_uri)?;

        if let Some(package_root) = self.package_paths.get(package_name) {
            let path = package_root.join(relative_path);
            if path.exists() {
                return Ok(path);
            }
            return Err(ConversionErrorKind::MeshNotFound(path));
        }

        // URDF usually lives inside its own package (often in urdf/)
        let prefixes = [
            PathBuf::new(),
            PathBuf::from(".."),
            Path::new("..").join(package_name),
            Path::new("../..").join(package_name),
        ];
        if let Some(found) = prefixes
            .iter()
            .find_map(|prefix| self.base_dir.join(prefix).join(relative_path).canonicalize().ok())
        {
            debug!("Resolved {} via fallback {}", original_uri, found.display());
            return Ok(found);
        }

        Err(ConversionErrorKind::PackageNotFound {
            package: package_name.to_string(),
            uri: original_uri.to_string(),
        })
    }
}

fn check_format(path: &Path, original: &str) -> Result<(), ConversionErrorKind> {
    let format = MeshFormat::from_path(path);
    if format.is_supported() {
        Ok(())
    } else {
        Err(ConversionErrorKind::UnsupportedFormat(format!(
            "{} ({})",
            original,
            format.name()
        )))
    }
}

/// Environment variables listing package locations, with the subdirectory
/// of each entry that holds the packages
const PACKAGE_PATH_VARS: [(&str, Option<&str>); 3] = [
    ("ROS_PACKAGE_PATH", None),
    ("AMENT_PREFIX_PATH", Some("share")),
    ("COLCON_PREFIX_PATH", Some("share")),
];

/// Discover ROS packages from `ROS_PACKAGE_PATH`, `AMENT_PREFIX_PATH` and
/// `COLCON_PREFIX_PATH`. Earlier entries win on name clashes.
pub fn discover_ros_packages() -> HashMap<String, PathBuf> {
    let mut packages = HashMap::new();

    for (var, subdir) in PACKAGE_PATH_VARS {
        let Some(value) = std::env::var_os(var) else {
            continue;
        };
        for entry in std::env::split_paths(&value) {
            let dir = match subdir {
                Some(subdir) => entry.join(subdir),
                None => entry,
            };
            if dir.is_dir() {
                discover_packages_in_dir(&dir, &mut packages);
            }
        }
    }

    debug!("Discovered {} ROS packages", packages.len());
    packages
}

/// Register every subdirectory holding a package.xml
fn discover_packages_in_dir(dir: &Path, packages: &mut HashMap<String, PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.join("package.xml").is_file()
            && let Some(name) = path.file_name().and_then(|n| n.to_str())
        {
            packages.entry(name.to_string()).or_insert(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_format() {
        assert_eq!(MeshFormat::from_path(Path::new("a/b.STL")), MeshFormat::Stl);
        assert_eq!(MeshFormat::from_path(Path::new("b.obj")), MeshFormat::Obj);
        assert!(!MeshFormat::from_path(Path::new("b.dae")).is_supported());
        assert!(!MeshFormat::from_path(Path::new("noext")).is_supported());
    }

    #[test]
    fn test_relative_and_file_uri() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("part.stl"), b"").unwrap();
        let resolver = MeshResolver::new(dir.path());

        assert_eq!(resolver.resolve("part.stl").unwrap(), dir.path().join("part.stl"));
        let absolute = format!("file://{}", dir.path().join("part.stl").display());
        assert_eq!(resolver.resolve(&absolute).unwrap(), dir.path().join("part.stl"));
    }

    #[test]
    fn test_resolution_failures() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = MeshResolver::new(dir.path());

        assert_eq!(resolver.resolve(""), Err(ConversionErrorKind::EmptySource));
        assert!(matches!(
            resolver.resolve("part.dae"),
            Err(ConversionErrorKind::UnsupportedFormat(_))
        ));
        assert!(matches!(
            resolver.resolve("missing.stl"),
            Err(ConversionErrorKind::MeshNotFound(_))
        ));
        assert!(matches!(
            resolver.resolve("package://nowhere_pkg_xyz/meshes/a.stl"),
            Err(ConversionErrorKind::PackageNotFound { ref package, .. }) if package == "nowhere_pkg_xyz"
        ));
    }

    #[test]
    fn test_package_mapping() {
        let pkg = tempfile::tempdir().unwrap();
        std::fs::create_dir(pkg.path().join("meshes")).unwrap();
        std::fs::write(pkg.path().join("meshes/link.obj"), b"").unwrap();
        let resolver = MeshResolver::new("/nonexistent").with_package("demo", pkg.path());

        assert_eq!(
            resolver.resolve("package://demo/meshes/link.obj").unwrap(),
            pkg.path().join("meshes/link.obj")
        );
        assert!(matches!(
            resolver.resolve("package://demo/meshes/other.obj"),
            Err(ConversionErrorKind::MeshNotFound(_))
        ));
    }

    #[test]
    fn test_package_fallback_next_to_urdf() {
        let pkg = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(pkg.path().join("urdf")).unwrap();
        std::fs::create_dir_all(pkg.path().join("meshes")).unwrap();
        std::fs::write(pkg.path().join("meshes/base.stl"), b"").unwrap();
        let resolver = MeshResolver::new(pkg.path().join("urdf"));

        let resolved = resolver.resolve("package://demo/meshes/base.stl").unwrap();
        assert!(resolved.ends_with("meshes/base.stl"));
    }

    #[test]
    fn test_discover_packages_in_dir() {
        let share = tempfile::tempdir().unwrap();
        std::fs::create_dir(share.path().join("robot_description")).unwrap();
        std::fs::write(share.path().join("robot_description/package.xml"), b"<package/>").unwrap();
        std::fs::create_dir(share.path().join("not_a_package")).unwrap();

        let mut packages = HashMap::new();
        discover_packages_in_dir(share.path(), &mut packages);
        assert_eq!(packages.len(), 1);
        assert!(packages.contains_key("robot_description"));
    }
}
