//! Error types for scene emission

use std::path::PathBuf;

/// Why a geometry entry could not be converted into a scene primitive
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionErrorKind {
    /// Mesh geometry with an empty filename
    #[error("mesh has an empty source")]
    EmptySource,

    /// Mesh file extension not handled by the loader
    #[error("unsupported mesh format: {0}")]
    UnsupportedFormat(String),

    /// `package://` URI naming a package that could not be located
    #[error("package '{package}' not found for {uri}")]
    PackageNotFound {
        /// Package name from the URI
        package: String,
        /// The full URI
        uri: String,
    },

    /// Resolved mesh path does not exist
    #[error("mesh file not found: {}", .0.display())]
    MeshNotFound(PathBuf),

    /// Mesh file exists but could not be read
    #[error("failed to load mesh: {0}")]
    MeshLoad(#[from] MeshError),
}

/// A geometry entry skipped during emission
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("link '{link}', geometry '{geometry}': {kind}")]
pub struct ConversionError {
    /// Link owning the geometry
    pub link: String,
    /// Geometry entry name (or `{link}/visual_{index}` when unnamed)
    pub geometry: String,
    /// Failure reason
    pub kind: ConversionErrorKind,
}

/// Errors from mesh file loading
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// File could not be opened
    #[error("I/O error: {0}")]
    Io(String),

    /// File contents could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// File parsed but held no triangles
    #[error("mesh contains no triangles")]
    EmptyMesh,
}
