//! Mesh file loading (STL, OBJ)

use std::collections::HashMap;
use std::io::BufReader;
use std::path::Path;

use glam::Vec3;

use crate::error::MeshError;
use crate::node::TriangleMesh;
use crate::resolve::MeshFormat;

/// Load a mesh file, applying a per-axis scale to its vertices
pub fn load_mesh(path: &Path, scale: Vec3) -> Result<TriangleMesh, MeshError> {
    match MeshFormat::from_path(path) {
        MeshFormat::Stl => load_stl(path, scale),
        MeshFormat::Obj => load_obj(path, scale),
        format => Err(MeshError::Parse(format!(
            "{} is not a loadable format ({})",
            path.display(),
            format.name()
        ))),
    }
}

/// Load an STL file, welding duplicate vertices
pub fn load_stl(path: &Path, scale: Vec3) -> Result<TriangleMesh, MeshError> {
    let file = std::fs::File::open(path).map_err(|e| MeshError::Io(e.to_string()))?;
    let mut reader = BufReader::new(file);
    let mesh = stl_io::read_stl(&mut reader).map_err(|e| MeshError::Parse(e.to_string()))?;

    if mesh.faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    // Quantization for vertex welding
    const PRECISION: f32 = 10000.0;

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut vertex_map: HashMap<[i32; 3], u32> = HashMap::new();
    let mut indices: Vec<u32> = Vec::with_capacity(mesh.faces.len() * 3);

    for face in &mesh.faces {
        for &vertex_idx in &face.vertices {
            let vertex = mesh.vertices[vertex_idx];
            let v = [vertex[0] * scale.x, vertex[1] * scale.y, vertex[2] * scale.z];
            let key = [
                (v[0] * PRECISION).round() as i32,
                (v[1] * PRECISION).round() as i32,
                (v[2] * PRECISION).round() as i32,
            ];
            let index = *vertex_map.entry(key).or_insert_with(|| {
                positions.push(v);
                positions.len() as u32 - 1
            });
            indices.push(index);
        }
    }

    Ok(TriangleMesh { positions, indices })
}

/// Load an OBJ file, merging all models into one mesh
pub fn load_obj(path: &Path, scale: Vec3) -> Result<TriangleMesh, MeshError> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|e| match e {
        tobj::LoadError::OpenFileFailed => MeshError::Io(format!("cannot open {}", path.display())),
        other => MeshError::Parse(other.to_string()),
    })?;

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let offset = positions.len() as u32;
        positions.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|c| [c[0] * scale.x, c[1] * scale.y, c[2] * scale.z]),
        );
        indices.extend(mesh.indices.iter().map(|i| i + offset));
    }

    if indices.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    Ok(TriangleMesh { positions, indices })
}
