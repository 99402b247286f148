use crate::core::assembler::Topology;
use crate::core::geometry::Vertex;
use crate::error::LoadError;
use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::io;
use std::path::Path;

/// Loads an OBJ file and returns a unified triangle-list Mesh with tangents.
///
/// All objects in the file are merged into one mesh. Texture V is flipped so
/// that UV (0, 0) addresses the top-left texel. Objects without normals get
/// smooth normals from their faces; authored normals of other objects in the
/// same file are kept.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::Io {
            path: path.display().to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
        });
    }

    info!("Loading OBJ file: {}", path.display());

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true, // One index stream for position/normal/UV
        ..Default::default()
    };

    // Materials come from the scene config, MTL files are not read.
    let (models, _materials) = tobj::load_obj(path, &load_options)?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut missing_normals = Vec::new();

    for model in models {
        let mesh = &model.mesh;
        let num_vertices = mesh.positions.len() / 3;
        let vertex_offset = vertices.len();
        let index_offset = vertex_offset as u32;

        let has_normals = mesh.normals.len() == mesh.positions.len();
        let has_texcoords = mesh.texcoords.len() / 2 == num_vertices;

        if !has_normals {
            warn!("Mesh '{}' is missing normals, computing them from faces.", model.name);
            missing_normals.push(vertex_offset..vertex_offset + num_vertices);
        }
        if !has_texcoords {
            warn!("Mesh '{}' is missing texture coordinates.", model.name);
        }

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            );

            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::zeros()
            };

            let texcoord = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };

            vertices.push(Vertex::new(position, normal, texcoord));
        }

        indices.extend(mesh.indices.iter().map(|index| index + index_offset));
    }

    let mut mesh = Mesh::new(vertices, indices, Topology::TriangleList)?;
    for range in missing_normals {
        mesh.compute_normals_in(range);
    }
    mesh.compute_tangents();

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total indices: {}",
        mesh.vertices().len(),
        mesh.indices().len()
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;

    fn write_temp_obj(name: &str, content: &str) -> std::path::PathBuf {
        let file_name = format!("softraster_{}_{}.obj", name, std::process::id());
        let path = std::env::temp_dir().join(file_name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_quad_with_flipped_v_and_tangents() {
        let path = write_temp_obj(
            "quad",
            "v -1 -1 0\nv 1 -1 0\nv 1 1 0\nv -1 1 0\n\
             vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
             vn 0 0 1\n\
             f 1/1/1 2/2/1 3/3/1 4/4/1\n",
        );
        let mesh = load_obj(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.indices().len(), 6);
        assert_eq!(mesh.topology, Topology::TriangleList);

        let bottom_left = mesh
            .vertices()
            .iter()
            .find(|v| v.position == Point3::new(-1.0, -1.0, 0.0))
            .unwrap();
        assert_relative_eq!(bottom_left.texcoord, Vector2::new(0.0, 1.0));

        for v in mesh.vertices() {
            assert_relative_eq!(v.normal, Vector3::z(), epsilon = 1e-6);
            assert_relative_eq!(v.tangent, Vector3::x(), epsilon = 1e-5);
        }
    }

    #[test]
    fn missing_normals_are_computed() {
        let path = write_temp_obj("no_normals", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mesh = load_obj(&path).unwrap();
        fs::remove_file(&path).ok();

        for v in mesh.vertices() {
            assert_relative_eq!(v.normal, Vector3::z(), epsilon = 1e-6);
        }
    }

    #[test]
    fn authored_normals_survive_a_sibling_without_them() {
        let path = write_temp_obj(
            "mixed_normals",
            "o a
             v 0 0 0
v 1 0 0
v 0 1 0
             vn 1 0 0
             f 1//1 2//1 3//1
             o b
             v 2 0 0
v 3 0 0
v 2 1 0
             f 4 5 6
",
        );
        let mesh = load_obj(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(mesh.vertices().len(), 6);
        for v in &mesh.vertices()[..3] {
            assert_eq!(v.normal, Vector3::x());
        }
        for v in &mesh.vertices()[3..] {
            assert_relative_eq!(v.normal, Vector3::z(), epsilon = 1e-6);
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_obj("no/such/model.obj").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
