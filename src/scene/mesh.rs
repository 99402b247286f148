use crate::core::assembler::{Topology, TriangleAssembler};
use crate::core::color::Color;
use crate::core::geometry::{ScreenVertex, Vertex};
use crate::core::math::interpolation::cross2;
use crate::error::RasterError;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use std::ops::Range;

/// A collection of vertices and indices representing a 3D object.
///
/// Vertex and index buffers are fixed after construction; the world matrix
/// may change every frame. `screen_vertices` is the transient output of the
/// vertex stage and is rebuilt on every render.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    pub topology: Topology,
    pub world_matrix: Matrix4<f32>,
    pub material_id: usize,
    pub(crate) screen_vertices: Vec<ScreenVertex>,
}

impl Mesh {
    /// Fails if an index does not refer to a vertex.
    pub fn new(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        topology: Topology,
    ) -> Result<Self, RasterError> {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(RasterError::IndexOutOfRange {
                index,
                count: vertices.len(),
            });
        }

        Ok(Self {
            vertices,
            indices,
            topology,
            world_matrix: Matrix4::identity(),
            material_id: 0,
            screen_vertices: Vec::new(),
        })
    }

    pub fn with_material(mut self, material_id: usize) -> Self {
        self.material_id = material_id;
        self
    }

    pub fn with_world_matrix(mut self, world_matrix: Matrix4<f32>) -> Self {
        self.world_matrix = world_matrix;
        self
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Output of the most recent vertex stage run.
    pub fn screen_vertices(&self) -> &[ScreenVertex] {
        &self.screen_vertices
    }

    /// Number of non-degenerate faces described by the index buffer.
    pub fn face_count(&self) -> usize {
        self.faces().len()
    }

    /// Index triples of every face in draw winding, without any screen-space
    /// filtering.
    fn faces(&self) -> Vec<[usize; 3]> {
        TriangleAssembler::from_indices(&self.indices, self.topology).collect()
    }

    /// Replaces every normal with the normalized sum of the (area weighted)
    /// normals of the faces sharing the vertex. Counter-clockwise faces point
    /// towards the viewer.
    pub fn compute_normals(&mut self) {
        self.compute_normals_in(0..self.vertices.len());
    }

    /// Same as [`Mesh::compute_normals`], but only vertices inside `range` are
    /// rewritten. Faces outside the range still contribute to vertices they
    /// share with it.
    pub fn compute_normals_in(&mut self, range: Range<usize>) {
        let mut accumulated = vec![Vector3::<f32>::zeros(); self.vertices.len()];

        for [i0, i1, i2] in self.faces() {
            let p0 = self.vertices[i0].position;
            let edge0 = self.vertices[i1].position - p0;
            let edge1 = self.vertices[i2].position - p0;
            let face_normal = edge0.cross(&edge1);
            for i in [i0, i1, i2] {
                accumulated[i] += face_normal;
            }
        }

        for (i, (vertex, normal)) in self.vertices.iter_mut().zip(accumulated).enumerate() {
            if range.contains(&i) {
                vertex.normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
            }
        }
    }

    /// Computes per-vertex tangents from UV-space derivatives.
    ///
    /// Face tangents are accumulated on every vertex they touch, then made
    /// orthogonal to the vertex normal and normalized. Faces with degenerate
    /// UVs contribute nothing.
    pub fn compute_tangents(&mut self) {
        let mut accumulated = vec![Vector3::<f32>::zeros(); self.vertices.len()];

        for [i0, i1, i2] in self.faces() {
            let (v0, v1, v2) = (&self.vertices[i0], &self.vertices[i1], &self.vertices[i2]);

            let edge0 = v1.position - v0.position;
            let edge1 = v2.position - v0.position;
            let diff_x = Vector2::new(v1.texcoord.x - v0.texcoord.x, v2.texcoord.x - v0.texcoord.x);
            let diff_y = Vector2::new(v1.texcoord.y - v0.texcoord.y, v2.texcoord.y - v0.texcoord.y);

            let det = cross2(diff_x, diff_y);
            if det.abs() < f32::EPSILON {
                continue;
            }

            let tangent = (edge0 * diff_y.y - edge1 * diff_y.x) / det;
            for i in [i0, i1, i2] {
                accumulated[i] += tangent;
            }
        }

        for (vertex, tangent) in self.vertices.iter_mut().zip(accumulated) {
            let rejected = tangent - vertex.normal * vertex.normal.dot(&tangent);
            vertex.tangent = rejected
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(Vector3::zeros);
        }
    }

    /// Creates a single colored triangle facing +Z.
    pub fn create_test_triangle() -> Self {
        let normal = Vector3::new(0.0, 0.0, 1.0);
        let corners = [
            (Point3::new(0.0, 0.5, 0.0), Vector2::new(0.5, 0.0), Color::new(1.0, 0.0, 0.0)),
            (Point3::new(-0.5, -0.5, 0.0), Vector2::new(0.0, 1.0), Color::new(0.0, 1.0, 0.0)),
            (Point3::new(0.5, -0.5, 0.0), Vector2::new(1.0, 1.0), Color::new(0.0, 0.0, 1.0)),
        ];
        let vertices = corners
            .into_iter()
            .map(|(position, uv, color)| Vertex {
                color,
                ..Vertex::new(position, normal, uv)
            })
            .collect();

        Self {
            vertices,
            indices: vec![0, 1, 2],
            topology: Topology::TriangleList,
            world_matrix: Matrix4::identity(),
            material_id: 0,
            screen_vertices: Vec::new(),
        }
    }

    /// A 3x3 vertex grid spanning [-3, 3]² in the XY plane, drawn as one
    /// triangle strip of two rows joined by degenerate restart indices.
    pub fn create_strip_grid() -> Self {
        let normal = Vector3::new(0.0, 0.0, 1.0);
        let mut vertices = Vec::with_capacity(9);
        for row in 0..3 {
            for col in 0..3 {
                let u = col as f32 / 2.0;
                let v = row as f32 / 2.0;
                vertices.push(Vertex {
                    color: Color::new(u, v, 1.0 - u * v),
                    ..Vertex::new(
                        Point3::new(-3.0 + 3.0 * col as f32, 3.0 - 3.0 * row as f32, 0.0),
                        normal,
                        Vector2::new(u, v),
                    )
                });
            }
        }

        Self {
            vertices,
            indices: vec![3, 0, 4, 1, 5, 2, 2, 6, 6, 3, 7, 4, 8, 5],
            topology: Topology::TriangleStrip,
            world_matrix: Matrix4::identity(),
            material_id: 0,
            screen_vertices: Vec::new(),
        }
    }
}
