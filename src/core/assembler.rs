use crate::core::geometry::ScreenVertex;
use serde::Deserialize;

/// How a mesh's index buffer is turned into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Independent triangles, three indices each.
    #[default]
    TriangleList,
    /// Every window of three consecutive indices is a triangle, with the
    /// winding flipped on every other emitted triangle.
    TriangleStrip,
}

/// Walks an index buffer and yields vertex index triples in draw order.
///
/// For strips the winding parity is a fold over the emitted triangles:
/// windows that repeat an index, or whose vertices share a screen position
/// (strip restart markers), are skipped without flipping the parity.
pub struct TriangleAssembler<'a> {
    indices: &'a [u32],
    vertices: Option<&'a [ScreenVertex]>,
    topology: Topology,
    cursor: usize,
    clockwise: bool,
}

impl<'a> TriangleAssembler<'a> {
    pub fn new(indices: &'a [u32], vertices: &'a [ScreenVertex], topology: Topology) -> Self {
        Self {
            indices,
            vertices: Some(vertices),
            topology,
            cursor: 0,
            clockwise: true,
        }
    }

    /// Assembles faces from the index buffer alone, before any vertex has
    /// been transformed. Only repeated indices count as degenerate.
    pub fn from_indices(indices: &'a [u32], topology: Topology) -> Self {
        Self {
            indices,
            vertices: None,
            topology,
            cursor: 0,
            clockwise: true,
        }
    }

    /// True if an index repeats, any two of the three vertices share a screen
    /// position, or an index does not resolve to a vertex.
    fn is_degenerate(&self, [a, b, c]: [usize; 3]) -> bool {
        if a == b || b == c || a == c {
            return true;
        }
        let Some(vertices) = self.vertices else {
            return false;
        };
        match (vertices.get(a), vertices.get(b), vertices.get(c)) {
            (Some(v0), Some(v1), Some(v2)) => {
                v0.position == v1.position
                    || v1.position == v2.position
                    || v0.position == v2.position
            }
            _ => true,
        }
    }

    fn window(&self, len: usize) -> Option<[usize; 3]> {
        let window = self.indices.get(self.cursor..self.cursor + len)?;
        Some([window[0] as usize, window[1] as usize, window[2] as usize])
    }
}

impl Iterator for TriangleAssembler<'_> {
    type Item = [usize; 3];

    fn next(&mut self) -> Option<Self::Item> {
        match self.topology {
            Topology::TriangleList => {
                let triangle = self.window(3)?;
                self.cursor += 3;
                Some(triangle)
            }
            Topology::TriangleStrip => loop {
                let [i0, i1, i2] = self.window(3)?;
                self.cursor += 1;

                if self.is_degenerate([i0, i1, i2]) {
                    continue;
                }

                let triangle = if self.clockwise {
                    [i0, i1, i2]
                } else {
                    [i2, i1, i0]
                };
                self.clockwise = !self.clockwise;
                return Some(triangle);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::VertexAttributes;
    use nalgebra::{Vector2, Vector3, Vector4};

    fn vertex_at(x: f32, y: f32) -> ScreenVertex {
        ScreenVertex {
            position: Vector4::new(x, y, 0.5, 1.0),
            attributes: VertexAttributes {
                color: Vector3::zeros(),
                uv: Vector2::zeros(),
                normal: Vector3::zeros(),
                tangent: Vector3::zeros(),
                view_dir: Vector3::zeros(),
            },
        }
    }

    fn distinct_vertices(n: usize) -> Vec<ScreenVertex> {
        (0..n).map(|i| vertex_at(i as f32, (i % 2) as f32)).collect()
    }

    #[test]
    fn list_consumes_groups_of_three() {
        let vertices = distinct_vertices(6);
        let indices = [0, 1, 2, 3, 4, 5, 0];
        let triangles: Vec<_> =
            TriangleAssembler::new(&indices, &vertices, Topology::TriangleList).collect();
        assert_eq!(triangles, vec![[0, 1, 2], [3, 4, 5]]);
    }

    #[test]
    fn strip_alternates_winding() {
        let vertices = distinct_vertices(6);
        let indices = [0, 1, 2, 3, 4, 5];
        let triangles: Vec<_> =
            TriangleAssembler::new(&indices, &vertices, Topology::TriangleStrip).collect();
        assert_eq!(
            triangles,
            vec![[0, 1, 2], [3, 2, 1], [2, 3, 4], [5, 4, 3]]
        );
    }

    #[test]
    fn degenerate_window_emits_nothing() {
        let mut vertices = distinct_vertices(3);
        vertices[2] = vertices[0];
        let indices = [0, 1, 2];
        let mut assembler = TriangleAssembler::new(&indices, &vertices, Topology::TriangleStrip);
        assert_eq!(assembler.next(), None);
    }

    #[test]
    fn restart_markers_do_not_flip_parity() {
        let vertices = distinct_vertices(6);
        // Repeated indices form four degenerate windows between two strips.
        let indices = [0, 1, 2, 2, 3, 3, 4, 5];
        let triangles: Vec<_> =
            TriangleAssembler::new(&indices, &vertices, Topology::TriangleStrip).collect();
        assert_eq!(triangles, vec![[0, 1, 2], [5, 4, 3]]);
    }

    #[test]
    fn index_only_strip_matches_screen_strip() {
        let vertices = distinct_vertices(6);
        let indices = [0, 1, 2, 2, 3, 3, 4, 5];
        let screen: Vec<_> =
            TriangleAssembler::new(&indices, &vertices, Topology::TriangleStrip).collect();
        let by_index: Vec<_> =
            TriangleAssembler::from_indices(&indices, Topology::TriangleStrip).collect();
        assert_eq!(by_index, screen);
    }

    #[test]
    fn short_index_buffers_yield_nothing() {
        let vertices = distinct_vertices(2);
        for topology in [Topology::TriangleList, Topology::TriangleStrip] {
            assert_eq!(TriangleAssembler::new(&[0, 1], &vertices, topology).count(), 0);
            assert_eq!(TriangleAssembler::new(&[], &vertices, topology).count(), 0);
        }
    }
}
