use crate::core::geometry::{ScreenVertex, Vertex, VertexAttributes, normalize_or_zero};
use crate::core::math::transform::{apply_perspective_division, ndc_to_screen};
use crate::scene::camera::Camera;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix3, Matrix4, Point3, Vector4};

/// Per-frame vertex transform: mesh space to screen space.
///
/// Holds the camera snapshot of one render call. There is no frustum
/// clipping here; vertices that land outside the viewport or depth range are
/// left for the rasterizer's range check.
pub struct VertexStage {
    view_projection: Matrix4<f32>,
    camera_origin: Point3<f32>,
    width: f32,
    height: f32,
}

impl VertexStage {
    pub fn new(camera: &Camera, width: usize, height: usize) -> Self {
        Self {
            view_projection: camera.projection_matrix() * camera.view_matrix(),
            camera_origin: camera.origin,
            width: width as f32,
            height: height as f32,
        }
    }

    /// Rebuilds `mesh`'s screen vertex buffer, one entry per mesh vertex.
    ///
    /// Normals go through the inverse transpose of the world matrix's linear
    /// part, not the world matrix itself. The two only differ under
    /// non-uniform scale, where the plain world matrix would tilt normals off
    /// the surface. Tangents lie in the surface and use the linear part.
    pub fn process(&self, mesh: &mut Mesh) {
        let world = mesh.world_matrix;
        let linear = world.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map_or(linear, |inverse| inverse.transpose());

        let mut screen_vertices = std::mem::take(&mut mesh.screen_vertices);
        screen_vertices.clear();
        screen_vertices.extend(
            mesh.vertices()
                .iter()
                .map(|vertex| self.transform(vertex, &world, &linear, &normal_matrix)),
        );
        mesh.screen_vertices = screen_vertices;
    }

    /// Transforms one vertex.
    ///
    /// A vertex whose clip `w` is zero gets NaN screen coordinates, which no
    /// range check accepts.
    pub fn transform(
        &self,
        vertex: &Vertex,
        world: &Matrix4<f32>,
        linear: &Matrix3<f32>,
        normal_matrix: &Matrix3<f32>,
    ) -> ScreenVertex {
        let world_pos = world * vertex.position.to_homogeneous();
        let clip = self.view_projection * world_pos;

        let position = match apply_perspective_division(&clip) {
            Some(ndc) => {
                let screen = ndc_to_screen(ndc.x, ndc.y, self.width, self.height);
                Vector4::new(screen.x, screen.y, ndc.z, clip.w)
            }
            None => Vector4::new(f32::NAN, f32::NAN, f32::NAN, clip.w),
        };

        let world_point = Point3::from(world_pos.xyz());
        ScreenVertex {
            position,
            attributes: VertexAttributes {
                color: vertex.color,
                uv: vertex.texcoord,
                normal: normalize_or_zero(normal_matrix * vertex.normal),
                tangent: normalize_or_zero(linear * vertex.tangent),
                view_dir: normalize_or_zero(self.camera_origin - world_point),
            },
        }
    }
}
