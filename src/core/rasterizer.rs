use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::ScreenVertex;
use crate::core::math::interpolation::{
    DEGENERATE_AREA, cross2, hit_test_screen_triangle, linear_interpolate,
    perspective_interpolate, perspective_view_depth,
};
use crate::core::pipeline::FragmentShader;
use crate::scene::material::BoundMaterial;
use nalgebra::{Vector2, Vector4};

/// Default absolute tolerance of the coverage test, in doubled screen-area units.
pub const DEFAULT_COVERAGE_TOLERANCE: f32 = 1.0;

/// What happened to a triangle handed to the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleOutcome {
    /// A vertex failed the screen/depth range check; nothing was drawn.
    OutOfRange,
    /// Zero screen area; nothing was drawn.
    Degenerate,
    /// The triangle was scanned. `pixels` counts fragments that passed the
    /// depth test and were shaded.
    Drawn { pixels: usize },
}

/// Inclusive pixel rectangle, always inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

/// Draws screen-space triangles into a [`FrameBuffer`].
///
/// There is no geometric clipping: a triangle with any vertex outside the
/// viewport or the projected depth range is dropped whole.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    pub coverage_tolerance: f32,
    /// Valid projected depth range, inclusive.
    pub depth_range: (f32, f32),
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            coverage_tolerance: DEFAULT_COVERAGE_TOLERANCE,
            depth_range: (0.0, 1.0),
        }
    }

    pub fn with_tolerance(coverage_tolerance: f32) -> Self {
        Self {
            coverage_tolerance,
            ..Self::new()
        }
    }

    /// Per-vertex range check: `x ∈ [0, width]`, `y ∈ [0, height]` and the
    /// projected depth inside `depth_range`. NaN coordinates fail.
    #[inline]
    pub fn in_range(&self, vertex: &ScreenVertex, width: usize, height: usize) -> bool {
        let p = vertex.position;
        let (z_min, z_max) = self.depth_range;
        p.x >= 0.0
            && p.x <= width as f32
            && p.y >= 0.0
            && p.y <= height as f32
            && p.z >= z_min
            && p.z <= z_max
    }

    /// Screen bounding box of a triangle, clamped to `[0, width-1] × [0, height-1]`,
    /// grown by one pixel on every side to avoid seams from rounding, then
    /// clamped again. Returns `None` for an empty viewport.
    pub fn compute_bounding_box(
        points: &[Vector2<f32>; 3],
        width: usize,
        height: usize,
    ) -> Option<BoundingBox> {
        if width == 0 || height == 0 {
            return None;
        }
        let max_px = width as i64 - 1;
        let max_py = height as i64 - 1;

        let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i64;
        let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i64;
        let max_x = points[0].x.max(points[1].x).max(points[2].x).floor() as i64;
        let max_y = points[0].y.max(points[1].y).max(points[2].y).floor() as i64;

        let min_x = min_x.clamp(0, max_px) - 1;
        let min_y = min_y.clamp(0, max_py) - 1;
        let max_x = max_x.clamp(0, max_px) + 1;
        let max_y = max_y.clamp(0, max_py) + 1;

        Some(BoundingBox {
            min_x: min_x.clamp(0, max_px) as usize,
            min_y: min_y.clamp(0, max_py) as usize,
            max_x: max_x.clamp(0, max_px) as usize,
            max_y: max_y.clamp(0, max_py) as usize,
        })
    }

    /// Rasterizes one triangle.
    ///
    /// For every pixel center in the bounding box: coverage test, perspective
    /// correct view depth, depth test, attribute interpolation, then the
    /// fragment shader. The shaded color is written with its overflow rescaled.
    pub fn render_triangle<S: FragmentShader>(
        &self,
        triangle: [&ScreenVertex; 3],
        shader: &S,
        material: &BoundMaterial<'_>,
        target: &mut FrameBuffer<'_>,
    ) -> TriangleOutcome {
        let width = target.width();
        let height = target.height();
        let [v0, v1, v2] = triangle;

        // 1. Range check (no clipping)
        if !triangle.iter().all(|v| self.in_range(v, width, height)) {
            return TriangleOutcome::OutOfRange;
        }

        let screen = [v0.screen_xy(), v1.screen_xy(), v2.screen_xy()];
        if cross2(screen[1] - screen[0], screen[2] - screen[0]).abs() < DEGENERATE_AREA {
            return TriangleOutcome::Degenerate;
        }

        // 2. Bounding box
        let Some(bounds) = Self::compute_bounding_box(&screen, width, height) else {
            return TriangleOutcome::Drawn { pixels: 0 };
        };

        let w = [v0.view_depth(), v1.view_depth(), v2.view_depth()];
        let z = [
            v0.projected_depth(),
            v1.projected_depth(),
            v2.projected_depth(),
        ];
        let attributes = [v0.attributes, v1.attributes, v2.attributes];

        // 3. Pixel loop
        let mut shaded = 0;
        for py in bounds.min_y..=bounds.max_y {
            for px in bounds.min_x..=bounds.max_x {
                let pixel_center = Vector2::new(px as f32 + 0.5, py as f32 + 0.5);

                let Some(bary) = hit_test_screen_triangle(
                    pixel_center,
                    screen[0],
                    screen[1],
                    screen[2],
                    self.coverage_tolerance,
                ) else {
                    continue;
                };

                let view_depth = perspective_view_depth(bary, w);
                if !view_depth.is_finite() {
                    continue;
                }

                if !target.depth_test_and_update(px, py, view_depth) {
                    continue;
                }

                let fragment = ScreenVertex {
                    position: Vector4::new(
                        px as f32,
                        py as f32,
                        linear_interpolate(z, bary),
                        view_depth,
                    ),
                    attributes: perspective_interpolate(attributes, bary, w, view_depth)
                        .renormalized(),
                };

                let color = shader.fragment(&fragment, material);
                target.set_pixel(px, py, color);
                shaded += 1;
            }
        }

        TriangleOutcome::Drawn { pixels: shaded }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::{Color, unpack_rgb};
    use crate::core::framebuffer::DepthBuffer;
    use crate::core::geometry::VertexAttributes;
    use crate::error::RasterError;
    use approx::assert_relative_eq;
    use nalgebra::{Vector2, Vector3};
    use std::cell::RefCell;

    /// Outputs the interpolated vertex color and records every fragment.
    #[derive(Default)]
    struct RecordingShader {
        fragments: RefCell<Vec<ScreenVertex>>,
    }

    impl FragmentShader for RecordingShader {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn validate(&self, _material: &BoundMaterial<'_>) -> Result<(), RasterError> {
            Ok(())
        }

        fn fragment(&self, fragment: &ScreenVertex, _material: &BoundMaterial<'_>) -> Color {
            self.fragments.borrow_mut().push(*fragment);
            fragment.attributes.color
        }
    }

    fn vertex(x: f32, y: f32, w: f32, color: Color) -> ScreenVertex {
        ScreenVertex {
            position: Vector4::new(x, y, 0.5, w),
            attributes: VertexAttributes {
                color,
                uv: Vector2::new(0.5, 0.5),
                normal: Vector3::z(),
                tangent: Vector3::x(),
                view_dir: Vector3::z(),
            },
        }
    }

    fn big_triangle(w: f32, color: Color) -> [ScreenVertex; 3] {
        [
            vertex(2.0, 2.0, w, color),
            vertex(30.0, 4.0, w, color),
            vertex(12.0, 28.0, w, color),
        ]
    }

    fn draw(
        rasterizer: &Rasterizer,
        tri: &[ScreenVertex; 3],
        shader: &RecordingShader,
        color: &mut [u32],
        depth: &mut DepthBuffer,
    ) -> TriangleOutcome {
        let mut fb = FrameBuffer::new(color, depth).unwrap();
        rasterizer.render_triangle(
            [&tri[0], &tri[1], &tri[2]],
            shader,
            &BoundMaterial::default(),
            &mut fb,
        )
    }

    #[test]
    fn nearer_triangle_wins_in_either_order() {
        let near = big_triangle(2.0, Color::new(1.0, 0.0, 0.0));
        let far = big_triangle(5.0, Color::new(0.0, 0.0, 1.0));
        let rasterizer = Rasterizer::new();

        for order in [[&near, &far], [&far, &near]] {
            let mut depth = DepthBuffer::new(32, 32);
            let mut color = vec![0u32; 32 * 32];
            let shader = RecordingShader::default();
            for tri in order {
                draw(&rasterizer, tri, &shader, &mut color, &mut depth);
            }
            assert_relative_eq!(depth.get(12, 10).unwrap(), 2.0, epsilon = 1e-5);
            let [r, g, b] = unpack_rgb(color[10 * 32 + 12]);
            assert!(r >= 254);
            assert_eq!((g, b), (0, 0));
        }
    }

    #[test]
    fn constant_uv_is_exact_under_varying_w() {
        let tri = [
            vertex(2.0, 2.0, 1.0, Color::zeros()),
            vertex(30.0, 4.0, 10.0, Color::zeros()),
            vertex(12.0, 28.0, 40.0, Color::zeros()),
        ];
        let shader = RecordingShader::default();
        let mut depth = DepthBuffer::new(32, 32);
        let mut color = vec![0u32; 32 * 32];
        let outcome = draw(&Rasterizer::new(), &tri, &shader, &mut color, &mut depth);

        let fragments = shader.fragments.borrow();
        assert!(matches!(outcome, TriangleOutcome::Drawn { pixels } if pixels == fragments.len()));
        assert!(!fragments.is_empty());
        for f in fragments.iter() {
            assert_relative_eq!(f.attributes.uv, Vector2::new(0.5, 0.5), epsilon = 1e-5);
            assert_relative_eq!(f.attributes.normal.norm(), 1.0, epsilon = 1e-5);
            assert!(f.view_depth() >= 1.0 - 1e-4 && f.view_depth() <= 40.0 + 1e-3);
        }
    }

    #[test]
    fn projected_depth_is_affine_in_screen_space() {
        let depth_at = |x: f32| 0.9 + 0.001 * x;
        let mut tri = [
            vertex(2.0, 2.0, 1.0, Color::zeros()),
            vertex(30.0, 4.0, 10.0, Color::zeros()),
            vertex(12.0, 28.0, 40.0, Color::zeros()),
        ];
        for v in &mut tri {
            v.position.z = depth_at(v.position.x);
        }
        let shader = RecordingShader::default();
        let mut depth = DepthBuffer::new(32, 32);
        let mut color = vec![0u32; 32 * 32];
        draw(&Rasterizer::new(), &tri, &shader, &mut color, &mut depth);

        let fragments = shader.fragments.borrow();
        assert!(!fragments.is_empty());
        for f in fragments.iter() {
            let expected = depth_at(f.position.x + 0.5);
            assert_relative_eq!(f.projected_depth(), expected, epsilon = 1e-3);
        }
    }

    #[test]
    fn overflowing_colors_keep_their_hue() {
        let tri = big_triangle(1.0, Color::new(2.0, 1.0, 0.5));
        let shader = RecordingShader::default();
        let mut depth = DepthBuffer::new(32, 32);
        let mut color = vec![0u32; 32 * 32];
        draw(&Rasterizer::new(), &tri, &shader, &mut color, &mut depth);
        assert_eq!(unpack_rgb(color[10 * 32 + 12]), [255, 127, 63]);
    }

    #[test]
    fn out_of_range_vertex_drops_whole_triangle() {
        let mut tri = big_triangle(1.0, Color::new(1.0, 1.0, 1.0));
        tri[1].position.x = 33.0;
        let shader = RecordingShader::default();
        let mut depth = DepthBuffer::new(32, 32);
        let mut color = vec![0u32; 32 * 32];
        let outcome = draw(&Rasterizer::new(), &tri, &shader, &mut color, &mut depth);
        assert_eq!(outcome, TriangleOutcome::OutOfRange);
        assert!(color.iter().all(|p| *p == 0));

        let mut tri = big_triangle(1.0, Color::new(1.0, 1.0, 1.0));
        tri[2].position.z = 1.5;
        let outcome = draw(&Rasterizer::new(), &tri, &shader, &mut color, &mut depth);
        assert_eq!(outcome, TriangleOutcome::OutOfRange);
    }

    #[test]
    fn zero_area_triangle_is_skipped() {
        let c = Color::new(1.0, 1.0, 1.0);
        let tri = [
            vertex(1.0, 1.0, 1.0, c),
            vertex(10.0, 10.0, 1.0, c),
            vertex(20.0, 20.0, 1.0, c),
        ];
        let shader = RecordingShader::default();
        let mut depth = DepthBuffer::new(32, 32);
        let mut color = vec![0u32; 32 * 32];
        let outcome = draw(&Rasterizer::new(), &tri, &shader, &mut color, &mut depth);
        assert_eq!(outcome, TriangleOutcome::Degenerate);
        assert!(shader.fragments.borrow().is_empty());
    }

    #[test]
    fn sliver_below_coverage_cutoff_counts_as_degenerate() {
        let c = Color::new(1.0, 1.0, 1.0);
        // Doubled area 5e-7: above f32::EPSILON, below the coverage cutoff.
        let tri = [
            vertex(0.0, 0.0, 1.0, c),
            vertex(2.0, 0.0, 1.0, c),
            vertex(1.0, 2.5e-7, 1.0, c),
        ];
        let shader = RecordingShader::default();
        let mut depth = DepthBuffer::new(32, 32);
        let mut color = vec![0u32; 32 * 32];
        let outcome = draw(&Rasterizer::new(), &tri, &shader, &mut color, &mut depth);
        assert_eq!(outcome, TriangleOutcome::Degenerate);
    }

    #[test]
    fn bounding_box_stays_inside_viewport() {
        let points = [
            Vector2::new(-50.0, 3.5),
            Vector2::new(700.0, -20.0),
            Vector2::new(10.2, 900.0),
        ];
        let bounds = Rasterizer::compute_bounding_box(&points, 640, 480).unwrap();
        assert_eq!(
            bounds,
            BoundingBox {
                min_x: 0,
                min_y: 0,
                max_x: 639,
                max_y: 479
            }
        );
    }

    #[test]
    fn bounding_box_grows_by_one_pixel() {
        let points = [
            Vector2::new(10.5, 20.5),
            Vector2::new(15.2, 20.9),
            Vector2::new(12.0, 25.7),
        ];
        let bounds = Rasterizer::compute_bounding_box(&points, 64, 64).unwrap();
        assert_eq!(
            bounds,
            BoundingBox {
                min_x: 9,
                min_y: 19,
                max_x: 16,
                max_y: 26
            }
        );
    }

    #[test]
    fn edge_touching_triangle_never_writes_out_of_bounds() {
        let c = Color::new(0.0, 1.0, 0.0);
        let tri = [
            vertex(0.0, 0.0, 1.0, c),
            vertex(8.0, 0.0, 1.0, c),
            vertex(8.0, 8.0, 1.0, c),
        ];
        let shader = RecordingShader::default();
        let mut depth = DepthBuffer::new(8, 8);
        let mut color = vec![0u32; 64];
        let outcome = draw(&Rasterizer::new(), &tri, &shader, &mut color, &mut depth);
        assert!(matches!(outcome, TriangleOutcome::Drawn { pixels } if pixels > 0));
        for f in shader.fragments.borrow().iter() {
            assert!(f.position.x < 8.0 && f.position.y < 8.0);
        }
    }
}
