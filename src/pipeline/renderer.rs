use crate::core::assembler::TriangleAssembler;
use crate::core::color::Color;
use crate::core::framebuffer::{DepthBuffer, FrameBuffer};
use crate::core::pipeline::FragmentShader;
use crate::core::rasterizer::{Rasterizer, TriangleOutcome};
use crate::error::RasterError;
use crate::io::config::RenderConfig;
use crate::pipeline::mode::{RenderMode, ShadingMode};
use crate::pipeline::shaders::depth::DepthShader;
use crate::pipeline::shaders::phong::PhongShader;
use crate::pipeline::shaders::unlit::{DiffuseTextureShader, VertexColorShader};
use crate::pipeline::vertex_stage::VertexStage;
use crate::scene::context::SceneContext;
use crate::scene::material::BoundMaterial;
use log::debug;
use std::fmt;
use std::ops::AddAssign;

/// Per-frame shading configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub mode: RenderMode,
    pub shading: ShadingMode,
    pub use_normal_map: bool,
    pub background: Color,
    /// Projected depth window shown by the depth view.
    pub depth_remap: (f32, f32),
}

impl Default for RenderSettings {
    fn default() -> Self {
        let gray = 100.0 / 255.0;
        Self {
            mode: RenderMode::default(),
            shading: ShadingMode::default(),
            use_normal_map: true,
            background: Color::new(gray, gray, gray),
            depth_remap: (0.995, 1.0),
        }
    }
}

impl RenderSettings {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            mode: config.mode,
            shading: config.shading,
            use_normal_map: config.use_normal_map,
            background: Color::from(config.background),
            depth_remap: (config.depth_remap[0], config.depth_remap[1]),
        }
    }
}

/// Counters of one render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles: usize,
    pub out_of_range: usize,
    pub degenerate: usize,
    pub drawn: usize,
    pub pixels_shaded: usize,
}

impl FrameStats {
    fn record(&mut self, outcome: TriangleOutcome) {
        self.triangles += 1;
        match outcome {
            TriangleOutcome::OutOfRange => self.out_of_range += 1,
            TriangleOutcome::Degenerate => self.degenerate += 1,
            TriangleOutcome::Drawn { pixels } => {
                self.drawn += 1;
                self.pixels_shaded += pixels;
            }
        }
    }
}

impl AddAssign for FrameStats {
    fn add_assign(&mut self, other: Self) {
        self.triangles += other.triangles;
        self.out_of_range += other.out_of_range;
        self.degenerate += other.degenerate;
        self.drawn += other.drawn;
        self.pixels_shaded += other.pixels_shaded;
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} triangles ({} drawn, {} out of range, {} degenerate), {} pixels shaded",
            self.triangles, self.drawn, self.out_of_range, self.degenerate, self.pixels_shaded
        )
    }
}

/// The high-level renderer that orchestrates the pipeline stages.
///
/// Owns the depth buffer, which is reset at the start of every render call
/// and never carries data from one frame to the next. The color buffer
/// belongs to the caller.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub settings: RenderSettings,
    depth_buffer: DepthBuffer,
    width: usize,
    height: usize,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            settings: RenderSettings::default(),
            depth_buffer: DepthBuffer::new(width, height),
            width,
            height,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            rasterizer: Rasterizer::with_tolerance(config.coverage_tolerance),
            settings: RenderSettings::from_config(config),
            ..Self::new(config.width, config.height)
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Changes the viewport. Callers must pass color buffers of the new size.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.depth_buffer.reset(width, height);
    }

    /// View depth written by the most recent render call.
    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth_buffer
    }

    /// Renders the scene with the shader selected by `settings.mode`.
    pub fn render(
        &mut self,
        scene: &mut SceneContext,
        color_buffer: &mut [u32],
    ) -> Result<FrameStats, RasterError> {
        match self.settings.mode {
            RenderMode::Lit => {
                let shader = PhongShader::new(
                    scene.light.clone(),
                    self.settings.shading,
                    self.settings.use_normal_map,
                );
                self.render_with(&shader, scene, color_buffer)
            }
            RenderMode::VertexColor => self.render_with(&VertexColorShader, scene, color_buffer),
            RenderMode::Texture => self.render_with(&DiffuseTextureShader, scene, color_buffer),
            RenderMode::Depth => {
                let (near, far) = self.settings.depth_remap;
                self.render_with(&DepthShader::new(near, far), scene, color_buffer)
            }
        }
    }

    /// Renders the scene with an explicit shader.
    ///
    /// Every material used by a mesh is bound and validated before anything
    /// is drawn, so a misconfigured material leaves the color buffer
    /// untouched.
    pub fn render_with<S: FragmentShader>(
        &mut self,
        shader: &S,
        scene: &mut SceneContext,
        color_buffer: &mut [u32],
    ) -> Result<FrameStats, RasterError> {
        let expected = self.width * self.height;
        if color_buffer.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                expected,
                actual: color_buffer.len(),
            });
        }

        let SceneContext {
            camera,
            meshes,
            materials,
            textures,
            ..
        } = scene;

        // 1. Resolve materials
        let bound = materials
            .iter()
            .enumerate()
            .map(|(id, material)| material.bind(id, textures))
            .collect::<Result<Vec<BoundMaterial<'_>>, _>>()?;

        for mesh in meshes.iter() {
            let material = bound
                .get(mesh.material_id)
                .ok_or(RasterError::UnknownMaterial {
                    index: mesh.material_id,
                    count: bound.len(),
                })?;
            shader.validate(material)?;
        }

        // 2. Fresh depth buffer, cleared color buffer
        self.depth_buffer.reset(self.width, self.height);
        let mut target = FrameBuffer::new(color_buffer, &mut self.depth_buffer)?;
        target.clear_color(self.settings.background);

        // 3. Transform, assemble, rasterize
        let stage = VertexStage::new(camera, self.width, self.height);
        let mut stats = FrameStats::default();

        for mesh in meshes.iter_mut() {
            stage.process(mesh);
            let material = &bound[mesh.material_id];
            let screen = mesh.screen_vertices();

            for [i0, i1, i2] in TriangleAssembler::new(mesh.indices(), screen, mesh.topology) {
                let (Some(v0), Some(v1), Some(v2)) =
                    (screen.get(i0), screen.get(i1), screen.get(i2))
                else {
                    continue;
                };
                let outcome = self
                    .rasterizer
                    .render_triangle([v0, v1, v2], shader, material, &mut target);
                stats.record(outcome);
            }
        }

        debug!("Rendered with {} shader: {}", shader.name(), stats);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::unpack_rgb;
    use crate::core::math::transform::TransformFactory;
    use crate::scene::camera::Camera;
    use crate::scene::material::{Material, TextureSlot};
    use crate::scene::mesh::Mesh;
    use crate::scene::texture::Texture;
    use nalgebra::{Point3, Vector3};

    const WIDTH: usize = 64;
    const HEIGHT: usize = 48;

    fn scene_with(mesh: Mesh) -> SceneContext {
        let camera = Camera::new_perspective(
            Point3::new(0.0, 0.0, 2.0),
            Point3::origin(),
            60f32.to_radians(),
            WIDTH as f32 / HEIGHT as f32,
            0.1,
            100.0,
        );
        let mut scene = SceneContext::new(camera);
        let material = scene.add_material(Material::new());
        scene.add_mesh(mesh.with_material(material));
        scene
    }

    fn renderer(mode: RenderMode) -> Renderer {
        let mut renderer = Renderer::new(WIDTH, HEIGHT);
        renderer.settings.mode = mode;
        renderer
    }

    #[test]
    fn vertex_colors_reach_the_buffer() {
        let mut scene = scene_with(Mesh::create_test_triangle());
        let mut color = vec![0u32; WIDTH * HEIGHT];
        let stats = renderer(RenderMode::VertexColor)
            .render(&mut scene, &mut color)
            .unwrap();

        assert_eq!(stats.triangles, 1);
        assert_eq!(stats.drawn, 1);
        assert!(stats.pixels_shaded > 0);

        let background = unpack_rgb(color[0]);
        assert_eq!(background, [100, 100, 100]);
        let center = unpack_rgb(color[(HEIGHT / 2) * WIDTH + WIDTH / 2]);
        assert_ne!(center, background);
    }

    #[test]
    fn depth_buffer_is_reset_every_frame() {
        let mut scene = scene_with(Mesh::create_test_triangle());
        let mut renderer = renderer(RenderMode::Depth);
        let mut color = vec![0u32; WIDTH * HEIGHT];

        renderer.render(&mut scene, &mut color).unwrap();
        let first = renderer.depth_buffer().as_slice().to_vec();
        assert!(first.iter().any(|d| d.is_finite()));

        scene.meshes.clear();
        renderer.render(&mut scene, &mut color).unwrap();
        assert!(renderer.depth_buffer().as_slice().iter().all(|d| *d == f32::INFINITY));
    }

    #[test]
    fn lit_mode_without_textures_fails_before_drawing() {
        let mut scene = scene_with(Mesh::create_test_triangle());
        let mut color = vec![0xDEAD_BEEFu32; WIDTH * HEIGHT];
        let err = renderer(RenderMode::Lit)
            .render(&mut scene, &mut color)
            .unwrap_err();

        assert!(matches!(err, RasterError::MissingTexture { material: 0, .. }));
        assert!(color.iter().all(|&p| p == 0xDEAD_BEEF));
    }

    #[test]
    fn texture_mode_samples_bound_diffuse() {
        let mut scene = scene_with(Mesh::create_test_triangle());
        let handle = scene.textures.insert(Texture::solid(Color::new(0.0, 1.0, 0.0)));
        scene.materials[0] = Material::new().with_texture(TextureSlot::Diffuse, handle);

        let mut color = vec![0u32; WIDTH * HEIGHT];
        renderer(RenderMode::Texture).render(&mut scene, &mut color).unwrap();
        let center = unpack_rgb(color[(HEIGHT / 2) * WIDTH + WIDTH / 2]);
        assert_eq!(center, [0, 255, 0]);
    }

    #[test]
    fn unknown_material_is_reported() {
        let mut scene = scene_with(Mesh::create_test_triangle());
        scene.meshes[0].material_id = 3;
        let mut color = vec![0u32; WIDTH * HEIGHT];
        let err = renderer(RenderMode::VertexColor)
            .render(&mut scene, &mut color)
            .unwrap_err();
        assert!(matches!(err, RasterError::UnknownMaterial { index: 3, count: 1 }));
    }

    #[test]
    fn wrong_buffer_size_is_refused() {
        let mut scene = scene_with(Mesh::create_test_triangle());
        let mut color = vec![0u32; 10];
        let err = renderer(RenderMode::VertexColor)
            .render(&mut scene, &mut color)
            .unwrap_err();
        assert!(matches!(err, RasterError::BufferSizeMismatch { .. }));
    }

    #[test]
    fn geometry_behind_the_camera_is_dropped() {
        let behind = TransformFactory::translation(&Vector3::new(0.0, 0.0, 5.0));
        let mut scene = scene_with(Mesh::create_test_triangle().with_world_matrix(behind));
        let mut color = vec![0u32; WIDTH * HEIGHT];
        let stats = renderer(RenderMode::VertexColor)
            .render(&mut scene, &mut color)
            .unwrap();
        assert_eq!(stats.out_of_range, 1);
        assert_eq!(stats.pixels_shaded, 0);
    }
}
