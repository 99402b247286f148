use crate::error::LoadError;
use crate::pipeline::mode::{RenderMode, ShadingMode};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default = "default_objects")]
    pub objects: Vec<ObjectConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            objects: default_objects(),
        }
    }
}

fn default_objects() -> Vec<ObjectConfig> {
    vec![ObjectConfig {
        primitive: Some(Primitive::StripGrid),
        ..ObjectConfig::default()
    }]
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_frames")]
    pub frames: usize,

    // --- Shading ---
    #[serde(default)]
    pub mode: RenderMode,
    #[serde(default)]
    pub shading: ShadingMode,
    #[serde(default = "default_true")]
    pub use_normal_map: bool,
    #[serde(default = "default_background")]
    pub background: [f32; 3],
    #[serde(default = "default_depth_remap")]
    pub depth_remap: [f32; 2],
    #[serde(default = "default_coverage_tolerance")]
    pub coverage_tolerance: f32,

    // --- Animation ---
    #[serde(default = "default_false")]
    pub rotate: bool,
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32, // rad/s
    #[serde(default = "default_frame_time")]
    pub frame_time: f32, // seconds per frame
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            frames: default_frames(),
            mode: RenderMode::default(),
            shading: ShadingMode::default(),
            use_normal_map: true,
            background: default_background(),
            depth_remap: default_depth_remap(),
            coverage_tolerance: default_coverage_tolerance(),
            rotate: false,
            rotation_speed: default_rotation_speed(),
            frame_time: default_frame_time(),
        }
    }
}

fn default_width() -> usize {
    800
}
fn default_height() -> usize {
    600
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_frames() -> usize {
    1
}
fn default_background() -> [f32; 3] {
    let gray = 100.0 / 255.0;
    [gray, gray, gray]
}
fn default_depth_remap() -> [f32; 2] {
    [0.995, 1.0]
}
fn default_coverage_tolerance() -> f32 {
    1.0
}
fn default_rotation_speed() -> f32 {
    std::f32::consts::FRAC_PI_4
}
fn default_frame_time() -> f32 {
    1.0 / 60.0
}
fn default_false() -> bool {
    false
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov: f32, // degrees, vertical
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            target: [0.0, 0.0, 0.0],
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, 10.0]
}
fn default_fov() -> f32 {
    60.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            intensity: default_intensity(),
            shininess: default_shininess(),
            ambient: default_ambient(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [0.577, -0.577, 0.577]
}
fn default_intensity() -> f32 {
    7.0
}
fn default_shininess() -> f32 {
    25.0
}
fn default_ambient() -> [f32; 3] {
    [0.03, 0.03, 0.03]
}

/// Built-in geometry usable in place of an OBJ file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Triangle,
    StripGrid,
}

#[derive(Debug, Deserialize)]
pub struct ObjectConfig {
    /// OBJ file; takes precedence over `primitive`.
    pub path: Option<String>,
    pub primitive: Option<Primitive>,

    // --- Transform ---
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3], // degrees
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    #[serde(default = "default_false")]
    pub normalize: bool,

    // --- Material Textures ---
    pub diffuse_texture: Option<String>,
    pub normal_texture: Option<String>,
    pub specular_texture: Option<String>,
    pub gloss_texture: Option<String>,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            path: None,
            primitive: None,
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: default_scale(),
            normalize: false,
            diffuse_texture: None,
            normal_texture: None,
            specular_texture: None,
            gloss_texture: None,
        }
    }
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(content)?)
    }
}
