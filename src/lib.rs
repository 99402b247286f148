//! A single-threaded CPU triangle rasterizer.
//!
//! Meshes are transformed to screen space, assembled into triangles (lists or
//! strips), scanned with a barycentric coverage test and depth tested with
//! perspective-correct view depth. Covered pixels are handed to a pluggable
//! fragment shader: projected depth, vertex color, a diffuse texture, or a
//! directional light with diffuse/specular/gloss/normal maps.
//!
//! # Quick Start
//!
//! ```ignore
//! use softraster::prelude::*;
//!
//! let config = Config::default();
//! let mut scene = init_scene_resources(&config)?;
//! let mut renderer = Renderer::from_config(&config.render);
//! let mut pixels = vec![0u32; config.render.width * config.render.height];
//! let stats = renderer.render(&mut scene, &mut pixels)?;
//! ```

pub mod app;
pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod scene;

pub use error::{LoadError, RasterError};

/// Prelude module for convenient imports.
pub mod prelude {
    // Core
    pub use crate::core::assembler::Topology;
    pub use crate::core::color::{Color, colors};
    pub use crate::core::geometry::Vertex;
    pub use crate::core::pipeline::FragmentShader;

    // Config
    pub use crate::io::config::Config;

    // Pipeline
    pub use crate::pipeline::mode::{RenderMode, ShadingMode};
    pub use crate::pipeline::renderer::{FrameStats, RenderSettings, Renderer};

    // Scene
    pub use crate::scene::camera::Camera;
    pub use crate::scene::context::SceneContext;
    pub use crate::scene::light::DirectionalLight;
    pub use crate::scene::loader::init_scene_resources;
    pub use crate::scene::material::{Material, TextureSlot};
    pub use crate::scene::mesh::Mesh;
    pub use crate::scene::texture::{Texture, TextureArena, TextureHandle};

    // Errors
    pub use crate::error::{LoadError, RasterError};
}
