use crate::scene::material::TextureSlot;
use thiserror::Error;

/// Errors raised at the rasterizer boundary.
///
/// Per-pixel and per-triangle anomalies (zero-area triangles, vertices outside
/// the valid range) are not errors: they are skipped where they occur. Only
/// misconfiguration of resources and buffers ends up here.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("material {material} has no {slot} texture bound, required by {mode} shading")]
    MissingTexture {
        material: usize,
        slot: TextureSlot,
        mode: &'static str,
    },
    #[error("material index {index} is out of range ({count} materials)")]
    UnknownMaterial { index: usize, count: usize },
    #[error("texture handle {0} does not refer to a loaded texture")]
    InvalidTextureHandle(usize),
    #[error("color buffer holds {actual} pixels, viewport needs {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },
    #[error("index {index} is out of range for a mesh with {count} vertices")]
    IndexOutOfRange { index: u32, count: usize },
}

/// Errors raised while reading scene resources from disk or writing images.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to load OBJ: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("failed to parse TOML: {0}")]
    Config(#[from] toml::de::Error),
    #[error("object {0} names neither a mesh path nor a primitive")]
    MissingGeometry(usize),
    #[error(transparent)]
    Scene(#[from] RasterError),
}
