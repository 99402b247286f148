use crate::core::color::{Color, colors};
use crate::error::LoadError;
use image::DynamicImage;
use log::info;
use nalgebra::Vector2;
use std::path::Path;

/// Anything that can return a color for a UV coordinate.
pub trait TextureSampler {
    fn sample(&self, uv: Vector2<f32>) -> Color;
}

/// Represents a 2D texture map, stored as linear RGB texels.
#[derive(Debug, Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<Color>,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref)?;
        let texture = Self::from_image(&img);

        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref, texture.width, texture.height
        );

        Ok(texture)
    }

    pub fn from_image(img: &DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let texels = rgb
            .pixels()
            .map(|p| {
                Color::new(
                    p[0] as f32 / 255.0,
                    p[1] as f32 / 255.0,
                    p[2] as f32 / 255.0,
                )
            })
            .collect();

        Self {
            width: rgb.width(),
            height: rgb.height(),
            texels,
        }
    }

    /// Builds a texture by evaluating `f(x, y)` for every texel, row by row.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> Color) -> Self {
        let texels = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self {
            width,
            height,
            texels,
        }
    }

    /// A 1x1 texture of a single color.
    pub fn solid(color: Color) -> Self {
        Self::from_fn(1, 1, |_, _| color)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl TextureSampler for Texture {
    /// Nearest-texel lookup with the origin at the top-left.
    ///
    /// `uv.x <= 0` samples black. Coordinates past the edges are clamped to
    /// the border texel.
    fn sample(&self, uv: Vector2<f32>) -> Color {
        if uv.x <= 0.0 || self.texels.is_empty() {
            return colors::BLACK;
        }

        let max_x = self.width as i64 - 1;
        let max_y = self.height as i64 - 1;
        let x = ((self.width as f32 * uv.x) as i64).clamp(0, max_x) as usize;
        let y = ((self.height as f32 * uv.y) as i64).clamp(0, max_y) as usize;

        self.texels[y * self.width as usize + x]
    }
}

/// Stable handle of a texture inside a [`TextureArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(usize);

impl TextureHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owns every texture of a scene. Materials refer to textures by handle, so
/// textures live exactly as long as the scene.
#[derive(Debug, Clone, Default)]
pub struct TextureArena {
    textures: Vec<Texture>,
}

impl TextureArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, texture: Texture) -> TextureHandle {
        self.textures.push(texture);
        TextureHandle(self.textures.len() - 1)
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<TextureHandle, LoadError> {
        Ok(self.insert(Texture::load(path)?))
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
