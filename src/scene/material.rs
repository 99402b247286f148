use crate::core::color::{Color, colors};
use crate::error::RasterError;
use crate::scene::texture::{Texture, TextureArena, TextureHandle, TextureSampler};
use nalgebra::Vector2;
use std::fmt;

/// The texture maps a material can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    Diffuse,
    Normal,
    Specular,
    Gloss,
}

impl fmt::Display for TextureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureSlot::Diffuse => write!(f, "diffuse"),
            TextureSlot::Normal => write!(f, "normal"),
            TextureSlot::Specular => write!(f, "specular"),
            TextureSlot::Gloss => write!(f, "gloss"),
        }
    }
}

/// Surface description: up to four texture handles. A material without any
/// texture is only usable by shaders that do not sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    pub diffuse: Option<TextureHandle>,
    pub normal: Option<TextureHandle>,
    pub specular: Option<TextureHandle>,
    pub gloss: Option<TextureHandle>,
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_texture(mut self, slot: TextureSlot, handle: TextureHandle) -> Self {
        *self.slot_mut(slot) = Some(handle);
        self
    }

    pub fn texture(&self, slot: TextureSlot) -> Option<TextureHandle> {
        match slot {
            TextureSlot::Diffuse => self.diffuse,
            TextureSlot::Normal => self.normal,
            TextureSlot::Specular => self.specular,
            TextureSlot::Gloss => self.gloss,
        }
    }

    fn slot_mut(&mut self, slot: TextureSlot) -> &mut Option<TextureHandle> {
        match slot {
            TextureSlot::Diffuse => &mut self.diffuse,
            TextureSlot::Normal => &mut self.normal,
            TextureSlot::Specular => &mut self.specular,
            TextureSlot::Gloss => &mut self.gloss,
        }
    }

    /// Resolves every handle against the arena. A handle that does not name a
    /// texture is an error.
    pub fn bind<'a>(
        &self,
        id: usize,
        arena: &'a TextureArena,
    ) -> Result<BoundMaterial<'a>, RasterError> {
        let resolve = |handle: Option<TextureHandle>| -> Result<Option<&'a Texture>, RasterError> {
            match handle {
                Some(h) => arena
                    .get(h)
                    .map(Some)
                    .ok_or(RasterError::InvalidTextureHandle(h.index())),
                None => Ok(None),
            }
        };

        Ok(BoundMaterial {
            id,
            diffuse: resolve(self.diffuse)?,
            normal: resolve(self.normal)?,
            specular: resolve(self.specular)?,
            gloss: resolve(self.gloss)?,
        })
    }
}

/// A material with its handles resolved to textures for one render call.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundMaterial<'a> {
    pub id: usize,
    pub diffuse: Option<&'a Texture>,
    pub normal: Option<&'a Texture>,
    pub specular: Option<&'a Texture>,
    pub gloss: Option<&'a Texture>,
}

impl<'a> BoundMaterial<'a> {
    pub fn texture(&self, slot: TextureSlot) -> Option<&'a Texture> {
        match slot {
            TextureSlot::Diffuse => self.diffuse,
            TextureSlot::Normal => self.normal,
            TextureSlot::Specular => self.specular,
            TextureSlot::Gloss => self.gloss,
        }
    }

    /// Fails with [`RasterError::MissingTexture`] if `slot` is unbound.
    pub fn require(&self, slot: TextureSlot, mode: &'static str) -> Result<(), RasterError> {
        match self.texture(slot) {
            Some(_) => Ok(()),
            None => Err(RasterError::MissingTexture {
                material: self.id,
                slot,
                mode,
            }),
        }
    }

    /// Samples a slot. Unbound slots read as black; shaders validate their
    /// slots up front so this never substitutes data for a required map.
    #[inline]
    pub fn sample(&self, slot: TextureSlot, uv: Vector2<f32>) -> Color {
        self.texture(slot)
            .map_or(colors::BLACK, |texture| texture.sample(uv))
    }
}
