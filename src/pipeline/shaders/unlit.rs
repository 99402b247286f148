use crate::core::color::Color;
use crate::core::geometry::ScreenVertex;
use crate::core::pipeline::FragmentShader;
use crate::error::RasterError;
use crate::scene::material::{BoundMaterial, TextureSlot};

/// Outputs the interpolated vertex color, no lighting.
/// Useful for debugging geometry and the rasterization pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexColorShader;

impl FragmentShader for VertexColorShader {
    fn name(&self) -> &'static str {
        "vertex color"
    }

    fn validate(&self, _material: &BoundMaterial<'_>) -> Result<(), RasterError> {
        Ok(())
    }

    fn fragment(&self, fragment: &ScreenVertex, _material: &BoundMaterial<'_>) -> Color {
        fragment.attributes.color
    }
}

/// Outputs the diffuse map sample, no lighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffuseTextureShader;

impl FragmentShader for DiffuseTextureShader {
    fn name(&self) -> &'static str {
        "texture"
    }

    fn validate(&self, material: &BoundMaterial<'_>) -> Result<(), RasterError> {
        material.require(TextureSlot::Diffuse, self.name())
    }

    fn fragment(&self, fragment: &ScreenVertex, material: &BoundMaterial<'_>) -> Color {
        material.sample(TextureSlot::Diffuse, fragment.attributes.uv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::VertexAttributes;
    use crate::scene::texture::Texture;
    use nalgebra::{Vector2, Vector3, Vector4};

    fn fragment(color: Color, uv: Vector2<f32>) -> ScreenVertex {
        ScreenVertex {
            position: Vector4::new(0.0, 0.0, 0.5, 1.0),
            attributes: VertexAttributes {
                color,
                uv,
                normal: Vector3::z(),
                tangent: Vector3::x(),
                view_dir: Vector3::z(),
            },
        }
    }

    #[test]
    fn vertex_color_passes_through_unclamped() {
        let color = Color::new(2.0, 0.5, 0.0);
        let frag = fragment(color, Vector2::zeros());
        let out = VertexColorShader.fragment(&frag, &BoundMaterial::default());
        assert_eq!(out, color);
    }

    #[test]
    fn texture_shader_requires_diffuse_map() {
        let err = DiffuseTextureShader.validate(&BoundMaterial::default()).unwrap_err();
        assert!(matches!(
            err,
            RasterError::MissingTexture {
                slot: TextureSlot::Diffuse,
                mode: "texture",
                ..
            }
        ));
    }

    #[test]
    fn texture_shader_samples_diffuse() {
        let texture = Texture::solid(Color::new(0.2, 0.4, 0.6));
        let material = BoundMaterial {
            diffuse: Some(&texture),
            ..Default::default()
        };
        DiffuseTextureShader.validate(&material).unwrap();
        let frag = fragment(Color::zeros(), Vector2::new(0.5, 0.5));
        let out = DiffuseTextureShader.fragment(&frag, &material);
        assert_eq!(out, Color::new(0.2, 0.4, 0.6));
    }
}
