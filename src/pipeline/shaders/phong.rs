use crate::core::color::{Color, colors};
use crate::core::geometry::ScreenVertex;
use crate::core::pipeline::FragmentShader;
use crate::error::RasterError;
use crate::pipeline::mode::ShadingMode;
use crate::scene::light::DirectionalLight;
use crate::scene::material::{BoundMaterial, TextureSlot};
use nalgebra::Vector3;
use std::f32::consts::PI;

/// Lambertian diffuse BRDF: `cd * kd / π`.
#[inline]
pub fn lambert(kd: f32, cd: Color) -> Color {
    cd * kd / PI
}

/// Phong specular lobe. `exponent` is applied per channel, so a colored gloss
/// map gives each channel its own highlight width.
///
/// `light_dir` is the direction light travels, `view_dir` points from the
/// surface towards the viewer.
#[inline]
pub fn phong(
    ks: Color,
    exponent: Color,
    light_dir: &Vector3<f32>,
    view_dir: &Vector3<f32>,
    normal: &Vector3<f32>,
) -> Color {
    let reflected = light_dir - normal * (2.0 * normal.dot(light_dir));
    let cos_alpha = reflected.dot(view_dir).max(0.0);
    ks.zip_map(&exponent, |k, e| k * cos_alpha.powf(e))
}

/// Directional light with diffuse, specular, gloss and (optionally) normal
/// maps.
///
/// The shading mode and normal map toggle are plain values set by the caller
/// for each frame.
#[derive(Debug, Clone)]
pub struct PhongShader {
    pub light: DirectionalLight,
    pub mode: ShadingMode,
    pub use_normal_map: bool,
}

impl PhongShader {
    pub fn new(light: DirectionalLight, mode: ShadingMode, use_normal_map: bool) -> Self {
        Self {
            light,
            mode,
            use_normal_map,
        }
    }

    /// Slots the current mode reads.
    fn required_slots(&self) -> Vec<TextureSlot> {
        let mut slots = match self.mode {
            ShadingMode::Combined => vec![
                TextureSlot::Diffuse,
                TextureSlot::Specular,
                TextureSlot::Gloss,
            ],
            ShadingMode::ObservedArea => Vec::new(),
            ShadingMode::Diffuse => vec![TextureSlot::Diffuse],
            ShadingMode::Specular => vec![TextureSlot::Specular, TextureSlot::Gloss],
        };
        if self.use_normal_map {
            slots.push(TextureSlot::Normal);
        }
        slots
    }

    /// Shading normal: the interpolated normal, or the normal map sample
    /// moved from tangent space into world space.
    fn surface_normal(
        &self,
        fragment: &ScreenVertex,
        material: &BoundMaterial<'_>,
    ) -> Vector3<f32> {
        let attributes = &fragment.attributes;
        if !self.use_normal_map {
            return attributes.normal;
        }

        let tangent = attributes.tangent;
        let binormal = attributes.normal.cross(&tangent);
        let sample =
            material.sample(TextureSlot::Normal, attributes.uv) * 2.0 - Vector3::repeat(1.0);

        let mapped = tangent * sample.x + binormal * sample.y + attributes.normal * sample.z;
        mapped.try_normalize(f32::EPSILON).unwrap_or(attributes.normal)
    }

    fn specular(
        &self,
        fragment: &ScreenVertex,
        material: &BoundMaterial<'_>,
        normal: &Vector3<f32>,
    ) -> Color {
        let uv = fragment.attributes.uv;
        let ks = material.sample(TextureSlot::Specular, uv);
        let exponent = material.sample(TextureSlot::Gloss, uv) * self.light.shininess;
        phong(
            ks,
            exponent,
            &self.light.direction,
            &fragment.attributes.view_dir,
            normal,
        )
    }

    fn diffuse(&self, fragment: &ScreenVertex, material: &BoundMaterial<'_>) -> Color {
        lambert(1.0, material.sample(TextureSlot::Diffuse, fragment.attributes.uv))
    }
}

impl FragmentShader for PhongShader {
    fn name(&self) -> &'static str {
        "lit"
    }

    fn validate(&self, material: &BoundMaterial<'_>) -> Result<(), RasterError> {
        self.required_slots()
            .into_iter()
            .try_for_each(|slot| material.require(slot, self.name()))
    }

    fn fragment(&self, fragment: &ScreenVertex, material: &BoundMaterial<'_>) -> Color {
        let normal = self.surface_normal(fragment, material);

        let observed_area = self.light.observed_area(&normal);
        if observed_area <= 0.0 {
            return colors::BLACK;
        }

        let radiance = colors::WHITE * self.light.intensity;

        match self.mode {
            ShadingMode::Combined => {
                let diffuse = radiance.component_mul(&self.diffuse(fragment, material));
                let specular = self.specular(fragment, material, &normal);
                (diffuse + self.light.ambient + specular) * observed_area
            }
            ShadingMode::ObservedArea => Color::repeat(observed_area),
            ShadingMode::Diffuse => {
                radiance.component_mul(&self.diffuse(fragment, material)) * observed_area
            }
            ShadingMode::Specular => self.specular(fragment, material, &normal),
        }
    }
}
