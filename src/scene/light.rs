use crate::core::color::Color;
use nalgebra::Vector3;

/// A light infinitely far away; all rays are parallel.
///
/// Also carries the constants of the lit shading model.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    /// Normalized direction the light travels (from the light towards the scene).
    pub direction: Vector3<f32>,
    pub intensity: f32,
    /// Scale applied to the gloss map sample to get the Phong exponent.
    pub shininess: f32,
    pub ambient: Color,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vector3::new(0.577, -0.577, 0.577))
    }
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f32>) -> Self {
        Self {
            direction: direction.normalize(),
            intensity: 7.0,
            shininess: 25.0,
            ambient: Color::new(0.03, 0.03, 0.03),
        }
    }

    /// Cosine between the surface normal and the direction towards the light.
    /// Zero or negative means the surface faces away.
    #[inline]
    pub fn observed_area(&self, normal: &Vector3<f32>) -> f32 {
        normal.dot(&-self.direction)
    }
}
