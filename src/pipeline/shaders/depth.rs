use crate::core::color::Color;
use crate::core::geometry::ScreenVertex;
use crate::core::pipeline::FragmentShader;
use crate::error::RasterError;
use crate::scene::material::BoundMaterial;

/// Visualizes projected depth as grayscale.
///
/// Perspective depth crowds towards 1, so the display range is a narrow
/// window near the far end by default.
#[derive(Debug, Clone, Copy)]
pub struct DepthShader {
    pub near: f32,
    pub far: f32,
}

impl Default for DepthShader {
    fn default() -> Self {
        Self::new(0.995, 1.0)
    }
}

impl DepthShader {
    pub fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }

    /// Maps `depth` from `[near, far]` onto `[0, 1]`, clamped.
    #[inline]
    pub fn remap(&self, depth: f32) -> f32 {
        let span = self.far - self.near;
        if span.abs() <= f32::EPSILON {
            return if depth < self.near { 0.0 } else { 1.0 };
        }
        ((depth - self.near) / span).clamp(0.0, 1.0)
    }
}

impl FragmentShader for DepthShader {
    fn name(&self) -> &'static str {
        "depth"
    }

    fn validate(&self, _material: &BoundMaterial<'_>) -> Result<(), RasterError> {
        Ok(())
    }

    fn fragment(&self, fragment: &ScreenVertex, _material: &BoundMaterial<'_>) -> Color {
        let value = self.remap(fragment.projected_depth());
        Color::new(value, value, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn remap_is_clamped_to_unit_range() {
        let shader = DepthShader::default();
        assert_relative_eq!(shader.remap(0.5), 0.0);
        assert_relative_eq!(shader.remap(0.995), 0.0);
        assert_relative_eq!(shader.remap(0.9975), 0.5, epsilon = 1e-3);
        assert_relative_eq!(shader.remap(1.0), 1.0);
        assert_relative_eq!(shader.remap(1.5), 1.0);
    }

    #[test]
    fn empty_range_is_a_step() {
        let shader = DepthShader::new(0.5, 0.5);
        assert_eq!(shader.remap(0.4), 0.0);
        assert_eq!(shader.remap(0.6), 1.0);
    }
}
