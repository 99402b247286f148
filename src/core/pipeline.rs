use crate::core::color::Color;
use crate::core::geometry::ScreenVertex;
use crate::error::RasterError;
use crate::scene::material::BoundMaterial;
use std::ops::{Add, Mul};

/// Trait for types that can be interpolated across a triangle's surface.
///
/// Requirements:
/// - Copy: cheaply duplicable values for per-vertex storage and interpolation.
/// - Add + Mul<f32>: support the weighted sums used by barycentric interpolation.
pub trait Interpolatable: Copy + Add<Output = Self> + Mul<f32, Output = Self> {}

impl<T> Interpolatable for T where T: Copy + Add<Output = T> + Mul<f32, Output = T> {}

/// The pluggable shading stage.
///
/// The rasterizer calls `fragment` once per covered pixel that passed the depth
/// test, with every attribute already interpolated and re-normalized.
/// Returned colors may exceed 1; the rasterizer rescales them before writing.
pub trait FragmentShader {
    /// Short name used in error messages and logs.
    fn name(&self) -> &'static str;

    /// Checks that `material` binds every texture this shader samples.
    ///
    /// Called once per mesh before any of its triangles are rasterized, so a
    /// misconfigured material fails the frame instead of being shaded with
    /// substitute data.
    fn validate(&self, material: &BoundMaterial<'_>) -> Result<(), RasterError>;

    /// Fragment shader stage.
    ///
    /// # Arguments
    /// - `fragment`: the interpolated vertex. `position` holds the pixel
    ///   coordinates, the projected depth and the view depth.
    /// - `material`: the resolved material of the triangle's mesh.
    ///
    /// # Returns
    /// - `Color`: final linear RGB color.
    fn fragment(&self, fragment: &ScreenVertex, material: &BoundMaterial<'_>) -> Color;
}
