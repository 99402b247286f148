use crate::core::color::{Color, colors};
use nalgebra::{Point3, Vector2, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Represents a single vertex in mesh space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Vertex color, 0..1 but not clamped above 1.
    pub color: Color,
    /// Texture coordinates (UV), origin at the top-left of the texture.
    pub texcoord: Vector2<f32>,
    /// Normal vector for lighting calculations.
    pub normal: Vector3<f32>,
    /// Tangent vector for normal mapping.
    pub tangent: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, texcoord: Vector2<f32>) -> Self {
        Self {
            position,
            color: colors::WHITE,
            texcoord,
            normal,
            tangent: Vector3::zeros(),
        }
    }

    /// A vertex carrying only a position and a color.
    pub fn colored(position: Point3<f32>, color: Color) -> Self {
        Self {
            position,
            color,
            texcoord: Vector2::zeros(),
            normal: Vector3::zeros(),
            tangent: Vector3::zeros(),
        }
    }
}

/// Per-vertex attributes carried from the vertex stage to the shading stage.
///
/// Interpolated across the triangle with the perspective-correct scheme, which
/// only needs `Add` and `Mul<f32>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexAttributes {
    pub color: Color,
    pub uv: Vector2<f32>,
    /// World-space normal.
    pub normal: Vector3<f32>,
    /// World-space tangent.
    pub tangent: Vector3<f32>,
    /// Unit vector from the world-space vertex towards the camera origin.
    pub view_dir: Vector3<f32>,
}

impl VertexAttributes {
    /// Re-normalizes the direction vectors, which linear interpolation shortens.
    /// Zero-length vectors (e.g. a mesh without tangents) stay zero.
    pub fn renormalized(self) -> Self {
        Self {
            normal: normalize_or_zero(self.normal),
            tangent: normalize_or_zero(self.tangent),
            view_dir: normalize_or_zero(self.view_dir),
            ..self
        }
    }
}

impl Add for VertexAttributes {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            color: self.color + other.color,
            uv: self.uv + other.uv,
            normal: self.normal + other.normal,
            tangent: self.tangent + other.tangent,
            view_dir: self.view_dir + other.view_dir,
        }
    }
}

impl Mul<f32> for VertexAttributes {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            color: self.color * scalar,
            uv: self.uv * scalar,
            normal: self.normal * scalar,
            tangent: self.tangent * scalar,
            view_dir: self.view_dir * scalar,
        }
    }
}

/// A vertex after the vertex stage.
///
/// `position.x`/`position.y` are pixel coordinates, `position.z` is the
/// projected depth (nominally [0, 1]) and `position.w` the view-space depth
/// used as the perspective divisor.
///
/// The rasterizer also hands interpolated fragments to the shading stage as a
/// `ScreenVertex`, with `x`/`y` set to the pixel and `z`/`w` to the
/// interpolated projected and view depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub position: Vector4<f32>,
    pub attributes: VertexAttributes,
}

impl ScreenVertex {
    #[inline]
    pub fn screen_xy(&self) -> Vector2<f32> {
        self.position.xy()
    }

    #[inline]
    pub fn projected_depth(&self) -> f32 {
        self.position.z
    }

    #[inline]
    pub fn view_depth(&self) -> f32 {
        self.position.w
    }
}

#[inline]
pub(crate) fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros)
}
