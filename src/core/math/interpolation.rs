use crate::core::pipeline::Interpolatable;
use nalgebra::{Vector2, Vector3};

/// Triangles whose doubled screen area is below this are treated as degenerate.
pub const DEGENERATE_AREA: f32 = 1e-6;

/// 2D cross product (z component of the 3D cross product).
#[inline(always)]
pub fn cross2(a: Vector2<f32>, b: Vector2<f32>) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Coverage test of a screen-space point against a triangle.
///
/// The point is inside when the three sub-triangle areas it forms with the
/// edges add up to the whole triangle area, within `tolerance` (an absolute
/// tolerance in doubled screen-area units). Returns the barycentric weights
/// `(w0, w1, w2)`, where `wI` belongs to vertex `I` and is derived from the
/// sub-triangle built on the edge opposite to it.
///
/// Returns `None` for points outside and for zero-area triangles.
pub fn hit_test_screen_triangle(
    p: Vector2<f32>,
    v0: Vector2<f32>,
    v1: Vector2<f32>,
    v2: Vector2<f32>,
    tolerance: f32,
) -> Option<Vector3<f32>> {
    let triangle_area = cross2(v1 - v0, v2 - v0).abs();
    if triangle_area < DEGENERATE_AREA {
        return None;
    }

    let area0 = cross2(p - v1, v2 - v1).abs();
    let area1 = cross2(p - v2, v0 - v2).abs();
    let area2 = cross2(p - v0, v1 - v0).abs();

    // Sum of absolute areas is never smaller than the triangle area.
    let total = area0 + area1 + area2;
    if (total - triangle_area).abs() > tolerance {
        return None;
    }

    Some(Vector3::new(area0, area1, area2) / total)
}

/// Perspective-correct view depth at a covered pixel:
/// `1 / (w0/v0.w + w1/v1.w + w2/v2.w)`.
#[inline]
pub fn perspective_view_depth(bary: Vector3<f32>, w: [f32; 3]) -> f32 {
    1.0 / (bary.x / w[0] + bary.y / w[1] + bary.z / w[2])
}

/// Perspective-correct attribute interpolation:
/// `view_depth * Σ (attr_i / w_i * bary_i)`.
#[inline]
pub fn perspective_interpolate<T: Interpolatable>(
    values: [T; 3],
    bary: Vector3<f32>,
    w: [f32; 3],
    view_depth: f32,
) -> T {
    (values[0] * (bary.x / w[0]) + values[1] * (bary.y / w[1]) + values[2] * (bary.z / w[2]))
        * view_depth
}

/// Screen-space linear interpolation, valid for quantities that are affine in
/// screen space such as the projected (post-divide) depth.
///
/// Projected depth goes through here rather than the harmonic scheme used for
/// view depth. Both agree up to rounding; in the 0.995..1.0 depth view the
/// difference stays below one gray level.
#[inline]
pub fn linear_interpolate(values: [f32; 3], bary: Vector3<f32>) -> f32 {
    values[0] * bary.x + values[1] * bary.y + values[2] * bary.z
}
