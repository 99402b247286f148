use nalgebra::Vector3;

/// Linear RGB color. Channels nominally live in [0, 1] but may exceed 1
/// until the final write normalizes them.
pub type Color = Vector3<f32>;

pub mod colors {
    use super::Color;

    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
}

/// Rescales a color so that its largest channel does not exceed 1.
///
/// Unlike per-channel clamping this keeps the hue: `(2.0, 1.0, 0.5)` becomes
/// `(1.0, 0.5, 0.25)`.
#[inline]
pub fn max_to_one(color: Color) -> Color {
    let max = color.x.max(color.y).max(color.z);
    if max > 1.0 { color / max } else { color }
}

/// Packs a color into a `0xFFRRGGBB` pixel after normalizing overflow.
#[inline]
pub fn pack_rgb(color: Color) -> u32 {
    let c = max_to_one(color);
    let r = (c.x.clamp(0.0, 1.0) * 255.0) as u32;
    let g = (c.y.clamp(0.0, 1.0) * 255.0) as u32;
    let b = (c.z.clamp(0.0, 1.0) * 255.0) as u32;
    (0xFF << 24) | (r << 16) | (g << 8) | b
}

/// Splits a packed `0xFFRRGGBB` pixel into its 8-bit channels.
#[inline]
pub fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
    ]
}
