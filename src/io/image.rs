use crate::core::color::unpack_rgb;
use crate::error::{LoadError, RasterError};
use image::{ImageBuffer, Rgb, RgbImage};
use log::info;
use std::path::Path;

/// Converts a row-major `0xFFRRGGBB` buffer to an RGB image.
pub fn buffer_to_image(
    buffer: &[u32],
    width: usize,
    height: usize,
) -> Result<RgbImage, RasterError> {
    if buffer.len() != width * height {
        return Err(RasterError::BufferSizeMismatch {
            expected: width * height,
            actual: buffer.len(),
        });
    }

    Ok(ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        Rgb(unpack_rgb(buffer[y as usize * width + x as usize]))
    }))
}

/// Saves a packed color buffer. The format follows the file extension
/// (`.png`, `.bmp`, ...).
pub fn save_buffer_to_image<P: AsRef<Path>>(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: P,
) -> Result<(), LoadError> {
    let img = buffer_to_image(buffer, width, height)?;
    img.save(path.as_ref())?;
    info!("Saved {}x{} image to '{}'", width, height, path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpacks_channels_in_row_major_order() {
        let buffer = [0xFF_FF_00_00, 0xFF_00_FF_00, 0xFF_00_00_FF, 0xFF_64_64_64];
        let img = buffer_to_image(&buffer, 2, 2).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([0, 255, 0]));
        assert_eq!(img.get_pixel(0, 1), &Rgb([0, 0, 255]));
        assert_eq!(img.get_pixel(1, 1), &Rgb([100, 100, 100]));
    }

    #[test]
    fn wrong_size_is_refused() {
        assert!(buffer_to_image(&[0; 3], 2, 2).is_err());
    }

    #[test]
    fn saves_png() {
        let path = std::env::temp_dir().join(format!("softraster_save_{}.png", std::process::id()));
        save_buffer_to_image(&[0xFF_10_20_30; 4], 2, 2, &path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.get_pixel(1, 1), &Rgb([0x10, 0x20, 0x30]));
    }
}
