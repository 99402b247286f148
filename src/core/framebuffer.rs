use crate::core::color::{Color, pack_rgb};
use crate::error::RasterError;

/// Per-pixel view depth, reset to `f32::INFINITY` at the start of every frame.
///
/// The renderer keeps one instance and resets it on each render call, so the
/// allocation is reused while its contents never outlive a frame.
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![f32::INFINITY; width * height],
        }
    }

    /// Resizes to the given viewport if needed and fills every cell with the
    /// far sentinel.
    pub fn reset(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width * height, f32::INFINITY);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// A view over a caller-owned color buffer and the frame's depth buffer.
///
/// The color buffer is row-major, one `0xFFRRGGBB` pixel per entry. Both
/// buffers are borrowed exclusively for the duration of a render pass.
pub struct FrameBuffer<'a> {
    color_buffer: &'a mut [u32],
    depth_buffer: &'a mut DepthBuffer,
    width: usize,
    height: usize,
}

impl<'a> FrameBuffer<'a> {
    /// Fails if the color buffer does not hold exactly one pixel per depth cell.
    pub fn new(
        color_buffer: &'a mut [u32],
        depth_buffer: &'a mut DepthBuffer,
    ) -> Result<Self, RasterError> {
        if color_buffer.len() != depth_buffer.len() {
            return Err(RasterError::BufferSizeMismatch {
                expected: depth_buffer.len(),
                actual: color_buffer.len(),
            });
        }
        let width = depth_buffer.width();
        let height = depth_buffer.height();
        Ok(Self {
            color_buffer,
            depth_buffer,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Depth test and update.
    ///
    /// The fragment is rejected when the stored depth is strictly smaller than
    /// `new_depth`; otherwise `new_depth` is written and `true` returned.
    #[inline]
    pub fn depth_test_and_update(&mut self, x: usize, y: usize, new_depth: f32) -> bool {
        let idx = self.index(x, y);
        let stored = &mut self.depth_buffer.data[idx];
        if *stored < new_depth {
            return false;
        }
        *stored = new_depth;
        true
    }

    /// Writes a shaded color, rescaling overflow before packing to 8 bits.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        let idx = self.index(x, y);
        self.color_buffer[idx] = pack_rgb(color);
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.color_buffer[self.index(x, y)]
    }

    pub fn depth(&self, x: usize, y: usize) -> f32 {
        self.depth_buffer.data[self.index(x, y)]
    }

    /// Fills the color buffer with a background color.
    pub fn clear_color(&mut self, color: Color) {
        self.color_buffer.fill(pack_rgb(color));
    }
}
