use crate::error::DetectError;

/// Borrowed grayscale image with row-major pixel data and no stride padding.
#[derive(Debug, Clone, Copy)]
pub struct GrayView<'a> {
    width: u32,
    height: u32,
    buf: &'a [u8],
}

impl<'a> GrayView<'a> {
    /// Wrap an existing pixel buffer.
    ///
    /// Both dimensions must be positive and `buf` must hold exactly
    /// `width * height` bytes.
    pub fn new(width: u32, height: u32, buf: &'a [u8]) -> Result<Self, DetectError> {
        let expected = (width as usize).checked_mul(height as usize);
        if width == 0 || height == 0 || expected != Some(buf.len()) {
            return Err(DetectError::InvalidDimensions {
                width,
                height,
                len: buf.len(),
            });
        }
        Ok(Self { width, height, buf })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.width as usize;
        &self.buf[start..start + self.width as usize]
    }
}
