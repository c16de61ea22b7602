//! Pixel buffers handed to the engine.
//!
//! `PixelBuffer` is a borrowed, row-major, single-channel `u8` view. The
//! declared dimensions must account for every byte of the backing slice:
//! silently clamping a short or long buffer would shift every row and corrupt
//! the row/column geometry computed downstream. Zero-area buffers are valid
//! and simply contain no bubbles.

use crate::util::{BubbleGridError, BubbleGridResult};

#[cfg(feature = "image-io")]
pub mod io;
mod owned;

pub use owned::GrayBuffer;

/// Borrowed grayscale view (intensity 0 = black, 255 = white).
#[derive(Copy, Clone, Debug)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> PixelBuffer<'a> {
    /// Creates a view over `data`, which must hold exactly `width * height` bytes.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> BubbleGridResult<Self> {
        let expected = required_len(width, height)?;
        if data.len() != expected {
            return Err(BubbleGridError::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true when the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the backing row-major slice.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the intensity at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns the intensity at signed coordinates, `None` outside the image.
    pub fn get_signed(&self, x: i64, y: i64) -> Option<u8> {
        if x < 0 || y < 0 {
            return None;
        }
        self.get(x as usize, y as usize)
    }

    /// Returns row `y` as a slice of length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }
}

pub(crate) fn required_len(width: usize, height: usize) -> BubbleGridResult<usize> {
    width
        .checked_mul(height)
        .ok_or(BubbleGridError::InvalidDimensions { width, height })
}
