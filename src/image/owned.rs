//! Owned grayscale buffer produced by preprocessing.

use crate::image::{required_len, PixelBuffer};
use crate::util::{BubbleGridError, BubbleGridResult};

/// Owned contiguous grayscale image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl GrayBuffer {
    /// Wraps `data`, which must hold exactly `width * height` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> BubbleGridResult<Self> {
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

    pub(crate) fn from_parts(data: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Copies a borrowed view into an owned buffer.
    pub fn from_view(view: PixelBuffer<'_>) -> Self {
        Self {
            data: view.as_slice().to_vec(),
            width: view.width(),
            height: view.height(),
        }
    }

    /// Returns a borrowed view of the buffer.
    pub fn view(&self) -> PixelBuffer<'_> {
        PixelBuffer {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer and returns its pixel data.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
