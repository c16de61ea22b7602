//! Raster-decoding adapter around the `image` crate.
//!
//! Available when the `image-io` feature is enabled. This is the only place
//! where a file format is known; the engine itself sees plain `u8` buffers.

use crate::image::{GrayBuffer, PixelBuffer};
use crate::util::{BubbleGridError, BubbleGridResult};
use std::path::Path;

/// Borrows a grayscale `image` buffer as a pixel view.
pub fn view_from_gray_image(img: &image::GrayImage) -> BubbleGridResult<PixelBuffer<'_>> {
    PixelBuffer::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Copies a grayscale `image` buffer into an owned buffer.
pub fn owned_from_gray_image(img: &image::GrayImage) -> BubbleGridResult<GrayBuffer> {
    GrayBuffer::new(
        img.as_raw().clone(),
        img.width() as usize,
        img.height() as usize,
    )
}

/// Converts any decoded image to 8-bit luma.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> BubbleGridResult<GrayBuffer> {
    let gray = img.to_luma8();
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    GrayBuffer::new(gray.into_raw(), width, height)
}

/// Decodes an image file from disk into an owned grayscale buffer.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> BubbleGridResult<GrayBuffer> {
    let img = image::open(path).map_err(|err| BubbleGridError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}
