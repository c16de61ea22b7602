//! Reference convolution passes.

use crate::image::PixelBuffer;
use crate::preprocess::{clamp_index, round_to_u8};

/// Convolves each row with `weights`, replicating the first/last column.
pub(crate) fn horizontal_pass(src: PixelBuffer<'_>, weights: &[f32], dst: &mut [f32]) {
    let width = src.width();
    for y in 0..src.height() {
        let row = match src.row(y) {
            Some(row) => row,
            None => return,
        };
        let out = &mut dst[y * width..(y + 1) * width];
        for x in 0..width {
            out[x] = horizontal_at(row, x, weights);
        }
    }
}

#[inline]
pub(crate) fn horizontal_at(row: &[u8], x: usize, weights: &[f32]) -> f32 {
    let half = (weights.len() / 2) as isize;
    let mut acc = 0.0f32;
    for (k, &w) in weights.iter().enumerate() {
        let sx = clamp_index(x as isize + k as isize - half, row.len());
        acc += w * row[sx] as f32;
    }
    acc
}

/// Convolves each column with `weights`, replicating the first/last row.
pub(crate) fn vertical_pass(
    src: &[f32],
    width: usize,
    height: usize,
    weights: &[f32],
    dst: &mut [u8],
) {
    for y in 0..height {
        for x in 0..width {
            dst[y * width + x] = round_to_u8(vertical_at(src, width, height, x, y, weights));
        }
    }
}

#[inline]
pub(crate) fn vertical_at(
    src: &[f32],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    weights: &[f32],
) -> f32 {
    let half = (weights.len() / 2) as isize;
    let mut acc = 0.0f32;
    for (k, &w) in weights.iter().enumerate() {
        let sy = clamp_index(y as isize + k as isize - half, height);
        acc += w * src[sy * width + x];
    }
    acc
}
