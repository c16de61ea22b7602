//! SIMD convolution passes using the `wide` crate.
//!
//! Interior pixels are processed 8 at a time with `f32x8`; columns whose
//! taps would reach past the border fall back to the scalar path. Each lane
//! performs the same multiply/add sequence as the scalar code, so the two
//! paths produce identical output.

use crate::image::PixelBuffer;
use crate::preprocess::scalar::{horizontal_at, vertical_at};
use crate::preprocess::{clamp_index, round_to_u8};
use wide::f32x8;

const LANES: usize = 8;

#[inline]
fn load_u8x8_as_f32x8(slice: &[u8]) -> f32x8 {
    f32x8::from([
        slice[0] as f32,
        slice[1] as f32,
        slice[2] as f32,
        slice[3] as f32,
        slice[4] as f32,
        slice[5] as f32,
        slice[6] as f32,
        slice[7] as f32,
    ])
}

#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

pub(crate) fn horizontal_pass(src: PixelBuffer<'_>, weights: &[f32], dst: &mut [f32]) {
    let width = src.width();
    let half = weights.len() / 2;
    for y in 0..src.height() {
        let row = match src.row(y) {
            Some(row) => row,
            None => return,
        };
        let out = &mut dst[y * width..(y + 1) * width];

        let mut x = 0;
        while x < width.min(half) {
            out[x] = horizontal_at(row, x, weights);
            x += 1;
        }
        // Vector body: all taps of lanes x..x+8 stay inside the row.
        while x + LANES + half <= width {
            let mut acc = f32x8::ZERO;
            for (k, &w) in weights.iter().enumerate() {
                let vals = load_u8x8_as_f32x8(&row[x + k - half..]);
                acc += f32x8::splat(w) * vals;
            }
            out[x..x + LANES].copy_from_slice(&acc.to_array());
            x += LANES;
        }
        while x < width {
            out[x] = horizontal_at(row, x, weights);
            x += 1;
        }
    }
}

pub(crate) fn vertical_pass(
    src: &[f32],
    width: usize,
    height: usize,
    weights: &[f32],
    dst: &mut [u8],
) {
    let half = (weights.len() / 2) as isize;
    let simd_end = width / LANES * LANES;
    for y in 0..height {
        let mut x = 0;
        while x < simd_end {
            let mut acc = f32x8::ZERO;
            for (k, &w) in weights.iter().enumerate() {
                let sy = clamp_index(y as isize + k as isize - half, height);
                let vals = load_f32x8(&src[sy * width + x..]);
                acc += f32x8::splat(w) * vals;
            }
            for (lane, value) in acc.to_array().into_iter().enumerate() {
                dst[y * width + x + lane] = round_to_u8(value);
            }
            x += LANES;
        }
        while x < width {
            dst[y * width + x] = round_to_u8(vertical_at(src, width, height, x, y, weights));
            x += 1;
        }
    }
}
