//! Gaussian smoothing applied before edge detection.
//!
//! Scan noise produces short, strong gradients that would otherwise vote in
//! the circle accumulator. The blur is separable: a horizontal pass into an
//! `f32` scratch buffer followed by a vertical pass that rounds back to `u8`.
//! Borders replicate the outermost pixel, so dimensions never change.

use crate::image::{GrayBuffer, PixelBuffer};
use crate::trace::{trace_event, trace_span};
use crate::util::{BubbleGridError, BubbleGridResult};

#[cfg_attr(feature = "simd", allow(dead_code))]
mod scalar;
#[cfg(feature = "simd")]
mod simd;

#[cfg(not(feature = "simd"))]
use scalar::{horizontal_pass, vertical_pass};
#[cfg(feature = "simd")]
use simd::{horizontal_pass, vertical_pass};

/// Default kernel side length.
pub const DEFAULT_KERNEL_SIZE: usize = 5;

/// Normalised 1D Gaussian weights applied along both axes.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    size: usize,
    sigma: f32,
    weights: Vec<f32>,
}

impl GaussianKernel {
    /// Builds a `size x size` kernel.
    ///
    /// `size` must be odd. A `sigma <= 0` derives the width from the size as
    /// `0.3 * ((size - 1) / 2 - 1) + 0.8`, which gives 1.1 for a 5x5 kernel.
    pub fn new(size: usize, sigma: f32) -> BubbleGridResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(BubbleGridError::InvalidConfig {
                reason: "kernel size must be odd and positive",
            });
        }
        if !sigma.is_finite() {
            return Err(BubbleGridError::InvalidConfig {
                reason: "sigma must be finite",
            });
        }
        Ok(Self::build(size, sigma))
    }

    fn build(size: usize, sigma: f32) -> Self {
        let sigma = if sigma > 0.0 {
            sigma
        } else {
            0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
        };
        let half = (size / 2) as isize;
        let denom = 2.0 * sigma * sigma;
        let mut weights: Vec<f32> = (-half..=half)
            .map(|i| (-((i * i) as f32) / denom).exp())
            .collect();
        let sum: f32 = weights.iter().sum();
        for w in weights.iter_mut() {
            *w /= sum;
        }
        Self {
            size,
            sigma,
            weights,
        }
    }

    /// Returns the kernel side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the effective standard deviation.
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Returns the normalised 1D weights (length `size`).
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

impl Default for GaussianKernel {
    fn default() -> Self {
        Self::build(DEFAULT_KERNEL_SIZE, 0.0)
    }
}

/// Smooths `buffer` with `kernel`, returning a buffer of the same size.
pub fn smooth(buffer: PixelBuffer<'_>, kernel: &GaussianKernel) -> GrayBuffer {
    let width = buffer.width();
    let height = buffer.height();
    let _span = trace_span!("smooth", width = width, height = height).entered();
    if buffer.is_empty() {
        return GrayBuffer::from_view(buffer);
    }

    let mut scratch = vec![0.0f32; width * height];
    horizontal_pass(buffer, kernel.weights(), &mut scratch);
    let mut out = vec![0u8; width * height];
    vertical_pass(&scratch, width, height, kernel.weights(), &mut out);
    trace_event!("smooth_done", kernel_size = kernel.size());

    GrayBuffer::from_parts(out, width, height)
}

#[inline]
pub(crate) fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

#[inline]
pub(crate) fn round_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
