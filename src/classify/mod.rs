//! Fill classification of circle candidates.
//!
//! The classifier samples an inner disk of `inner_radius_ratio * radius`
//! around the candidate center so the printed outline of an empty bubble is
//! never counted as fill. A sample is dark when its intensity is below
//! `dark_threshold`; the bubble is filled when the dark fraction reaches
//! `fill_threshold`. Both thresholds are tuned for high-contrast scans and
//! exposed for recalibration.

use crate::candidate::CircleCandidate;
use crate::image::PixelBuffer;
use crate::util::{BubbleGridError, BubbleGridResult};

/// Fill classifier configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillConfig {
    /// Minimum dark fraction for a filled bubble, in `[0, 1]`.
    pub fill_threshold: f32,
    /// Intensities strictly below this value count as dark.
    pub dark_threshold: u8,
    /// Sampling disk radius as a fraction of the candidate radius.
    pub inner_radius_ratio: f32,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            fill_threshold: 0.4,
            dark_threshold: 128,
            inner_radius_ratio: 0.7,
        }
    }
}

impl FillConfig {
    /// Checks that all parameters are within their valid ranges.
    pub fn validate(&self) -> BubbleGridResult<()> {
        if !(0.0..=1.0).contains(&self.fill_threshold) {
            return Err(BubbleGridError::InvalidConfig {
                reason: "fill_threshold must be within [0, 1]",
            });
        }
        if !self.inner_radius_ratio.is_finite()
            || self.inner_radius_ratio <= 0.0
            || self.inner_radius_ratio > 1.0
        {
            return Err(BubbleGridError::InvalidConfig {
                reason: "inner_radius_ratio must be within (0, 1]",
            });
        }
        Ok(())
    }
}

/// Outcome of classifying one candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillDecision {
    /// Whether the dark fraction reached the fill threshold.
    pub is_filled: bool,
    /// Dark-pixel fraction of the sampled disk, in `[0, 1]`.
    pub fill_ratio: f32,
}

/// Classifies a candidate against the raw (unsmoothed) buffer.
pub fn classify(
    image: PixelBuffer<'_>,
    candidate: &CircleCandidate,
    config: &FillConfig,
) -> FillDecision {
    let inner_radius = config.inner_radius_ratio * candidate.radius as f32;
    let fill_ratio = dark_ratio(
        image,
        candidate.x,
        candidate.y,
        inner_radius,
        config.dark_threshold,
    );
    FillDecision {
        is_filled: fill_ratio >= config.fill_threshold,
        fill_ratio,
    }
}

/// Fraction of in-bounds pixels within `radius` of `(cx, cy)` darker than
/// `dark_threshold`.
///
/// Returns 0 when the disk lies entirely outside the image.
pub fn dark_ratio(image: PixelBuffer<'_>, cx: i32, cy: i32, radius: f32, dark_threshold: u8) -> f32 {
    if !radius.is_finite() || radius < 0.0 {
        return 0.0;
    }
    let reach = radius.floor() as i64;
    let radius_sq = radius * radius;
    let mut total = 0u32;
    let mut dark = 0u32;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if ((dx * dx + dy * dy) as f32) > radius_sq {
                continue;
            }
            if let Some(value) = image.get_signed(i64::from(cx) + dx, i64::from(cy) + dy) {
                total += 1;
                if value < dark_threshold {
                    dark += 1;
                }
            }
        }
    }
    if total == 0 {
        0.0
    } else {
        dark as f32 / total as f32
    }
}
