//! Hough-style circle detection.
//!
//! The detector works in three steps:
//! 1. a thinned Sobel edge map keeps pixels whose gradient magnitude exceeds
//!    `edge_threshold`;
//! 2. every edge pixel votes along its gradient, in both directions, at each
//!    radius in `[min_radius, max_radius]`;
//! 3. local maxima of the box-smoothed accumulator above `center_threshold`
//!    are pruned greedily so no two kept centers lie closer than
//!    `min_center_distance`.
//!
//! A buffer without edges yields no candidates; that is a result, not an error.

use crate::candidate::nms::suppress_close;
use crate::candidate::CircleCandidate;
use crate::image::PixelBuffer;
use crate::trace::{trace_event, trace_span};
use crate::util::{BubbleGridError, BubbleGridResult};

pub(crate) mod edges;
pub(crate) mod hough;
#[cfg(feature = "rayon")]
mod parallel;

use edges::edge_points;
use hough::{Accumulator, AccumulatorShape};

/// Circle detector configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleConfig {
    /// Smallest radius voted for, in pixels.
    pub min_radius: u32,
    /// Largest radius voted for, in pixels.
    pub max_radius: u32,
    /// Minimum distance between accepted centers, in pixels.
    pub min_center_distance: f32,
    /// Gradient magnitude (Sobel, L2) an edge pixel must exceed.
    pub edge_threshold: f32,
    /// Minimum smoothed accumulator votes for a center.
    pub center_threshold: u32,
    /// Image pixels per accumulator cell (1.0 = full resolution).
    pub accumulator_resolution: f32,
    /// Vote in parallel row bands when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            min_radius: 10,
            max_radius: 30,
            min_center_distance: 20.0,
            edge_threshold: 50.0,
            center_threshold: 30,
            accumulator_resolution: 1.0,
            parallel: false,
        }
    }
}

impl CircleConfig {
    /// Checks that all parameters are within their valid ranges.
    pub fn validate(&self) -> BubbleGridResult<()> {
        if self.min_radius == 0 {
            return Err(BubbleGridError::InvalidConfig {
                reason: "min_radius must be at least 1",
            });
        }
        if self.min_radius > self.max_radius {
            return Err(BubbleGridError::InvalidConfig {
                reason: "min_radius must not exceed max_radius",
            });
        }
        if !self.accumulator_resolution.is_finite() || self.accumulator_resolution <= 0.0 {
            return Err(BubbleGridError::InvalidConfig {
                reason: "accumulator_resolution must be finite and positive",
            });
        }
        if !self.edge_threshold.is_finite() || self.edge_threshold < 0.0 {
            return Err(BubbleGridError::InvalidConfig {
                reason: "edge_threshold must be finite and non-negative",
            });
        }
        if !self.min_center_distance.is_finite() || self.min_center_distance < 0.0 {
            return Err(BubbleGridError::InvalidConfig {
                reason: "min_center_distance must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// Detects circles in `image` (normally the smoothed buffer).
///
/// Returns candidates ordered by descending votes.
pub fn detect_circles(
    image: PixelBuffer<'_>,
    config: &CircleConfig,
) -> BubbleGridResult<Vec<CircleCandidate>> {
    config.validate()?;
    let _span = trace_span!(
        "detect_circles",
        width = image.width(),
        height = image.height()
    )
    .entered();
    if image.is_empty() {
        return Ok(Vec::new());
    }

    let edges = edge_points(image, config.edge_threshold);
    trace_event!("edge_map", edge_pixels = edges.len());
    if edges.is_empty() {
        return Ok(Vec::new());
    }

    let shape = AccumulatorShape::new(
        image.width(),
        image.height(),
        config.min_radius,
        config.max_radius,
        config.accumulator_resolution,
    )?;
    let accumulator = accumulate(&edges, shape, config.parallel);

    let mut peaks = accumulator.peaks(config.center_threshold);
    trace_event!("accumulator_peaks", peaks = peaks.len());
    let kept = suppress_close(&mut peaks, config.min_center_distance);
    trace_event!("circle_candidates", candidates = kept.len());
    Ok(kept)
}

#[cfg(feature = "rayon")]
fn accumulate(edges: &[edges::EdgePoint], shape: AccumulatorShape, parallel: bool) -> Accumulator {
    let mut acc = Accumulator::new(shape);
    if parallel {
        parallel::vote_radii(&mut acc, edges);
    } else {
        acc.vote(edges);
    }
    acc
}

#[cfg(not(feature = "rayon"))]
fn accumulate(edges: &[edges::EdgePoint], shape: AccumulatorShape, _parallel: bool) -> Accumulator {
    let mut acc = Accumulator::new(shape);
    acc.vote(edges);
    acc
}
