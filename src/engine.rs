//! End-to-end bubble detection.
//!
//! `BubbleDetector` chains the stages: Gaussian smoothing, circle detection on
//! the smoothed buffer, fill classification against the raw buffer, and a
//! single grid-assignment pass over all marks. Each call owns its
//! intermediate buffers, so one detector can serve many images concurrently.

use crate::classify::{classify, FillConfig};
use crate::detect::{detect_circles, CircleConfig};
use crate::grid::{assign_grid, GridConfig};
use crate::image::PixelBuffer;
use crate::mark::BubbleMark;
use crate::preprocess::{smooth, GaussianKernel, DEFAULT_KERNEL_SIZE};
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::BubbleGridResult;
use std::time::{Duration, Instant};

/// Configuration for the whole detection pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectConfig {
    /// Gaussian kernel side length (odd).
    pub kernel_size: usize,
    /// Gaussian sigma; `<= 0` derives it from `kernel_size`.
    pub sigma: f32,
    /// Circle detector parameters.
    pub circles: CircleConfig,
    /// Fill classifier parameters.
    pub fill: FillConfig,
    /// Grid assigner parameters.
    pub grid: GridConfig,
    /// Parallelise voting and batches when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            kernel_size: DEFAULT_KERNEL_SIZE,
            sigma: 0.0,
            circles: CircleConfig::default(),
            fill: FillConfig::default(),
            grid: GridConfig::default(),
            parallel: false,
        }
    }
}

impl DetectConfig {
    /// Validates every stage configuration.
    pub fn validate(&self) -> BubbleGridResult<()> {
        GaussianKernel::new(self.kernel_size, self.sigma)?;
        self.circles.validate()?;
        self.fill.validate()?;
        self.grid.validate()
    }
}

/// Immutable outcome of detecting bubbles in one image.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionResult {
    marks: Vec<BubbleMark>,
    filled_bubbles: usize,
    width: usize,
    height: usize,
    processing_time: Duration,
}

impl DetectionResult {
    pub(crate) fn new(
        marks: Vec<BubbleMark>,
        width: usize,
        height: usize,
        processing_time: Duration,
    ) -> Self {
        let filled_bubbles = marks.iter().filter(|mark| mark.is_filled).count();
        Self {
            marks,
            filled_bubbles,
            width,
            height,
            processing_time,
        }
    }

    /// Returns the marks in reading order (row-major).
    pub fn marks(&self) -> &[BubbleMark] {
        &self.marks
    }

    /// Returns the number of detected bubbles.
    pub fn total_bubbles(&self) -> usize {
        self.marks.len()
    }

    /// Returns the number of bubbles classified as filled.
    pub fn filled_bubbles(&self) -> usize {
        self.filled_bubbles
    }

    /// Returns the number of bubbles classified as empty.
    pub fn empty_bubbles(&self) -> usize {
        self.marks.len() - self.filled_bubbles
    }

    /// Returns the source image width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the source image height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the wall-clock time spent in detection.
    pub fn processing_time(&self) -> Duration {
        self.processing_time
    }

    /// Iterates over filled marks in reading order.
    pub fn filled_marks(&self) -> impl Iterator<Item = &BubbleMark> + '_ {
        self.marks.iter().filter(|mark| mark.is_filled)
    }

    /// Returns the first mark assigned to `(row, col)`.
    pub fn mark_at(&self, row: i32, col: i32) -> Option<&BubbleMark> {
        self.marks
            .iter()
            .find(|mark| mark.row == row && mark.col == col)
    }

    /// Returns `(rows, cols)`: one past the largest assigned row and column.
    pub fn grid_shape(&self) -> (usize, usize) {
        self.marks.iter().fold((0, 0), |(rows, cols), mark| {
            (
                rows.max((mark.row + 1).max(0) as usize),
                cols.max((mark.col + 1).max(0) as usize),
            )
        })
    }
}

/// Bubble grid detector.
#[derive(Clone, Debug, Default)]
pub struct BubbleDetector {
    config: DetectConfig,
}

impl BubbleDetector {
    /// Creates a detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the detector configuration.
    pub fn with_config(mut self, config: DetectConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    /// Detects and classifies bubbles in `image`.
    ///
    /// Finding no bubbles is a valid result. Only invalid configuration is an
    /// error; buffer dimensions were already checked when the view was built.
    pub fn detect(&self, image: PixelBuffer<'_>) -> BubbleGridResult<DetectionResult> {
        let start = Instant::now();
        let _span = trace_span!("detect", width = image.width(), height = image.height()).entered();

        let cfg = &self.config;
        cfg.validate()?;
        let kernel = GaussianKernel::new(cfg.kernel_size, cfg.sigma)?;
        if image.is_empty() {
            return Ok(DetectionResult::new(
                Vec::new(),
                image.width(),
                image.height(),
                start.elapsed(),
            ));
        }

        let smoothed = smooth(image, &kernel);
        let circles = CircleConfig {
            parallel: cfg.parallel || cfg.circles.parallel,
            ..cfg.circles
        };
        let candidates = detect_circles(smoothed.view(), &circles)?;

        let marks: Vec<BubbleMark> = {
            let _span = trace_span!("classify", candidates = candidates.len()).entered();
            candidates
                .iter()
                .map(|candidate| {
                    let decision = classify(image, candidate, &cfg.fill);
                    trace_debug!(
                        "bubble",
                        x = candidate.x,
                        y = candidate.y,
                        radius = candidate.radius,
                        fill_ratio = decision.fill_ratio
                    );
                    BubbleMark::from_candidate(candidate, decision)
                })
                .collect()
        };
        let marks = assign_grid(marks, &cfg.grid);

        let result = DetectionResult::new(marks, image.width(), image.height(), start.elapsed());
        trace_event!(
            "detect_done",
            total = result.total_bubbles(),
            filled = result.filled_bubbles(),
            elapsed_us = result.processing_time().as_micros() as u64
        );
        Ok(result)
    }

    /// Detects bubbles in several independent images.
    ///
    /// Results keep the input order. With the `rayon` feature and
    /// `parallel = true` images are processed concurrently.
    pub fn detect_batch(
        &self,
        images: &[PixelBuffer<'_>],
    ) -> Vec<BubbleGridResult<DetectionResult>> {
        let _span = trace_span!("detect_batch", images = images.len()).entered();
        if self.config.parallel {
            return self.detect_batch_par(images);
        }
        images.iter().map(|image| self.detect(*image)).collect()
    }

    #[cfg(feature = "rayon")]
    fn detect_batch_par(&self, images: &[PixelBuffer<'_>]) -> Vec<BubbleGridResult<DetectionResult>> {
        use rayon::prelude::*;
        images.par_iter().map(|image| self.detect(*image)).collect()
    }

    #[cfg(not(feature = "rayon"))]
    fn detect_batch_par(&self, images: &[PixelBuffer<'_>]) -> Vec<BubbleGridResult<DetectionResult>> {
        images.iter().map(|image| self.detect(*image)).collect()
    }
}
