//! Bubblegrid detects answer-sheet bubbles in grayscale scans.
//!
//! The pipeline smooths the image, finds circles with a Hough-style voting
//! scheme, classifies each circle as filled or empty from its interior
//! darkness and places the marks on a row/column grid. A separate scorer
//! compares a result with known ground truth.
//!
//! Decoding image files is left to the caller (or to the `image-io` feature);
//! the engine itself only borrows a `u8` buffer. Voting and batches can run in
//! parallel with the `rayon` feature, and smoothing can use SIMD with `simd`.

mod candidate;
pub mod classify;
pub mod detect;
mod engine;
pub mod grid;
pub mod image;
pub mod lowlevel;
mod mark;
pub mod preprocess;
pub mod score;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use candidate::CircleCandidate;
pub use classify::{FillConfig, FillDecision};
pub use detect::CircleConfig;
pub use engine::{BubbleDetector, DetectConfig, DetectionResult};
pub use grid::GridConfig;
pub use crate::image::{GrayBuffer, PixelBuffer};
pub use mark::{BubbleMark, UNASSIGNED};
pub use preprocess::GaussianKernel;
pub use score::{score, AccuracyReport, GroundTruthEntry};
pub use util::{BubbleGridError, BubbleGridResult};
