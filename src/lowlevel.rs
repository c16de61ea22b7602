//! Individual pipeline stages for custom detection flows.
//!
//! `BubbleDetector` covers the common case. These functions expose each stage
//! on its own, e.g. to classify circles found by another detector or to
//! re-run grid assignment with different banding.

pub use crate::candidate::nms::suppress_close;
pub use crate::classify::{classify, dark_ratio};
pub use crate::detect::detect_circles;
pub use crate::grid::assign_grid;
pub use crate::preprocess::smooth;
