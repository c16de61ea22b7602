//! Circle candidates and their pruning.
//!
//! Candidates are transient: produced by the Hough accumulator, consumed by
//! the fill classifier, discarded once marks are placed on the grid.

pub(crate) mod nms;

/// Raw circle hypothesis in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircleCandidate {
    /// Center column.
    pub x: i32,
    /// Center row.
    pub y: i32,
    /// Radius in pixels.
    pub radius: u32,
    /// Smoothed accumulator votes at the peak.
    pub votes: u32,
}

impl CircleCandidate {
    /// Squared Euclidean distance between two centers.
    #[inline]
    pub fn center_dist_sq(&self, other: &CircleCandidate) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }
}
