//! Detected bubble marks.

use crate::candidate::CircleCandidate;
use crate::classify::FillDecision;

/// Row/column value of a mark that has not been placed on the grid yet.
pub const UNASSIGNED: i32 = -1;

/// A detected bubble with its fill state and grid position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BubbleMark {
    /// Grid row, [`UNASSIGNED`] until grid assignment runs.
    pub row: i32,
    /// Grid column, [`UNASSIGNED`] until grid assignment runs.
    pub col: i32,
    /// Center column in pixels.
    pub x: i32,
    /// Center row in pixels.
    pub y: i32,
    /// Radius in pixels.
    pub radius: u32,
    /// Whether the bubble is classified as filled.
    pub is_filled: bool,
    /// Dark-pixel fraction that produced `is_filled`.
    pub fill_ratio: f32,
}

impl BubbleMark {
    /// Builds an unassigned mark from a classified candidate.
    pub fn from_candidate(candidate: &CircleCandidate, decision: FillDecision) -> Self {
        Self {
            row: UNASSIGNED,
            col: UNASSIGNED,
            x: candidate.x,
            y: candidate.y,
            radius: candidate.radius,
            is_filled: decision.is_filled,
            fill_ratio: decision.fill_ratio,
        }
    }

    /// Returns true once the grid assigner has placed this mark.
    pub fn is_assigned(&self) -> bool {
        self.row >= 0 && self.col >= 0
    }
}
