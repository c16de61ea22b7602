//! Row/column assignment by vertical banding.
//!
//! Marks are put in reading order by a coarse row bucket
//! (`y / row_band_height`) and then by `x`. A single walk over that order
//! starts a new row whenever `y` jumps by more than `row_break_threshold`
//! from the first mark of the current row.
//!
//! Row boundaries depend on every mark, so assignment always runs over the
//! full set at once. The heuristic expects a roughly uniform, unskewed grid
//! and will misplace marks on skewed or irregular sheets.

use crate::mark::BubbleMark;
use crate::trace::{trace_event, trace_span};
use crate::util::{BubbleGridError, BubbleGridResult};

/// Grid assigner configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridConfig {
    /// Height of the coarse row bucket used for sorting, in pixels.
    pub row_band_height: u32,
    /// Vertical jump that starts a new row, in pixels.
    pub row_break_threshold: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_band_height: 50,
            row_break_threshold: 30,
        }
    }
}

impl GridConfig {
    /// Checks that all parameters are within their valid ranges.
    pub fn validate(&self) -> BubbleGridResult<()> {
        if self.row_band_height == 0 {
            return Err(BubbleGridError::InvalidConfig {
                reason: "row_band_height must be at least 1",
            });
        }
        Ok(())
    }
}

/// Assigns `row`/`col` to every mark and returns them in reading order.
///
/// Any previous assignment is ignored, so re-running on the output yields the
/// same grid. Marks with equal bucket and `x` keep their input order.
pub fn assign_grid(mut marks: Vec<BubbleMark>, config: &GridConfig) -> Vec<BubbleMark> {
    let _span = trace_span!("assign_grid", marks = marks.len()).entered();
    let band = config.row_band_height.max(1) as i32;
    let row_break = i64::from(config.row_break_threshold);
    marks.sort_by_key(|mark| (mark.y.div_euclid(band), mark.x));

    let mut current_row = 0i32;
    let mut col = 0i32;
    let mut last_y = marks.first().map(|mark| mark.y).unwrap_or(0);
    for mark in marks.iter_mut() {
        if (i64::from(mark.y) - i64::from(last_y)).abs() > row_break {
            current_row += 1;
            col = 0;
            last_y = mark.y;
        }
        mark.row = current_row;
        mark.col = col;
        col += 1;
    }

    trace_event!(
        "grid_assigned",
        rows = if marks.is_empty() { 0 } else { current_row + 1 }
    );
    marks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::UNASSIGNED;

    fn mark(x: i32, y: i32) -> BubbleMark {
        BubbleMark {
            row: UNASSIGNED,
            col: UNASSIGNED,
            x,
            y,
            radius: 12,
            is_filled: false,
            fill_ratio: 0.0,
        }
    }

    fn positions(marks: &[BubbleMark]) -> Vec<(i32, i32, i32, i32)> {
        marks.iter().map(|m| (m.row, m.col, m.x, m.y)).collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(assign_grid(Vec::new(), &GridConfig::default()).is_empty());
    }

    #[test]
    fn reading_order_is_top_down_left_right() {
        let marks = vec![mark(200, 130), mark(100, 76), mark(100, 128), mark(200, 74)];
        let out = assign_grid(marks, &GridConfig::default());
        assert_eq!(
            positions(&out),
            vec![
                (0, 0, 100, 76),
                (0, 1, 200, 74),
                (1, 0, 100, 128),
                (1, 1, 200, 130),
            ]
        );
    }

    #[test]
    fn jitter_within_band_stays_in_row() {
        let marks = vec![mark(10, 60), mark(60, 70), mark(110, 65)];
        let out = assign_grid(marks, &GridConfig::default());
        assert!(out.iter().all(|m| m.row == 0));
        assert_eq!(out.iter().map(|m| m.col).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn break_is_measured_from_row_start() {
        // Same bucket, but the third mark drifts more than 30px below the first.
        let marks = vec![mark(10, 101), mark(20, 120), mark(30, 140)];
        let out = assign_grid(marks, &GridConfig::default());
        assert_eq!(
            out.iter().map(|m| (m.row, m.col)).collect::<Vec<_>>(),
            vec![(0, 0), (0, 1), (1, 0)]
        );
    }

    #[test]
    fn identical_positions_keep_input_order() {
        let mut a = mark(50, 50);
        a.radius = 10;
        let mut b = mark(50, 50);
        b.radius = 11;
        let out = assign_grid(vec![a, b], &GridConfig::default());
        assert_eq!(out[0].radius, 10);
        assert_eq!(out[1].radius, 11);
        assert_eq!((out[1].row, out[1].col), (0, 1));
    }

    #[test]
    fn zero_band_height_is_rejected() {
        let cfg = GridConfig {
            row_band_height: 0,
            ..GridConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
