//! Accuracy scoring against ground truth.
//!
//! Each truth cell is looked up by `(row, col)` among the detected marks:
//!
//! | detection      | truth filled   | truth empty    |
//! |----------------|----------------|----------------|
//! | filled         | correct        | false positive |
//! | empty          | false negative | correct        |
//! | missing        | false negative | not counted    |
//!
//! When the grid assigner produces the same `(row, col)` twice, the mark that
//! comes first in the detected sequence is used and the rest are reported in
//! [`AccuracyReport::duplicate_cells`]. Marks that were never placed on the
//! grid have no cell and take no part in scoring.

use crate::mark::BubbleMark;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Expected state of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroundTruthEntry {
    /// Grid row.
    pub row: i32,
    /// Grid column.
    pub col: i32,
    /// Whether the bubble should be filled.
    pub is_filled: bool,
}

/// Outcome of comparing detections with ground truth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AccuracyReport {
    /// `correct / total`, 0 when there is no ground truth.
    pub accuracy: f32,
    /// Truth cells whose detected state matched.
    pub correct: usize,
    /// Detected filled where truth says empty.
    pub false_positives: usize,
    /// Truth filled but detected empty or not detected at all.
    pub false_negatives: usize,
    /// Number of ground-truth entries.
    pub total: usize,
    /// Assigned marks ignored because an earlier mark held the same cell.
    pub duplicate_cells: usize,
}

/// Scores `detected` marks against `truth`.
pub fn score(detected: &[BubbleMark], truth: &[GroundTruthEntry]) -> AccuracyReport {
    let mut by_cell: HashMap<(i32, i32), &BubbleMark> = HashMap::with_capacity(detected.len());
    let mut duplicate_cells = 0usize;
    for mark in detected.iter().filter(|mark| mark.is_assigned()) {
        match by_cell.entry((mark.row, mark.col)) {
            Entry::Vacant(slot) => {
                slot.insert(mark);
            }
            Entry::Occupied(_) => duplicate_cells += 1,
        }
    }

    let mut report = AccuracyReport {
        total: truth.len(),
        duplicate_cells,
        ..AccuracyReport::default()
    };
    for entry in truth {
        match by_cell.get(&(entry.row, entry.col)) {
            Some(mark) if mark.is_filled == entry.is_filled => report.correct += 1,
            Some(mark) if mark.is_filled => report.false_positives += 1,
            Some(_) => report.false_negatives += 1,
            None if entry.is_filled => report.false_negatives += 1,
            None => {}
        }
    }

    if report.total > 0 {
        report.accuracy = report.correct as f32 / report.total as f32;
    }
    report
}
