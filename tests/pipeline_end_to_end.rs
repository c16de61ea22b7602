mod common;

use bubblegrid::{score, BubbleDetector, CircleConfig, DetectConfig, GridConfig, PixelBuffer};
use common::SheetLayout;
use std::collections::BTreeSet;

fn nearest_cell(layout: &SheetLayout, x: i32, y: i32) -> (usize, usize) {
    let col = ((x as f32 - layout.origin_x) / layout.spacing_x).round() as usize;
    let row = ((y as f32 - layout.origin_y) / layout.spacing_y).round() as usize;
    (row, col)
}

#[test]
fn answer_sheet_detects_every_bubble_and_mark() {
    let layout = SheetLayout::answer_sheet();
    let data = layout.render();
    let view = PixelBuffer::from_slice(&data, layout.width, layout.height).unwrap();

    let result = BubbleDetector::new().detect(view).unwrap();

    assert_eq!(result.total_bubbles(), 20);
    assert_eq!(result.filled_bubbles(), 5);
    assert_eq!(result.empty_bubbles(), 15);
    assert_eq!(result.width(), 400);
    assert_eq!(result.height(), 300);

    let filled: BTreeSet<(i32, i32)> = result.filled_marks().map(|m| (m.row, m.col)).collect();
    let expected: BTreeSet<(i32, i32)> = layout
        .filled
        .iter()
        .map(|&(r, c)| (r as i32, c as i32))
        .collect();
    assert_eq!(filled, expected);

    let report = score(result.marks(), &layout.ground_truth());
    assert_eq!(report.accuracy, 1.0);
    assert_eq!(report.false_positives, 0);
    assert_eq!(report.false_negatives, 0);
    assert_eq!(report.duplicate_cells, 0);
}

#[test]
fn coarse_accumulator_grid_keeps_answers() {
    let layout = SheetLayout::answer_sheet();
    let data = layout.render();
    let view = PixelBuffer::from_slice(&data, layout.width, layout.height).unwrap();

    for resolution in [1.5f32, 2.0] {
        let config = DetectConfig {
            circles: CircleConfig {
                accumulator_resolution: resolution,
                ..CircleConfig::default()
            },
            ..DetectConfig::default()
        };
        let result = BubbleDetector::new().with_config(config).detect(view).unwrap();
        assert_eq!(result.total_bubbles(), 20, "dp {resolution}");
        assert_eq!(result.filled_bubbles(), 5, "dp {resolution}");

        let report = score(result.marks(), &layout.ground_truth());
        assert_eq!(report.accuracy, 1.0, "dp {resolution}");
        assert_eq!(report.false_positives, 0);
        assert_eq!(report.false_negatives, 0);
    }
}

#[test]
fn noiseless_grid_forms_dense_rectangle() {
    let layout = SheetLayout::answer_sheet();
    let data = layout.render();
    let view = PixelBuffer::from_slice(&data, layout.width, layout.height).unwrap();
    let result = BubbleDetector::new().detect(view).unwrap();

    assert_eq!(result.total_bubbles(), layout.bubble_count());
    assert_eq!(result.grid_shape(), (layout.rows, layout.cols));

    let cells: BTreeSet<(i32, i32)> = result.marks().iter().map(|m| (m.row, m.col)).collect();
    assert_eq!(cells.len(), layout.bubble_count(), "duplicate cells");
    for row in 0..layout.rows as i32 {
        for col in 0..layout.cols as i32 {
            assert!(cells.contains(&(row, col)), "missing cell ({row}, {col})");
        }
    }

    for mark in result.marks() {
        let (row, col) = nearest_cell(&layout, mark.x, mark.y);
        let (cx, cy) = layout.center(row, col);
        assert!((mark.x as f32 - cx).abs() <= 2.0, "x off: {mark:?}");
        assert!((mark.y as f32 - cy).abs() <= 2.0, "y off: {mark:?}");
        assert_eq!((mark.row, mark.col), (row as i32, col as i32));
        assert!((12..=19).contains(&mark.radius), "radius: {mark:?}");
        assert!((0.0..=1.0).contains(&mark.fill_ratio));
    }
}

#[test]
fn background_speckle_does_not_add_marks() {
    let layout = SheetLayout::answer_sheet();
    let mut data = layout.render();
    layout.add_speckle(&mut data, 150, 7);
    let view = PixelBuffer::from_slice(&data, layout.width, layout.height).unwrap();

    let result = BubbleDetector::new().detect(view).unwrap();
    assert_eq!(result.filled_bubbles(), 5);
    assert_eq!(result.total_bubbles(), 20);

    let report = score(result.marks(), &layout.ground_truth());
    assert_eq!(report.accuracy, 1.0);
}

#[test]
fn zero_sized_image_yields_empty_result() {
    let view = PixelBuffer::from_slice(&[], 0, 0).unwrap();
    let result = BubbleDetector::new().detect(view).unwrap();
    assert_eq!(result.total_bubbles(), 0);
    assert_eq!(result.filled_bubbles(), 0);
    assert_eq!(result.grid_shape(), (0, 0));
}

#[test]
fn blank_page_yields_empty_result() {
    let data = vec![255u8; 200 * 150];
    let view = PixelBuffer::from_slice(&data, 200, 150).unwrap();
    let result = BubbleDetector::new().detect(view).unwrap();
    assert_eq!(result.total_bubbles(), 0);
    assert!(result.marks().is_empty());
}

#[test]
fn sheet_without_marks_has_no_filled_bubbles() {
    let layout = SheetLayout {
        filled: Vec::new(),
        ..SheetLayout::answer_sheet()
    };
    let data = layout.render();
    let view = PixelBuffer::from_slice(&data, layout.width, layout.height).unwrap();
    let result = BubbleDetector::new().detect(view).unwrap();
    assert_eq!(result.total_bubbles(), 20);
    assert_eq!(result.filled_bubbles(), 0);
}

#[test]
fn batch_matches_individual_detection() {
    let layout = SheetLayout::answer_sheet();
    let first = layout.render();
    let second = SheetLayout {
        filled: vec![(0, 0), (4, 3)],
        ..SheetLayout::answer_sheet()
    }
    .render();
    let views = [
        PixelBuffer::from_slice(&first, layout.width, layout.height).unwrap(),
        PixelBuffer::from_slice(&second, layout.width, layout.height).unwrap(),
    ];

    let detector = BubbleDetector::new();
    let batch = detector.detect_batch(&views);
    assert_eq!(batch.len(), 2);
    for (view, res) in views.iter().zip(batch) {
        let res = res.unwrap();
        let single = detector.detect(*view).unwrap();
        assert_eq!(res.marks(), single.marks());
    }
}

#[test]
fn invalid_config_is_reported_before_detection() {
    let data = vec![255u8; 16];
    let view = PixelBuffer::from_slice(&data, 4, 4).unwrap();
    let detector = BubbleDetector::new().with_config(DetectConfig {
        grid: GridConfig {
            row_band_height: 0,
            row_break_threshold: 30,
        },
        ..DetectConfig::default()
    });
    assert!(detector.detect(view).is_err());
}
