//! Synthetic answer-sheet rendering shared by the integration tests.
#![allow(dead_code)]

use bubblegrid::GroundTruthEntry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const PAPER: u8 = 255;
pub const INK: u8 = 40;
pub const PENCIL: u8 = 30;

/// Layout of a rectangular bubble grid on a blank page.
#[derive(Clone, Debug)]
pub struct SheetLayout {
    pub width: usize,
    pub height: usize,
    pub rows: usize,
    pub cols: usize,
    pub origin_x: f32,
    pub origin_y: f32,
    pub spacing_x: f32,
    pub spacing_y: f32,
    /// Radius of the printed outline's center line.
    pub radius: f32,
    /// Cells marked with pencil, as `(row, col)`.
    pub filled: Vec<(usize, usize)>,
}

impl SheetLayout {
    /// 400x300 page, 5 rows x 4 columns on a 50px pitch, 5 answers marked.
    pub fn answer_sheet() -> Self {
        Self {
            width: 400,
            height: 300,
            rows: 5,
            cols: 4,
            origin_x: 125.0,
            origin_y: 75.0,
            spacing_x: 50.0,
            spacing_y: 50.0,
            radius: 15.0,
            filled: vec![(0, 1), (1, 3), (2, 0), (3, 2), (4, 1)],
        }
    }

    pub fn center(&self, row: usize, col: usize) -> (f32, f32) {
        (
            self.origin_x + col as f32 * self.spacing_x,
            self.origin_y + row as f32 * self.spacing_y,
        )
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.filled.contains(&(row, col))
    }

    pub fn bubble_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Renders the sheet: 3px outlines for every bubble, solid disks for marks.
    pub fn render(&self) -> Vec<u8> {
        let mut data = vec![PAPER; self.width * self.height];
        for row in 0..self.rows {
            for col in 0..self.cols {
                let (cx, cy) = self.center(row, col);
                let filled = self.is_filled(row, col);
                let reach = (self.radius + 3.0) as i64;
                for dy in -reach..=reach {
                    for dx in -reach..=reach {
                        let x = cx as i64 + dx;
                        let y = cy as i64 + dy;
                        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
                            continue;
                        }
                        let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
                        let idx = y as usize * self.width + x as usize;
                        if filled && d <= self.radius + 1.5 {
                            data[idx] = PENCIL;
                        } else if (d - self.radius).abs() <= 1.5 {
                            data[idx] = INK;
                        }
                    }
                }
            }
        }
        data
    }

    /// Sprinkles light-gray specks (intensity >= 180) on the background.
    ///
    /// Specks stay at least `radius + 10` px away from every bubble center.
    pub fn add_speckle(&self, data: &mut [u8], count: usize, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let keep_out = self.radius + 10.0;
        let mut placed = 0;
        while placed < count {
            let x = rng.random_range(0..self.width - 1);
            let y = rng.random_range(0..self.height - 1);
            let near_bubble = (0..self.rows).any(|row| {
                (0..self.cols).any(|col| {
                    let (cx, cy) = self.center(row, col);
                    ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt() < keep_out
                })
            });
            if near_bubble {
                continue;
            }
            let value: u8 = rng.random_range(180..=230);
            let size = rng.random_range(1..=2);
            for sy in 0..size {
                for sx in 0..size {
                    data[(y + sy) * self.width + x + sx] = value;
                }
            }
            placed += 1;
        }
    }

    /// Ground truth covering every cell of the grid.
    pub fn ground_truth(&self) -> Vec<GroundTruthEntry> {
        let mut truth = Vec::with_capacity(self.bubble_count());
        for row in 0..self.rows {
            for col in 0..self.cols {
                truth.push(GroundTruthEntry {
                    row: row as i32,
                    col: col as i32,
                    is_filled: self.is_filled(row, col),
                });
            }
        }
        truth
    }
}
