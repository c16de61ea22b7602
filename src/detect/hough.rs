//! Function-local Hough accumulator over quantised `(x, y, r)`.
//!
//! Votes live in one flat `u16` array laid out slice-major per radius:
//! `index = (r_idx * rows + cy) * cols + cx`. Every call to the detector
//! builds its own accumulator, so nothing is shared between images.
//!
//! Voting fills one radius slice at a time, which lets the parallel path
//! hand each slice to its own task. Peak extraction box-smooths slices
//! lazily and keeps only the three needed for the 26-neighbour test.

use crate::candidate::CircleCandidate;
use crate::detect::edges::EdgePoint;
use crate::util::{BubbleGridError, BubbleGridResult};

/// Geometry of an accumulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AccumulatorShape {
    pub cols: usize,
    pub rows: usize,
    pub min_radius: u32,
    pub num_radii: usize,
    /// Image pixels per accumulator cell.
    pub resolution: f32,
}

impl AccumulatorShape {
    pub(crate) fn new(
        width: usize,
        height: usize,
        min_radius: u32,
        max_radius: u32,
        resolution: f32,
    ) -> BubbleGridResult<Self> {
        let cols = (width as f32 / resolution).ceil().max(1.0) as usize;
        let rows = (height as f32 / resolution).ceil().max(1.0) as usize;
        let num_radii = (max_radius - min_radius + 1) as usize;
        cols.checked_mul(rows)
            .and_then(|v| v.checked_mul(num_radii))
            .ok_or(BubbleGridError::InvalidDimensions { width, height })?;
        Ok(Self {
            cols,
            rows,
            min_radius,
            num_radii,
            resolution,
        })
    }

    /// Cells in one radius slice.
    #[inline]
    pub(crate) fn slice_len(&self) -> usize {
        self.cols * self.rows
    }

    #[inline]
    fn len(&self) -> usize {
        self.slice_len() * self.num_radii
    }

    #[inline]
    fn index(&self, r_idx: usize, cy: usize, cx: usize) -> usize {
        (r_idx * self.rows + cy) * self.cols + cx
    }
}

/// Casts the votes of every edge point for radius slice `r_idx`.
///
/// `slice` is that radius' `rows * cols` cells. Both sides of the boundary
/// vote; counts saturate instead of wrapping.
pub(crate) fn vote_slice(
    shape: &AccumulatorShape,
    r_idx: usize,
    slice: &mut [u16],
    edges: &[EdgePoint],
) {
    debug_assert_eq!(slice.len(), shape.slice_len());
    let inv_res = 1.0 / shape.resolution;
    let r = (shape.min_radius as usize + r_idx) as f32;
    for edge in edges {
        let ex = edge.x as f32;
        let ey = edge.y as f32;
        for sign in [1.0f32, -1.0] {
            let cx = ((ex + sign * r * edge.dx) * inv_res).round();
            let cy = ((ey + sign * r * edge.dy) * inv_res).round();
            if cx < 0.0 || cy < 0.0 {
                continue;
            }
            let (cx, cy) = (cx as usize, cy as usize);
            if cx >= shape.cols || cy >= shape.rows {
                continue;
            }
            let cell = &mut slice[cy * shape.cols + cx];
            *cell = cell.saturating_add(1);
        }
    }
}

pub(crate) struct Accumulator {
    shape: AccumulatorShape,
    votes: Vec<u16>,
}

impl Accumulator {
    pub(crate) fn new(shape: AccumulatorShape) -> Self {
        Self {
            shape,
            votes: vec![0u16; shape.len()],
        }
    }

    #[cfg_attr(not(feature = "rayon"), allow(dead_code))]
    pub(crate) fn shape(&self) -> AccumulatorShape {
        self.shape
    }

    /// Mutable radius slices, lowest radius first.
    #[cfg_attr(not(feature = "rayon"), allow(dead_code))]
    pub(crate) fn votes_mut(&mut self) -> &mut [u16] {
        &mut self.votes
    }

    /// Votes every edge point at every radius.
    pub(crate) fn vote(&mut self, edges: &[EdgePoint]) {
        let shape = self.shape;
        for (r_idx, slice) in self.votes.chunks_mut(shape.slice_len()).enumerate() {
            vote_slice(&shape, r_idx, slice, edges);
        }
    }

    fn raw_slice(&self, r_idx: usize) -> &[u16] {
        let len = self.shape.slice_len();
        &self.votes[r_idx * len..(r_idx + 1) * len]
    }

    /// Sums one radius slice over a 3x3 cell neighbourhood.
    ///
    /// A true center spreads its votes over adjacent cells because of rounding;
    /// the box sum gathers them back into one peak.
    fn smoothed_slice(&self, r_idx: usize, horiz: &mut [u32]) -> Vec<u32> {
        let AccumulatorShape { cols, rows, .. } = self.shape;
        let slice = self.raw_slice(r_idx);
        for cy in 0..rows {
            let row = &slice[cy * cols..(cy + 1) * cols];
            for cx in 0..cols {
                let lo = cx.saturating_sub(1);
                let hi = (cx + 1).min(cols - 1);
                horiz[cy * cols + cx] = row[lo..=hi].iter().map(|&v| u32::from(v)).sum();
            }
        }
        let mut out = vec![0u32; cols * rows];
        for cy in 0..rows {
            let lo = cy.saturating_sub(1);
            let hi = (cy + 1).min(rows - 1);
            for cx in 0..cols {
                out[cy * cols + cx] = (lo..=hi).map(|yy| horiz[yy * cols + cx]).sum();
            }
        }
        out
    }

    /// Extracts 3D local maxima of the smoothed votes at or above `threshold`.
    ///
    /// Equal smoothed values are ranked by the raw cell votes, then toward the
    /// lowest flat index, so each plateau produces one peak.
    pub(crate) fn peaks(&self, threshold: u32) -> Vec<CircleCandidate> {
        let shape = self.shape;
        let mut horiz = vec![0u32; shape.slice_len()];
        let mut peaks = Vec::new();
        let mut below: Option<Vec<u32>> = None;
        let mut center = self.smoothed_slice(0, &mut horiz);
        for r_idx in 0..shape.num_radii {
            let above = (r_idx + 1 < shape.num_radii)
                .then(|| self.smoothed_slice(r_idx + 1, &mut horiz));
            let window = [below.as_deref(), Some(center.as_slice()), above.as_deref()];
            for cy in 0..shape.rows {
                for cx in 0..shape.cols {
                    let val = center[cy * shape.cols + cx];
                    if val == 0 || val < threshold {
                        continue;
                    }
                    if self.is_local_max(&window, r_idx, cy, cx) {
                        peaks.push(CircleCandidate {
                            x: (cx as f32 * shape.resolution).round() as i32,
                            y: (cy as f32 * shape.resolution).round() as i32,
                            radius: shape.min_radius + r_idx as u32,
                            votes: val,
                        });
                    }
                }
            }
            match above {
                Some(next) => below = Some(std::mem::replace(&mut center, next)),
                None => break,
            }
        }
        peaks
    }

    /// `window` holds the smoothed slices for `r_idx - 1`, `r_idx` and
    /// `r_idx + 1`, `None` past either end of the radius range.
    fn is_local_max(&self, window: &[Option<&[u32]>; 3], r_idx: usize, cy: usize, cx: usize) -> bool {
        let shape = &self.shape;
        let cols = shape.cols;
        let idx = shape.index(r_idx, cy, cx);
        let key = (window[1].map_or(0, |s| s[cy * cols + cx]), self.votes[idx]);
        for (w, smoothed) in window.iter().enumerate() {
            let Some(smoothed) = smoothed else {
                continue;
            };
            let nr = r_idx + w - 1;
            for dy in -1isize..=1 {
                let ny = cy as isize + dy;
                if ny < 0 || ny >= shape.rows as isize {
                    continue;
                }
                for dx in -1isize..=1 {
                    let nx = cx as isize + dx;
                    if nx < 0 || nx >= cols as isize || (w == 1 && dy == 0 && dx == 0) {
                        continue;
                    }
                    let (ny, nx) = (ny as usize, nx as usize);
                    let nidx = shape.index(nr, ny, nx);
                    let nkey = (smoothed[ny * cols + nx], self.votes[nidx]);
                    if nkey > key || (nkey == key && nidx < idx) {
                        return false;
                    }
                }
            }
        }
        true
    }
}
