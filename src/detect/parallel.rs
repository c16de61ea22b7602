//! Radius-sliced parallel voting (feature-gated).
//!
//! Each task owns one radius slice of the shared accumulator and casts the
//! votes of every edge point for that radius. Slices are disjoint, so there
//! is nothing to merge and memory stays at a single accumulator. The result
//! is identical to sequential voting.

use crate::detect::edges::EdgePoint;
use crate::detect::hough::{vote_slice, Accumulator};
use rayon::prelude::*;

pub(crate) fn vote_radii(acc: &mut Accumulator, edges: &[EdgePoint]) {
    let shape = acc.shape();
    acc.votes_mut()
        .par_chunks_mut(shape.slice_len())
        .enumerate()
        .for_each(|(r_idx, slice)| vote_slice(&shape, r_idx, slice, edges));
}
