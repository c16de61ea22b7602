//! Greedy center-distance suppression.

use crate::candidate::CircleCandidate;
use std::cmp::Ordering;

fn candidate_cmp_desc(a: &CircleCandidate, b: &CircleCandidate) -> Ordering {
    b.votes
        .cmp(&a.votes)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
        .then_with(|| a.radius.cmp(&b.radius))
}

/// Sorts candidates by descending votes with deterministic tie-breaking.
pub(crate) fn sort_candidates_desc(candidates: &mut [CircleCandidate]) {
    candidates.sort_by(candidate_cmp_desc);
}

/// Keeps the strongest candidates whose centers are at least `min_distance`
/// apart.
///
/// Candidates are visited strongest first; one is dropped when its center lies
/// strictly closer than `min_distance` to a candidate already kept.
pub fn suppress_close(candidates: &mut [CircleCandidate], min_distance: f32) -> Vec<CircleCandidate> {
    sort_candidates_desc(candidates);
    if min_distance <= 0.0 {
        return candidates.to_owned();
    }

    let min_dist_sq = f64::from(min_distance) * f64::from(min_distance);
    let mut kept: Vec<CircleCandidate> = Vec::new();
    'outer: for cand in candidates.iter().copied() {
        for kept_cand in kept.iter() {
            if (cand.center_dist_sq(kept_cand) as f64) < min_dist_sq {
                continue 'outer;
            }
        }
        kept.push(cand);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(x: i32, y: i32, radius: u32, votes: u32) -> CircleCandidate {
        CircleCandidate {
            x,
            y,
            radius,
            votes,
        }
    }

    #[test]
    fn strongest_candidate_wins_inside_radius() {
        let mut cands = vec![cand(10, 10, 12, 40), cand(14, 10, 15, 90), cand(60, 10, 12, 35)];
        let kept = suppress_close(&mut cands, 20.0);
        assert_eq!(kept, vec![cand(14, 10, 15, 90), cand(60, 10, 12, 35)]);
    }

    #[test]
    fn exact_min_distance_is_kept() {
        let mut cands = vec![cand(0, 0, 10, 50), cand(20, 0, 10, 50)];
        let kept = suppress_close(&mut cands, 20.0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn ties_are_ordered_by_position() {
        let mut cands = vec![cand(30, 5, 10, 7), cand(10, 5, 10, 7), cand(0, 9, 10, 7)];
        let kept = suppress_close(&mut cands, 0.0);
        assert_eq!(kept, vec![cand(10, 5, 10, 7), cand(30, 5, 10, 7), cand(0, 9, 10, 7)]);
    }
}
