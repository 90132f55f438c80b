//! Greedy non-maximum suppression of circle candidates.
//!
//! Candidates are ordered by score, highest first, with a stable sort: among equal scores
//! the candidate that came earlier in the input (scan order, for voting output)
//! is considered first and wins.

use super::vote::CircleCandidate;

fn sort_by_score(candidates: &mut [CircleCandidate]) {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Keeps the `k` best candidates, ordered by descending score.
pub fn keep_strongest(mut candidates: Vec<CircleCandidate>, k: usize) -> Vec<CircleCandidate> {
    sort_by_score(&mut candidates);
    candidates.truncate(k);
    candidates
}

/// Accepts candidates in descending score order, dropping any whose center lies within
/// Manhattan `distance` of an already accepted center.
pub fn suppress(mut candidates: Vec<CircleCandidate>, distance: usize) -> Vec<CircleCandidate> {
    sort_by_score(&mut candidates);

    let mut accepted: Vec<CircleCandidate> = Vec::new();
    for candidate in candidates {
        if accepted.iter().all(|a| a.manhattan(&candidate) > distance) {
            accepted.push(candidate);
        }
    }
    accepted
}
