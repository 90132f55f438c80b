//! Brute-force circle voting over an edge map.
//!
//! Work is cut into independent `(radius, row)` shards. Each shard scores every valid
//! center on its row and returns its own candidate list; shard results are concatenated
//! in scan order (radius, then row, then column), so the output order never depends on
//! thread scheduling.

use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::Serialize;

use super::edges::EdgeMap;
use super::grid::Grid;
use super::template::{CircleTemplate, TemplateBank};

/// A scored circle hypothesis, center in edge-map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CircleCandidate {
    pub x: usize,
    pub y: usize,
    pub radius: usize,
    pub score: f64,
}

impl CircleCandidate {
    pub fn new(x: usize, y: usize, radius: usize, score: f64) -> Self {
        Self {
            x,
            y,
            radius,
            score,
        }
    }

    /// `|dx| + |dy|` between centers; radius is ignored.
    pub fn manhattan(&self, other: &CircleCandidate) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn triple(&self) -> (usize, usize, usize) {
        (self.x, self.y, self.radius)
    }
}

/// Optional wall-clock limit for voting.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoteBudget {
    deadline: Option<Instant>,
}

impl VoteBudget {
    pub fn unlimited() -> Self {
        Self { deadline: None }
    }

    pub fn with_time_limit(limit: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(limit),
        }
    }

    pub fn until(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Candidates produced by [`vote`] plus how much work was skipped.
#[derive(Debug, Clone, Default)]
pub struct VoteOutcome {
    pub candidates: Vec<CircleCandidate>,
    pub total_shards: usize,
    pub skipped_shards: usize,
}

impl VoteOutcome {
    /// True when the budget ran out before every shard was scored.
    pub fn truncated(&self) -> bool {
        self.skipped_shards > 0
    }
}

#[derive(Debug, Clone, Copy)]
struct Shard<'a> {
    template: &'a CircleTemplate,
    y: usize,
}

/// Scores every center/radius in `bank` against `edges`.
///
/// A center `(x, y)` is valid for radius `r` when `r <= x < width - r` and
/// `r <= y < height - r`; radii with no valid center contribute nothing. A candidate is
/// emitted when its summed edge value is strictly greater than `threshold`.
pub fn vote(
    edges: &EdgeMap,
    bank: &TemplateBank,
    threshold: f64,
    budget: &VoteBudget,
    parallel: bool,
) -> VoteOutcome {
    let shards = plan_shards(edges.width(), edges.height(), bank);
    let total_shards = shards.len();

    let results: Vec<Option<Vec<CircleCandidate>>> = match edges {
        EdgeMap::Binary(grid) => run_shards(grid, &shards, threshold, budget, parallel),
        EdgeMap::Magnitude(grid) => run_shards(grid, &shards, threshold, budget, parallel),
    };

    let mut outcome = VoteOutcome {
        total_shards,
        ..VoteOutcome::default()
    };
    for result in results {
        match result {
            Some(found) => outcome.candidates.extend(found),
            None => outcome.skipped_shards += 1,
        }
    }

    if outcome.truncated() {
        warn!(
            "voting budget exhausted: {} of {} shards skipped",
            outcome.skipped_shards, outcome.total_shards
        );
    }
    debug!(
        "voting produced {} candidates from {} shards",
        outcome.candidates.len(),
        total_shards
    );
    outcome
}

/// Largest radius with at least one valid center in a `width` x `height` edge map.
pub fn max_fitting_radius(width: usize, height: usize) -> usize {
    width.min(height).saturating_sub(1) / 2
}

fn plan_shards(width: usize, height: usize, bank: &TemplateBank) -> Vec<Shard<'_>> {
    let fits = max_fitting_radius(width, height);
    let mut shards = Vec::new();
    for template in bank.iter() {
        let r = template.radius();
        if template.is_empty() || r > fits {
            debug!("radius {r} has no valid center in a {width}x{height} edge map");
            continue;
        }
        shards.extend((r..height - r).map(|y| Shard { template, y }));
    }
    shards
}

fn run_shards<T>(
    grid: &Grid<T>,
    shards: &[Shard<'_>],
    threshold: f64,
    budget: &VoteBudget,
    parallel: bool,
) -> Vec<Option<Vec<CircleCandidate>>>
where
    T: Copy + Into<f64> + Sync,
{
    let run = |shard: &Shard<'_>| {
        if budget.is_exhausted() {
            None
        } else {
            Some(score_row(grid, shard, threshold))
        }
    };

    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            return shards.par_iter().map(&run).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    shards.iter().map(&run).collect()
}

fn score_row<T>(grid: &Grid<T>, shard: &Shard<'_>, threshold: f64) -> Vec<CircleCandidate>
where
    T: Copy + Into<f64>,
{
    let r = shard.template.radius();
    let offsets = shard.template.offsets();
    let y = shard.y;
    let mut found = Vec::new();

    for x in r..grid.width() - r {
        let mut score = 0.0f64;
        for &(dx, dy) in offsets {
            let sx = (x as isize + dx as isize) as usize;
            let sy = (y as isize + dy as isize) as usize;
            score += grid.at(sx, sy).into();
        }
        if score > threshold {
            found.push(CircleCandidate::new(x, y, r, score));
        }
    }

    found
}
