use std::time::Instant;

use log::debug;
use serde::Serialize;

use super::config::CircleConfig;
use super::edges::{EDGE_ANCHOR_OFFSET, detect_edges};
use super::error::DetectionError;
use super::greyscale::to_grayscale;
use super::grid::{GrayscaleGrid, PixelGrid};
use super::suppress::{keep_strongest, suppress};
use super::template::TemplateBank;
use super::vote::{CircleCandidate, VoteBudget, max_fitting_radius, vote};

/// Result of a detection run.
///
/// Circle centers are in edge-map coordinates; [`CircleDetection::image_triples`] and
/// [`CircleDetection::report`] shift them back onto the source image.
#[derive(Debug, Clone)]
pub struct CircleDetection {
    pub circles: Vec<CircleCandidate>,
    pub raw_candidates: usize,
    pub skipped_shards: usize,
    pub edge_width: usize,
    pub edge_height: usize,
}

impl CircleDetection {
    /// True when the voting budget ran out and some centers were never scored.
    pub fn truncated(&self) -> bool {
        self.skipped_shards > 0
    }

    /// `(x, y, radius)` in edge-map coordinates, highest score first.
    pub fn triples(&self) -> Vec<(usize, usize, usize)> {
        self.circles.iter().map(CircleCandidate::triple).collect()
    }

    /// `(x, y, radius)` in source-image coordinates, highest score first.
    pub fn image_triples(&self) -> Vec<(usize, usize, usize)> {
        let (ox, oy) = EDGE_ANCHOR_OFFSET;
        self.circles
            .iter()
            .map(|c| (c.x + ox, c.y + oy, c.radius))
            .collect()
    }

    pub fn report(&self) -> DetectionReport {
        let (ox, oy) = EDGE_ANCHOR_OFFSET;
        DetectionReport {
            circles: self
                .circles
                .iter()
                .map(|c| ReportedCircle {
                    x: c.x + ox,
                    y: c.y + oy,
                    radius: c.radius,
                    score: c.score,
                })
                .collect(),
            raw_candidates: self.raw_candidates,
            skipped_shards: self.skipped_shards,
            truncated: self.truncated(),
            edge_width: self.edge_width,
            edge_height: self.edge_height,
        }
    }
}

/// A detected circle in source-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportedCircle {
    pub x: usize,
    pub y: usize,
    pub radius: usize,
    pub score: f64,
}

/// Serialisable summary of a [`CircleDetection`], centers in source-image coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    pub circles: Vec<ReportedCircle>,
    pub raw_candidates: usize,
    pub skipped_shards: usize,
    pub truncated: bool,
    pub edge_width: usize,
    pub edge_height: usize,
}

/// Runs the full pipeline on an RGB grid.
pub fn detect_circles(
    pixels: &PixelGrid,
    config: &CircleConfig,
) -> Result<CircleDetection, DetectionError> {
    config.validate()?;
    let start = Instant::now();
    let gray = to_grayscale(pixels);
    debug!(
        "grayscale {}x{} in {:?}",
        gray.width(),
        gray.height(),
        start.elapsed()
    );
    detect_circles_in_gray(&gray, config)
}

/// Runs the pipeline from an existing intensity grid.
pub fn detect_circles_in_gray(
    gray: &GrayscaleGrid,
    config: &CircleConfig,
) -> Result<CircleDetection, DetectionError> {
    config.validate()?;

    let start = Instant::now();
    let edges = detect_edges(gray, config.edge_threshold)?;
    debug!(
        "edge map {}x{} (binary: {}) in {:?}",
        edges.width(),
        edges.height(),
        edges.is_binary(),
        start.elapsed()
    );

    let budget = config
        .time_budget()
        .map(VoteBudget::with_time_limit)
        .unwrap_or_default();

    let fits = max_fitting_radius(edges.width(), edges.height());
    let max_radius = config.max_radius.min(fits);
    if max_radius < config.max_radius {
        debug!(
            "max radius {} clamped to {max_radius} for a {}x{} edge map",
            config.max_radius,
            edges.width(),
            edges.height()
        );
    }

    let start = Instant::now();
    let bank = TemplateBank::build(config.min_radius, max_radius, config.samples, config.sampling);
    if bank.is_empty() {
        debug!(
            "no radius in {}..={} fits the edge map",
            config.min_radius, config.max_radius
        );
    }
    let outcome = vote(
        &edges,
        &bank,
        config.score_threshold(),
        &budget,
        config.parallel,
    );
    debug!(
        "voted {} radii from {} in {:?}",
        bank.len(),
        config.min_radius,
        start.elapsed()
    );

    let raw_candidates = outcome.candidates.len();
    let mut candidates = outcome.candidates;
    if let Some(k) = config.max_candidates
        && raw_candidates > k
    {
        candidates = keep_strongest(candidates, k);
        debug!("kept strongest {k} of {raw_candidates} candidates");
    }

    // validate() guarantees a non-negative distance
    let circles = suppress(candidates, config.suppression_distance as usize);
    debug!(
        "suppression kept {} of {} candidates",
        circles.len(),
        raw_candidates
    );

    Ok(CircleDetection {
        circles,
        raw_candidates,
        skipped_shards: outcome.skipped_shards,
        edge_width: edges.width(),
        edge_height: edges.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_grid_is_rejected() {
        let pixels = PixelGrid::from_raw(1, 5, vec![0; 15]).unwrap();
        assert!(matches!(
            detect_circles(&pixels, &CircleConfig::default()),
            Err(DetectionError::InvalidDimensions {
                width: 1,
                height: 5
            })
        ));
    }

    #[test]
    fn invalid_config_fails_before_work() {
        let pixels = PixelGrid::from_raw(1, 1, vec![0; 3]).unwrap();
        let config = CircleConfig {
            samples: 0,
            ..CircleConfig::default()
        };
        assert!(matches!(
            detect_circles(&pixels, &config),
            Err(DetectionError::InvalidParameter {
                name: "samples",
                ..
            })
        ));
    }

    #[test]
    fn blank_image_has_no_circles() {
        let pixels = PixelGrid::from_fn(64, 64, |_, _| [90, 90, 90]).unwrap();
        let detection = detect_circles(&pixels, &CircleConfig::default()).unwrap();
        assert!(detection.circles.is_empty());
        assert_eq!(detection.raw_candidates, 0);
        assert_eq!((detection.edge_width, detection.edge_height), (63, 63));
        assert!(!detection.truncated());
    }

    #[test]
    fn small_image_with_large_radii_is_empty_not_error() {
        let pixels = PixelGrid::from_fn(20, 20, |x, _| if x < 10 { [0; 3] } else { [255; 3] })
            .unwrap();
        let detection = detect_circles(&pixels, &CircleConfig::default()).unwrap();
        assert!(detection.circles.is_empty());
    }

    #[test]
    fn image_triples_shift_by_anchor() {
        let detection = CircleDetection {
            circles: vec![CircleCandidate::new(10, 12, 15, 1.0)],
            raw_candidates: 1,
            skipped_shards: 0,
            edge_width: 40,
            edge_height: 40,
        };
        assert_eq!(detection.triples(), vec![(10, 12, 15)]);
        assert_eq!(detection.image_triples(), vec![(11, 13, 15)]);
    }

    #[test]
    fn json_report_uses_image_coordinates() {
        let detection = CircleDetection {
            circles: vec![
                CircleCandidate::new(49, 49, 21, 16320.0),
                CircleCandidate::new(10, 30, 15, 13000.0),
            ],
            raw_candidates: 7,
            skipped_shards: 2,
            edge_width: 99,
            edge_height: 99,
        };
        let json = serde_json::to_value(detection.report()).unwrap();

        let circles = json["circles"].as_array().unwrap();
        let from_json: Vec<(usize, usize, usize)> = circles
            .iter()
            .map(|c| {
                (
                    c["x"].as_u64().unwrap() as usize,
                    c["y"].as_u64().unwrap() as usize,
                    c["radius"].as_u64().unwrap() as usize,
                )
            })
            .collect();
        assert_eq!(from_json, detection.image_triples());
        assert_eq!(circles[0]["score"], 16320.0);
        assert_eq!(json["truncated"], true);
        assert_eq!(json["skipped_shards"], 2);
        assert_eq!(json["raw_candidates"], 7);
    }

    #[test]
    fn oversized_max_radius_is_clamped() {
        let pixels = PixelGrid::from_fn(64, 64, |x, y| {
            let (dx, dy) = (x as i64 - 32, y as i64 - 32);
            if dx * dx + dy * dy <= 20 * 20 { [255; 3] } else { [0; 3] }
        })
        .unwrap();
        let fitting = CircleConfig {
            max_radius: 31,
            ..CircleConfig::default()
        };
        let huge = CircleConfig {
            max_radius: usize::MAX,
            ..CircleConfig::default()
        };
        let expected = detect_circles(&pixels, &fitting).unwrap();
        let clamped = detect_circles(&pixels, &huge).unwrap();
        assert!(!expected.circles.is_empty());
        assert_eq!(clamped.circles, expected.circles);
        assert_eq!(clamped.raw_candidates, expected.raw_candidates);
    }

    #[test]
    fn min_radius_beyond_image_is_empty() {
        let pixels = PixelGrid::from_fn(30, 30, |_, _| [0; 3]).unwrap();
        let config = CircleConfig {
            min_radius: 1_000_000,
            max_radius: usize::MAX,
            ..CircleConfig::default()
        };
        let detection = detect_circles(&pixels, &config).unwrap();
        assert!(detection.circles.is_empty());
        assert!(!detection.truncated());
    }
}
