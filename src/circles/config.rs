use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::DetectionError;
use super::template::SamplingPolicy;

const EDGE_THRESHOLD: f32 = 35.0;
const MIN_RADIUS: usize = 15;
const MAX_RADIUS: usize = 25;
const SAMPLES: usize = 100;
const SCORE_COEFFICIENT: f64 = 50.0;
const SUPPRESSION_DISTANCE: i64 = 5;

/// Full-intensity edge value that the score coefficient is scaled by.
pub const FULL_EDGE: f64 = 255.0;

/// Configuration parameters for circle detection.
///
/// Missing fields fall back to their defaults when deserialised, so a JSON file only needs
/// the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleConfig {
    /// Binarisation threshold for the edge map; `0` keeps raw magnitudes.
    pub edge_threshold: f32,
    /// Smallest radius scanned, inclusive.
    pub min_radius: usize,
    /// Largest radius scanned, inclusive.
    pub max_radius: usize,
    /// Boundary samples per circle template.
    pub samples: usize,
    /// Candidates need a summed score above `score_coefficient * 255`.
    pub score_coefficient: f64,
    /// Manhattan distance under which weaker centers are suppressed.
    pub suppression_distance: i64,
    pub sampling: SamplingPolicy,
    /// Wall-clock limit for voting, in milliseconds.
    pub time_budget_ms: Option<u64>,
    /// Keep only this many top-scoring candidates before suppression.
    pub max_candidates: Option<usize>,
    /// Run voting shards on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            edge_threshold: EDGE_THRESHOLD,
            min_radius: MIN_RADIUS,
            max_radius: MAX_RADIUS,
            samples: SAMPLES,
            score_coefficient: SCORE_COEFFICIENT,
            suppression_distance: SUPPRESSION_DISTANCE,
            sampling: SamplingPolicy::default(),
            time_budget_ms: None,
            max_candidates: None,
            parallel: true,
        }
    }
}

impl CircleConfig {
    pub fn from_json_str(json: &str) -> Result<Self, DetectionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DetectionError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Summed edge value a candidate has to exceed.
    pub fn score_threshold(&self) -> f64 {
        self.score_coefficient * FULL_EDGE
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    /// Checks every parameter; nothing is computed for an invalid configuration.
    pub fn validate(&self) -> Result<(), DetectionError> {
        if !self.edge_threshold.is_finite() || self.edge_threshold < 0.0 {
            return Err(DetectionError::invalid(
                "edge_threshold",
                format!("must be a finite value >= 0, got {}", self.edge_threshold),
            ));
        }
        if self.min_radius == 0 {
            return Err(DetectionError::invalid("min_radius", "must be at least 1"));
        }
        if self.min_radius > self.max_radius {
            return Err(DetectionError::invalid(
                "max_radius",
                format!(
                    "must not be smaller than min_radius ({} < {})",
                    self.max_radius, self.min_radius
                ),
            ));
        }
        if self.samples == 0 {
            return Err(DetectionError::invalid("samples", "must be at least 1"));
        }
        if !self.score_coefficient.is_finite() {
            return Err(DetectionError::invalid(
                "score_coefficient",
                format!("must be finite, got {}", self.score_coefficient),
            ));
        }
        if self.suppression_distance < 0 {
            return Err(DetectionError::invalid(
                "suppression_distance",
                format!("must be >= 0, got {}", self.suppression_distance),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = CircleConfig::default();
        config.validate().unwrap();
        assert_eq!(config.score_threshold(), 50.0 * 255.0);
        assert_eq!((config.min_radius, config.max_radius), (15, 25));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            CircleConfig::from_json_str(r#"{ "edge_threshold": 25, "sampling": "round" }"#)
                .unwrap();
        assert_eq!(config.edge_threshold, 25.0);
        assert_eq!(config.sampling, SamplingPolicy::Round);
        assert_eq!(config.samples, 100);
        assert_eq!(config.suppression_distance, 5);
    }

    #[test]
    fn invalid_parameters_are_named() {
        let cases = [
            (
                CircleConfig {
                    edge_threshold: -1.0,
                    ..CircleConfig::default()
                },
                "edge_threshold",
            ),
            (
                CircleConfig {
                    samples: 0,
                    ..CircleConfig::default()
                },
                "samples",
            ),
            (
                CircleConfig {
                    suppression_distance: -3,
                    ..CircleConfig::default()
                },
                "suppression_distance",
            ),
            (
                CircleConfig {
                    min_radius: 0,
                    ..CircleConfig::default()
                },
                "min_radius",
            ),
            (
                CircleConfig {
                    min_radius: 30,
                    max_radius: 20,
                    ..CircleConfig::default()
                },
                "max_radius",
            ),
        ];
        for (config, expected) in cases {
            match config.validate() {
                Err(DetectionError::InvalidParameter { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected invalid {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            CircleConfig::from_json_str("{ \"samples\": \"many\" }"),
            Err(DetectionError::Config(_))
        ));
    }
}
