use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// How continuous boundary samples are snapped to integer offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingPolicy {
    /// Truncate toward zero. Small radii repeat offsets, which weights those positions more.
    #[default]
    Truncate,
    /// Round to the nearest integer.
    Round,
    /// Truncate, then drop repeated offsets keeping the first occurrence.
    TruncateDedup,
}

impl SamplingPolicy {
    fn snap(self, v: f64) -> i32 {
        match self {
            Self::Truncate | Self::TruncateDedup => v as i32,
            Self::Round => v.round() as i32,
        }
    }
}

/// Offsets sampling the boundary of a circle of a given radius.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircleTemplate {
    radius: usize,
    offsets: Vec<(i32, i32)>,
}

impl CircleTemplate {
    /// Samples `samples` angles `2π·i/samples`, `i` in `0..samples`.
    pub fn generate(radius: usize, samples: usize, policy: SamplingPolicy) -> Self {
        let r = radius as f64;
        let mut offsets: Vec<(i32, i32)> = (0..samples)
            .map(|i| {
                let theta = TAU * i as f64 / samples as f64;
                (policy.snap(r * theta.cos()), policy.snap(r * theta.sin()))
            })
            .collect();

        if policy == SamplingPolicy::TruncateDedup {
            let mut seen = std::collections::HashSet::with_capacity(offsets.len());
            offsets.retain(|o| seen.insert(*o));
        }

        Self { radius, offsets }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Templates for every radius of an inclusive range, built once per run.
#[derive(Debug, Clone)]
pub struct TemplateBank {
    templates: Vec<CircleTemplate>,
}

impl TemplateBank {
    pub fn build(
        min_radius: usize,
        max_radius: usize,
        samples: usize,
        policy: SamplingPolicy,
    ) -> Self {
        let templates = (min_radius..=max_radius)
            .map(|r| CircleTemplate::generate(r, samples, policy))
            .collect();
        Self { templates }
    }

    /// Templates in ascending radius order.
    pub fn iter(&self) -> impl Iterator<Item = &CircleTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
