pub mod config;
pub mod edges;
pub mod error;
pub mod greyscale;
pub mod grid;
pub mod pipeline;
pub mod suppress;
pub mod template;
pub mod vote;

pub use config::CircleConfig;
pub use edges::{EDGE_ANCHOR_OFFSET, EdgeMap, detect_edges};
pub use error::DetectionError;
pub use greyscale::{intensity, to_grayscale};
pub use grid::{GrayscaleGrid, Grid, PixelGrid};
pub use pipeline::{
    CircleDetection, DetectionReport, ReportedCircle, detect_circles, detect_circles_in_gray,
};
pub use suppress::{keep_strongest, suppress};
pub use template::{CircleTemplate, SamplingPolicy, TemplateBank};
pub use vote::{CircleCandidate, VoteBudget, VoteOutcome, max_fitting_radius, vote};
