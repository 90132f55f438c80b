//! Hough-style circle detection on RGB rasters.
//!
//! The numeric pipeline lives in [`circles`]: grayscale conversion, finite-difference
//! edges, circle templates, voting and non-maximum suppression. [`load`] and
//! [`overlay`] adapt decoded images in and rendered results out.

pub mod circles;
pub mod load;
pub mod overlay;

pub use circles::{
    CircleCandidate, CircleConfig, CircleDetection, DetectionError, EdgeMap, GrayscaleGrid,
    PixelGrid, detect_circles,
};
