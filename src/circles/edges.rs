//! Finite-difference edge detection.
//!
//! Edge pixel `(x, y)` is computed from source pixel `(x + 1, y + 1)` and its upper and
//! left neighbours, so the map is one row and one column smaller than its source.

use super::error::DetectionError;
use super::grid::{GrayscaleGrid, Grid};

/// Source-pixel offset of edge-map coordinates, `(dx, dy)`.
pub const EDGE_ANCHOR_OFFSET: (usize, usize) = (1, 1);

/// Value written for edge pixels in a thresholded map.
pub const EDGE_ON: u8 = 255;

/// Edge magnitudes, binary when a threshold was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeMap {
    /// Thresholded map, every entry is `0` or [`EDGE_ON`].
    Binary(Grid<u8>),
    /// Raw averaged absolute differences.
    Magnitude(Grid<f32>),
}

impl EdgeMap {
    pub fn width(&self) -> usize {
        match self {
            Self::Binary(g) => g.width(),
            Self::Magnitude(g) => g.width(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Self::Binary(g) => g.height(),
            Self::Magnitude(g) => g.height(),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    pub fn value(&self, x: usize, y: usize) -> f32 {
        match self {
            Self::Binary(g) => g.at(x, y) as f32,
            Self::Magnitude(g) => g.at(x, y),
        }
    }

    /// Edge map as 8-bit samples, magnitudes clipped to 255.
    pub fn to_luma8(&self) -> Vec<u8> {
        match self {
            Self::Binary(g) => g.data().to_vec(),
            Self::Magnitude(g) => g.data().iter().map(|&m| m.min(255.0) as u8).collect(),
        }
    }
}

/// Computes the edge map of `gray`.
///
/// `threshold == 0` keeps raw magnitudes; a positive threshold binarises (`< thr` → 0,
/// `>= thr` → 255). Grids smaller than 2x2 and negative or non-finite thresholds are rejected.
pub fn detect_edges(gray: &GrayscaleGrid, threshold: f32) -> Result<EdgeMap, DetectionError> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(DetectionError::invalid(
            "edge_threshold",
            format!("must be a finite value >= 0, got {threshold}"),
        ));
    }
    let (width, height) = (gray.width(), gray.height());
    if width < 2 || height < 2 {
        return Err(DetectionError::InvalidDimensions { width, height });
    }

    let map = if threshold > 0.0 {
        let data = fill_rows(gray, |m| if m < threshold { 0 } else { EDGE_ON });
        EdgeMap::Binary(Grid::from_vec(width - 1, height - 1, data)?)
    } else {
        let data = fill_rows(gray, |m| m);
        EdgeMap::Magnitude(Grid::from_vec(width - 1, height - 1, data)?)
    };
    Ok(map)
}

fn fill_rows<T, F>(gray: &GrayscaleGrid, map: F) -> Vec<T>
where
    T: Copy + Default + Send,
    F: Fn(f32) -> T + Sync,
{
    let out_w = gray.width() - 1;
    let out_h = gray.height() - 1;
    let mut out = vec![T::default(); out_w * out_h];

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        out.par_chunks_mut(out_w)
            .enumerate()
            .for_each(|(y, dst)| edge_row(gray, y, &map, dst));
    }
    #[cfg(not(feature = "parallel"))]
    {
        out.chunks_mut(out_w)
            .enumerate()
            .for_each(|(y, dst)| edge_row(gray, y, &map, dst));
    }

    out
}

fn edge_row<T>(gray: &GrayscaleGrid, y: usize, map: &impl Fn(f32) -> T, dst: &mut [T]) {
    let above = gray.row(y);
    let below = gray.row(y + 1);
    for (x, value) in dst.iter_mut().enumerate() {
        let anchor = below[x + 1] as i16;
        let vertical = (anchor - above[x + 1] as i16).abs();
        let horizontal = (anchor - below[x] as i16).abs();
        *value = map((vertical + horizontal) as f32 / 2.0);
    }
}
