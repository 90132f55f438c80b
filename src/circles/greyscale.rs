use super::grid::{GrayscaleGrid, Grid, PixelGrid};

/// Euclidean norm of an RGB sample, truncated and saturated to `u8`.
///
/// Near-white pixels clip to 255; `(3, 4, 0)` maps to exactly 5.
#[inline]
pub fn intensity(r: u8, g: u8, b: u8) -> u8 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    let norm = ((r * r + g * g + b * b) as f64).sqrt();
    norm.min(255.0) as u8
}

/// Collapses an RGB grid to single-channel intensity.
pub fn to_grayscale(pixels: &PixelGrid) -> GrayscaleGrid {
    let width = pixels.width();
    let height = pixels.height();
    let mut out = vec![0u8; width * height];

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        out.par_chunks_mut(width)
            .zip(pixels.data().par_chunks(width * 3))
            .for_each(|(dst, src)| convert_row(src, dst));
    }
    #[cfg(not(feature = "parallel"))]
    {
        out.chunks_mut(width)
            .zip(pixels.data().chunks(width * 3))
            .for_each(|(dst, src)| convert_row(src, dst));
    }

    Grid::from_vec(width, height, out).expect("grayscale buffer matches source dimensions")
}

fn convert_row(src: &[u8], dst: &mut [u8]) {
    for (px, value) in src.chunks_exact(3).zip(dst.iter_mut()) {
        *value = intensity(px[0], px[1], px[2]);
    }
}
