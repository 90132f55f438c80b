//! Rendering detection results back onto images.

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;

use crate::circles::{DetectionError, EdgeMap};

pub const OUTLINE_RED: Rgb<u8> = Rgb([255, 0, 0]);

/// Draws a one-pixel outline for every `(x, y, radius)` on a copy of `source`.
pub fn draw_circles(
    source: &DynamicImage,
    circles: &[(usize, usize, usize)],
    color: Rgb<u8>,
) -> RgbImage {
    let mut canvas = source.to_rgb8();
    for &(x, y, r) in circles {
        draw_hollow_circle_mut(&mut canvas, (x as i32, y as i32), r as i32, color);
    }
    canvas
}

/// Edge map as an 8-bit grayscale image, magnitudes clipped to 255.
pub fn edge_map_image(edges: &EdgeMap) -> Result<GrayImage, DetectionError> {
    let (width, height) = (edges.width(), edges.height());
    let data = edges.to_luma8();
    let len = data.len();
    GrayImage::from_raw(width as u32, height as u32, data).ok_or(DetectionError::Shape {
        expected: width * height,
        actual: len,
    })
}
