//! Decoding images into [`PixelGrid`]s.

use std::path::Path;

use image::DynamicImage;
use kornia::image::{Image, ImageSize, allocator::CpuAllocator};
use kornia::io::functional as F;

use crate::circles::{DetectionError, PixelGrid};

type CpuImage<T, const C: usize> = Image<T, C, CpuAllocator>;

/// Reads any image format kornia understands as 8-bit RGB.
pub fn read_pixel_grid(path: impl AsRef<Path>) -> Result<PixelGrid, DetectionError> {
    let path = path.as_ref();
    let image: CpuImage<u8, 3> =
        F::read_image_any_rgb8(path).map_err(|e| DetectionError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    log::debug!(
        "loaded {} ({}x{})",
        path.display(),
        image.size().width,
        image.size().height
    );
    PixelGrid::from_kornia(&image)
}

/// Converts an already decoded image, dropping any alpha channel.
pub fn pixel_grid_from_image(source: &DynamicImage) -> Result<PixelGrid, DetectionError> {
    let rgb = source.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectionError::InvalidDimensions {
            width: width as usize,
            height: height as usize,
        });
    }
    let image = CpuImage::<u8, 3>::new(
        ImageSize {
            width: width as usize,
            height: height as usize,
        },
        rgb.into_raw(),
        CpuAllocator,
    )?;
    PixelGrid::from_kornia(&image)
}
