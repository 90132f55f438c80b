use kornia::image::{Image, allocator::CpuAllocator};

use super::error::DetectionError;

type CpuImage<T, const C: usize> = Image<T, C, CpuAllocator>;

/// Row-major single-channel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Single-channel intensity image derived from a [`PixelGrid`].
pub type GrayscaleGrid = Grid<u8>;

impl<T> Grid<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, DetectionError> {
        let expected = checked_len(width, height, 1, data.len())?;
        if data.len() != expected {
            return Err(DetectionError::Shape {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
}

impl<T: Copy> Grid<T> {
    /// Unchecked-by-contract access; panics on out-of-range coordinates.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }
}

/// Decoded RGB raster, three interleaved `u8` samples per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wraps an interleaved RGB buffer. Empty grids are rejected.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, DetectionError> {
        if width == 0 || height == 0 {
            return Err(DetectionError::InvalidDimensions { width, height });
        }
        let expected = checked_len(width, height, 3, data.len())?;
        if data.len() != expected {
            return Err(DetectionError::Shape {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a grid where every cell is produced by `f(x, y)`.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> [u8; 3],
    ) -> Result<Self, DetectionError> {
        let mut data = Vec::with_capacity(width.saturating_mul(height).saturating_mul(3));
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::from_raw(width, height, data)
    }

    pub fn from_kornia(image: &CpuImage<u8, 3>) -> Result<Self, DetectionError> {
        let size = image.size();
        Self::from_raw(size.width, size.height, image.as_slice().to_vec())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let idx = (y * self.width + x) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

fn checked_len(
    width: usize,
    height: usize,
    channels: usize,
    actual: usize,
) -> Result<usize, DetectionError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(DetectionError::Shape {
            expected: usize::MAX,
            actual,
        })
}
