use kornia::image::ImageError;

/// Errors that can occur while detecting circles.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("grid of {width}x{height} is too small, at least 2x2 is required")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("kornia image error: {0}")]
    Kornia(#[from] ImageError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DetectionError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
