use thiserror::Error;

/// Everything that can go wrong while turning pixels into a palette.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// The pixel buffer does not hold exactly `width * height` RGBA pixels.
    #[error("invalid pixel buffer: expected {expected} bytes, got {actual}")]
    InvalidInput { expected: usize, actual: usize },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Clustering or quantization was asked to reduce an empty color set.
    #[error("no opaque colors available for {stage}")]
    InsufficientData { stage: &'static str },

    #[error("invalid hex color `{0}`")]
    InvalidHex(String),

    #[error("unable to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}

impl PaletteError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        PaletteError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = PaletteError> = std::result::Result<T, E>;
