use thiserror::Error;

#[derive(Error, Debug)]
pub enum AugmentError {
    #[error("image shape mismatch: transform built for {expected_height}x{expected_width}, image is {actual_height}x{actual_width}")]
    ShapeMismatch {
        expected_height: u32,
        expected_width: u32,
        actual_height: u32,
        actual_width: u32,
    },

    #[error("malformed annotation record: {0}")]
    MalformedAnnotation(String),

    #[error("invalid range for {name}: ({min}, {max})")]
    InvalidRange {
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("unsupported task configuration: {0}")]
    UnsupportedTask(String),

    #[error("geometric computation error: {0}")]
    GeometricComputation(String),

    #[error("failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AugmentError>;
