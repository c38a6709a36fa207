use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("File is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { size: usize, limit: usize },

    #[error("Invalid {name} value {value}: expected {min}..={max}")]
    InvalidSetting {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("No image to process")]
    EmptyInput,

    #[error("Operation superseded by a newer request")]
    Cancelled,

    #[error("Background job '{0}' panicked: {1}")]
    JobPanicked(String, String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    /// Errors that only arise from transient states (nothing loaded yet, a request
    /// replaced by a newer one) and are dropped instead of shown to the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, PipelineError::EmptyInput | PipelineError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
