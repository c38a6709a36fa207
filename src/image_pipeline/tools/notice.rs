//! Translation of pipeline errors into user-facing notices

use std::fmt;

use crate::image_pipeline::common::error::PipelineError;
use crate::image_pipeline::decode::SourceFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A toast-sized message: short title, one sentence of detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

fn accepted_types() -> String {
    SourceFormat::ALL
        .iter()
        .map(|format| format.mime_type())
        .collect::<Vec<_>>()
        .join(", ")
}

fn megabytes(bytes: usize) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}

impl Notice {
    fn error(title: &str, message: String) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.to_string(),
            message,
        }
    }

    /// `None` for errors that are never shown (nothing loaded yet, superseded work).
    pub fn from_error(error: &PipelineError) -> Option<Self> {
        if error.is_silent() {
            return None;
        }

        let notice = match error {
            PipelineError::DecodeError(_) => Self::error(
                "Couldn't read image",
                format!("The file is not a valid image. Accepted types: {}.", accepted_types()),
            ),
            PipelineError::UnsupportedFormat(format) => Self::error(
                "Unsupported file type",
                format!("{} images are not supported. Accepted types: {}.", format, accepted_types()),
            ),
            PipelineError::FileTooLarge { size, limit } => Self::error(
                "File too large",
                format!("The file is {}, the limit is {}.", megabytes(*size), megabytes(*limit)),
            ),
            PipelineError::InvalidDimensions(width, height) => Self::error(
                "Invalid image size",
                format!("An image of {}x{} pixels cannot be processed.", width, height),
            ),
            PipelineError::InvalidSetting { name, min, max, .. } => Self {
                level: NoticeLevel::Warning,
                title: "Setting out of range".to_string(),
                message: format!("{} must be between {} and {}.", name, min, max),
            },
            PipelineError::InputReadError(_) | PipelineError::IoError(_) => {
                Self::error("Couldn't open file", error.to_string())
            }
            PipelineError::OutputWriteError(_) | PipelineError::EncodeError(_) => {
                Self::error("Download failed", error.to_string())
            }
            PipelineError::BufferSizeMismatch { .. } | PipelineError::JobPanicked(..) => {
                Self::error("Processing failed", error.to_string())
            }
            PipelineError::EmptyInput | PipelineError::Cancelled => return None,
        };
        Some(notice)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}
