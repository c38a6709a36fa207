//! Common utilities module
//!
//! Shared error type used by every stage of the pixel pipeline.

pub mod error;

pub use error::{PipelineError, Result};
