//! Live adjustment module
//!
//! Brightness, contrast, grayscale and blur applied as one filter chain over an
//! untouched source raster.

mod filters;
mod preview;
pub mod settings;

pub use filters::{apply_adjustments, apply_adjustments_cancellable, gaussian_blur};
pub use preview::{AdjustmentPreview, PreviewState};
pub use settings::AdjustmentSettings;
