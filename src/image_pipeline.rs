//! Raster image pipeline
//!
//! Decodes an uploaded image into an RGBA raster, then either simulates colour
//! vision deficiencies, extracts a dominant-colour palette or applies live
//! adjustments, with background jobs for the pixel work and re-encoding for
//! download.

pub mod adjust;
pub mod common;
pub mod decode;
pub mod export;
pub mod jobs;
pub mod palette;
pub mod raster;
pub mod simulate;
pub mod tools;

pub use common::{
    PipelineError,
    Result,
};

pub use raster::{
    RasterImage,
    Rgb,
};

pub use decode::{
    DecodedImage,
    ImageLoader,
    ImageReader,
    LoaderConfig,
    SourceFormat,
    StandardImageReader,
};

pub use simulate::{
    ColorTransformMatrix,
    SimulationMode,
    simulate,
    transform,
};

pub use palette::{
    Palette,
    PaletteEntry,
    extract_palette,
};

pub use adjust::{
    AdjustmentPreview,
    AdjustmentSettings,
    PreviewState,
    apply_adjustments,
};

pub use jobs::{
    CancelToken,
    JobRunner,
    RequestId,
};

pub use export::{
    ExportConfig,
    ExportFormat,
    ImageWriter,
};

pub use tools::{
    Notice,
    SessionConfig,
    ToolOutput,
    ToolSession,
};
