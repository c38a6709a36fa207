//! Raster data module
//!
//! Decoded pixel grids and exact colour values shared by every pipeline stage.

mod color;
pub mod types;

pub use color::Rgb;
pub use types::RasterImage;

/// Rows handed to one rayon task (and checked against a cancel token) at a time.
pub(crate) const BAND_ROWS: usize = 64;
