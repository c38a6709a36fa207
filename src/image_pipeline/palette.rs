//! Dominant colour extraction module
//!
//! Counts exact RGB values over a raster and ranks them by frequency.

mod extractor;
mod frequency;

pub use extractor::{Palette, PaletteEntry, extract_palette, extract_palette_cancellable};
pub use frequency::ColorFrequencyTable;
