//! Image decoding module
//!
//! Turns user-supplied file bytes into a `RasterImage`, keeping the original
//! encoded bytes around for preview.

mod loader;
mod reader;
mod standard_reader;
pub mod types;


pub use loader::ImageLoader;
pub use reader::ImageReader;
pub use standard_reader::StandardImageReader;
pub use types::{DecodedImage, LoaderConfig, LoaderConfigBuilder, SourceFormat, accepts_mime};
