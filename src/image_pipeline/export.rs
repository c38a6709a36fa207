//! Image export module
//!
//! Re-encodes a rendered raster for download, PNG by default, TIFF on request.

mod exporter;
mod png_writer;
mod tiff_writer;
pub mod types;
mod writer;


pub use exporter::{encode, export_file, writer_for};
pub use png_writer::PngWriter;
pub use tiff_writer::TiffWriter;
pub use types::{ExportConfig, ExportConfigBuilder, ExportFormat, PngCompression, TiffCompression};
pub use writer::ImageWriter;
