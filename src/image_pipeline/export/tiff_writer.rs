use std::io::{Cursor, Write};

use tiff::encoder::TiffEncoder;
use tiff::encoder::colortype::RGBA8;
use tiff::encoder::compression::DeflateLevel;
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::export::types::{ExportConfig, TiffCompression};
use crate::image_pipeline::export::writer::ImageWriter;
use crate::image_pipeline::raster::RasterImage;

/// RGBA8 TIFF. The encoder needs `Seek`, so the file is assembled in memory.
pub struct TiffWriter;

impl ImageWriter for TiffWriter {
    fn write_image(&self, image: &RasterImage, output: &mut dyn Write, config: &ExportConfig) -> Result<()> {
        image.require_non_empty()?;
        let (width, height) = image.dimensions_u32()?;
        debug!("Encoding TIFF image: {}x{}", width, height);

        let mut buffer = Vec::new();

        let compression = match config.tiff_compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(DeflateLevel::Best),
        };

        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if config.tiff_predictor && !matches!(config.tiff_compression, TiffCompression::None) {
            encoder = encoder.with_predictor(tiff::tags::Predictor::Horizontal);
        }

        encoder
            .write_image::<RGBA8>(width, height, image.as_raw())
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
