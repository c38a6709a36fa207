use std::io::Write;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::export::types::{ExportConfig, PngCompression};
use crate::image_pipeline::export::writer::ImageWriter;
use crate::image_pipeline::raster::RasterImage;

/// RGBA8 PNG, streamed straight to the output.
pub struct PngWriter;

impl ImageWriter for PngWriter {
    fn write_image(&self, image: &RasterImage, output: &mut dyn Write, config: &ExportConfig) -> Result<()> {
        image.require_non_empty()?;
        let (width, height) = image.dimensions_u32()?;
        debug!("Encoding PNG image: {}x{}", width, height);

        let compression = match config.png_compression {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        };

        PngEncoder::new_with_quality(output, compression, FilterType::Adaptive)
            .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        debug!("PNG encoding complete");
        Ok(())
    }
}
