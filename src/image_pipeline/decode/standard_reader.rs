//! Image reader implementation using the `image` crate.
//!
//! The container format is sniffed from the leading bytes, never from a file
//! name, so a text file renamed to `.png` fails as a decode error.

use std::sync::Arc;

use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::decode::reader::ImageReader;
use crate::image_pipeline::decode::types::{DecodedImage, SourceFormat};
use crate::image_pipeline::raster::RasterImage;

/// Decodes PNG, JPEG, GIF (first frame), WEBP and BMP into RGBA8.
pub struct StandardImageReader;

impl ImageReader for StandardImageReader {
    fn read_image(&self, data: &[u8]) -> Result<DecodedImage> {
        debug!("Decoding image, {} bytes", data.len());

        let detected = image::guess_format(data)
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;
        let format = SourceFormat::from_image_format(detected)
            .ok_or_else(|| PipelineError::UnsupportedFormat(format!("{:?}", detected)))?;

        let decoded = image::load_from_memory_with_format(data, detected)
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;
        let raster = RasterImage::from(decoded.into_rgba8());

        debug!(
            "Decoded {:?} image: {}x{}",
            format,
            raster.width(),
            raster.height()
        );

        Ok(DecodedImage {
            raster,
            format,
            encoded: Arc::from(data),
        })
    }
}
