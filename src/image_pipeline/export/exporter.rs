use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, instrument};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::export::png_writer::PngWriter;
use crate::image_pipeline::export::tiff_writer::TiffWriter;
use crate::image_pipeline::export::types::{ExportConfig, ExportFormat};
use crate::image_pipeline::export::writer::ImageWriter;
use crate::image_pipeline::raster::RasterImage;

pub fn writer_for(format: ExportFormat) -> Box<dyn ImageWriter> {
    match format {
        ExportFormat::Png => Box::new(PngWriter),
        ExportFormat::Tiff => Box::new(TiffWriter),
    }
}

/// Encodes `image` into an in-memory file of the configured format.
#[instrument(skip_all, fields(format = ?config.format, width = image.width(), height = image.height()))]
pub fn encode(image: &RasterImage, config: &ExportConfig) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    writer_for(config.format).write_image(image, &mut buffer, config)?;
    info!("Encoded {} bytes as {}", buffer.len(), config.format.mime_type());
    Ok(buffer)
}

/// Writes `image` to `path`. Nothing is created when the image is empty.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn export_file<P: AsRef<Path>>(image: &RasterImage, path: P, config: &ExportConfig) -> Result<()> {
    let path = path.as_ref();
    image.require_non_empty()?;

    let file = File::create(path).map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
    let mut output = BufWriter::new(file);

    {
        let _write_span = tracing::info_span!("write_file").entered();
        writer_for(config.format).write_image(image, &mut output, config)?;
        output
            .flush()
            .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
    }

    info!("Exported {}x{} image to {}", image.width(), image.height(), path.display());
    Ok(())
}
