use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::image_pipeline::adjust::{AdjustmentSettings, apply_adjustments_cancellable};
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::decode::{DecodedImage, ImageLoader, ImageReader, StandardImageReader};
use crate::image_pipeline::export::{self, ExportConfig};
use crate::image_pipeline::jobs::{JobOutcome, JobRunner, RequestId};
use crate::image_pipeline::palette::extract_palette_cancellable;
use crate::image_pipeline::raster::RasterImage;
use crate::image_pipeline::simulate::{SimulationMode, transform_cancellable};
use crate::image_pipeline::tools::types::{SessionConfig, ToolOutput};

/// One tool instance: the uploaded image, its background work and what is on
/// screen.
///
/// A successful upload replaces the image, invalidates every in-flight job and
/// clears the output, so a result computed from the previous image can never be
/// displayed afterwards. A failed upload changes nothing.
pub struct ToolSession<R: ImageReader> {
    loader: ImageLoader<R>,
    config: SessionConfig,
    runner: JobRunner<ToolOutput>,
    image: Option<Arc<DecodedImage>>,
    output: Option<ToolOutput>,
}

impl ToolSession<StandardImageReader> {
    pub fn new(config: SessionConfig) -> Self {
        let loader = ImageLoader::new(config.loader.clone());
        Self::from_parts(loader, config)
    }
}

impl<R: ImageReader> ToolSession<R> {
    pub fn with_custom(reader: R, config: SessionConfig) -> Self {
        let loader = ImageLoader::with_custom(reader, config.loader.clone());
        Self::from_parts(loader, config)
    }

    fn from_parts(loader: ImageLoader<R>, config: SessionConfig) -> Self {
        Self {
            loader,
            config,
            runner: JobRunner::new(),
            image: None,
            output: None,
        }
    }

    fn check_upload_size(&self, size: usize) -> Result<()> {
        let limit = self.config.max_upload_bytes;
        if size > limit {
            warn!("Upload of {} bytes exceeds limit of {} bytes", size, limit);
            return Err(PipelineError::FileTooLarge { size, limit });
        }
        Ok(())
    }

    #[instrument(skip(self, data), fields(input_size = data.len()))]
    pub fn load(&mut self, data: &[u8]) -> Result<&DecodedImage> {
        self.check_upload_size(data.len())?;
        let decoded = self.loader.load(data)?;
        Ok(self.replace_image(decoded))
    }

    #[instrument(skip(self, path))]
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&DecodedImage> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)
            .map_err(|e| PipelineError::InputReadError(format!("{}: {}", path.display(), e)))?;
        self.check_upload_size(usize::try_from(metadata.len()).unwrap_or(usize::MAX))?;

        let decoded = self.loader.load_file(path)?;
        Ok(self.replace_image(decoded))
    }

    fn replace_image(&mut self, decoded: DecodedImage) -> &DecodedImage {
        self.runner.invalidate();
        self.output = None;
        info!(
            width = decoded.width(),
            height = decoded.height(),
            "Replaced session image"
        );
        &**self.image.insert(Arc::new(decoded))
    }

    /// Ranks the `top_n` most frequent colours in the background.
    pub fn request_palette(&mut self, top_n: usize) -> Option<RequestId> {
        let image = self.image.clone()?;
        Some(self.runner.submit("extract_palette", move |cancel| {
            extract_palette_cancellable(&image.raster, top_n, cancel).map(ToolOutput::Palette)
        }))
    }

    pub fn request_default_palette(&mut self) -> Option<RequestId> {
        self.request_palette(self.config.default_palette_size)
    }

    pub fn request_simulation(&mut self, mode: SimulationMode) -> Option<RequestId> {
        let image = self.image.clone()?;
        let matrix = mode.matrix();
        Some(self.runner.submit(format!("simulate:{}", mode.id()), move |cancel| {
            let rendered = transform_cancellable(&image.raster, &matrix, cancel)?;
            Ok(ToolOutput::Raster(Arc::new(rendered)))
        }))
    }

    /// Out-of-range settings are rejected before anything is submitted.
    pub fn request_adjustment(&mut self, settings: AdjustmentSettings) -> Result<Option<RequestId>> {
        settings.validate()?;
        let Some(image) = self.image.clone() else {
            return Ok(None);
        };
        Ok(Some(self.runner.submit("adjust", move |cancel| {
            let rendered = apply_adjustments_cancellable(&image.raster, &settings, cancel)?;
            Ok(ToolOutput::Raster(Arc::new(rendered)))
        })))
    }

    /// Applies the latest outcome if it has arrived. `Ok(true)` when the output
    /// changed.
    pub fn poll(&mut self) -> Result<bool> {
        match self.runner.poll() {
            Some(outcome) => self.apply(outcome),
            None => Ok(false),
        }
    }

    /// Blocks for the latest outcome. `Ok(false)` when nothing was pending.
    pub fn wait(&mut self) -> Result<bool> {
        match self.runner.wait() {
            Some(outcome) => self.apply(outcome),
            None => Ok(false),
        }
    }

    fn apply(&mut self, outcome: JobOutcome<ToolOutput>) -> Result<bool> {
        match outcome.result {
            Ok(output) => {
                debug!(id = %outcome.id, label = %outcome.label, "Displaying job output");
                self.output = Some(output);
                Ok(true)
            }
            Err(e) if e.is_silent() => {
                debug!(id = %outcome.id, "Dropping silent job error: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// The raster a download would contain: the rendered output, or the source
    /// image when no bitmap has been rendered.
    pub fn displayed_raster(&self) -> Option<&RasterImage> {
        match &self.output {
            Some(ToolOutput::Raster(raster)) => Some(raster.as_ref()),
            _ => self.image.as_deref().map(|image| &image.raster),
        }
    }

    pub fn export(&self, config: &ExportConfig) -> Result<Vec<u8>> {
        let raster = self.displayed_raster().ok_or(PipelineError::EmptyInput)?;
        export::encode(raster, config)
    }

    pub fn export_file<P: AsRef<Path>>(&self, path: P, config: &ExportConfig) -> Result<()> {
        let raster = self.displayed_raster().ok_or(PipelineError::EmptyInput)?;
        export::export_file(raster, path, config)
    }

    /// Drops the image and output and abandons in-flight work.
    pub fn clear(&mut self) {
        self.runner.invalidate();
        self.image = None;
        self.output = None;
    }

    pub fn image(&self) -> Option<&DecodedImage> {
        self.image.as_deref()
    }

    pub fn output(&self) -> Option<&ToolOutput> {
        self.output.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.runner.is_busy()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
