use std::path::Path;

use tracing::{info, instrument, warn};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::decode::reader::ImageReader;
use crate::image_pipeline::decode::standard_reader::StandardImageReader;
use crate::image_pipeline::decode::types::{DecodedImage, LoaderConfig};

/// Decodes uploads and validates the result before anyone else sees it.
///
/// Either a fully validated `DecodedImage` is returned or an error; nothing is
/// retained on failure.
pub struct ImageLoader<R: ImageReader> {
    reader: R,
    config: LoaderConfig,
}

impl ImageLoader<StandardImageReader> {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            reader: StandardImageReader,
            config,
        }
    }
}

impl<R: ImageReader> ImageLoader<R> {
    pub fn with_custom(reader: R, config: LoaderConfig) -> Self {
        Self { reader, config }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!(
                    "Image dimensions {}x{} exceed maximum {}",
                    width, height, max
                );
                return Err(PipelineError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    #[instrument(skip(self, data), fields(input_size = data.len()))]
    pub fn load(&self, data: &[u8]) -> Result<DecodedImage> {
        let decoded = {
            let _span = tracing::info_span!("decode_image").entered();
            self.reader.read_image(data)?
        };

        {
            let _span = tracing::info_span!(
                "validate_dimensions",
                width = decoded.width(),
                height = decoded.height()
            )
            .entered();
            self.validate_dimensions(decoded.width(), decoded.height())?;
        }

        info!(
            width = decoded.width(),
            height = decoded.height(),
            mime = decoded.mime_type(),
            "Image loaded"
        );
        Ok(decoded)
    }

    #[instrument(skip(self, input_path))]
    pub fn load_file<P: AsRef<Path>>(&self, input_path: P) -> Result<DecodedImage> {
        let input_path = input_path.as_ref();
        info!(input = %input_path.display(), "Loading file");

        let data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                PipelineError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        self.load(&data)
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LoaderConfig) {
        self.config = config;
    }
}
