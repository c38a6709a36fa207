//! Session configuration and displayed results

use std::sync::Arc;

use crate::image_pipeline::decode::types::LoaderConfig;
use crate::image_pipeline::palette::Palette;
use crate::image_pipeline::raster::RasterImage;

/// Whatever a tool currently shows: a ranked colour list or a rendered bitmap.
#[derive(Debug, Clone)]
pub enum ToolOutput {
    Palette(Palette),
    Raster(Arc<RasterImage>),
}

impl ToolOutput {
    pub fn as_palette(&self) -> Option<&Palette> {
        match self {
            ToolOutput::Palette(palette) => Some(palette),
            ToolOutput::Raster(_) => None,
        }
    }

    pub fn as_raster(&self) -> Option<&Arc<RasterImage>> {
        match self {
            ToolOutput::Raster(raster) => Some(raster),
            ToolOutput::Palette(_) => None,
        }
    }
}

/// Configuration for a single tool session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Uploads above this many bytes are refused before decoding
    pub max_upload_bytes: usize,
    /// Colours returned by `request_default_palette`
    pub default_palette_size: usize,
    pub loader: LoaderConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
            default_palette_size: 5,
            loader: LoaderConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

/// Builder for SessionConfig
#[derive(Default)]
pub struct SessionConfigBuilder {
    max_upload_bytes: Option<usize>,
    default_palette_size: Option<usize>,
    loader: Option<LoaderConfig>,
}

impl SessionConfigBuilder {
    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = Some(bytes);
        self
    }

    pub fn default_palette_size(mut self, size: usize) -> Self {
        self.default_palette_size = Some(size);
        self
    }

    pub fn loader(mut self, loader: LoaderConfig) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn build(self) -> SessionConfig {
        let default = SessionConfig::default();
        SessionConfig {
            max_upload_bytes: self.max_upload_bytes.unwrap_or(default.max_upload_bytes),
            default_palette_size: self
                .default_palette_size
                .unwrap_or(default.default_palette_size),
            loader: self.loader.unwrap_or(default.loader),
        }
    }
}
