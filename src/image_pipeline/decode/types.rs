//! Decoding types and loader configuration

use std::sync::Arc;

use image::ImageFormat;

use crate::image_pipeline::raster::RasterImage;

/// Raster formats a browser would decode for an `image/*` upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Bmp,
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 5] = [
        SourceFormat::Png,
        SourceFormat::Jpeg,
        SourceFormat::Gif,
        SourceFormat::WebP,
        SourceFormat::Bmp,
    ];

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(SourceFormat::Png),
            ImageFormat::Jpeg => Some(SourceFormat::Jpeg),
            ImageFormat::Gif => Some(SourceFormat::Gif),
            ImageFormat::WebP => Some(SourceFormat::WebP),
            ImageFormat::Bmp => Some(SourceFormat::Bmp),
            _ => None,
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            SourceFormat::Png => ImageFormat::Png,
            SourceFormat::Jpeg => ImageFormat::Jpeg,
            SourceFormat::Gif => ImageFormat::Gif,
            SourceFormat::WebP => ImageFormat::WebP,
            SourceFormat::Bmp => ImageFormat::Bmp,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            SourceFormat::Png => "image/png",
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Gif => "image/gif",
            SourceFormat::WebP => "image/webp",
            SourceFormat::Bmp => "image/bmp",
        }
    }
}

/// `image/*` gate applied to a declared MIME type before any bytes are read.
pub fn accepts_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Result of decoding one uploaded file.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Decoded RGBA pixels
    pub raster: RasterImage,
    /// Container format sniffed from the file contents
    pub format: SourceFormat,
    /// The original file bytes, display-ready for preview
    pub encoded: Arc<[u8]>,
}

impl DecodedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn width(&self) -> usize {
        self.raster.width()
    }

    pub fn height(&self) -> usize {
        self.raster.height()
    }
}

/// Configuration for image loading
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Reject decoded images with a zero dimension
    pub validate_dimensions: bool,
    /// Largest accepted width or height, if any
    pub max_dimension: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            validate_dimensions: true,
            max_dimension: None,
        }
    }
}

impl LoaderConfig {
    pub fn builder() -> LoaderConfigBuilder {
        LoaderConfigBuilder::default()
    }
}

/// Builder for LoaderConfig
#[derive(Default)]
pub struct LoaderConfigBuilder {
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl LoaderConfigBuilder {
    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> LoaderConfig {
        let default = LoaderConfig::default();
        LoaderConfig {
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}
