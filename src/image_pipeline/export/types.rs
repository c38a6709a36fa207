//! Export configuration types

/// Output container for a downloaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Tiff,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Tiff => "image/tiff",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Tiff => "tiff",
        }
    }
}

/// PNG compression effort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngCompression {
    /// Fastest encode, larger file
    Fast,
    /// Balanced (default)
    Default,
    /// Smallest file, slowest encode
    Best,
}

/// TIFF compression, LZW unless asked otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    /// Smallest deflate output
    DeflateBest,
}

/// Configuration for re-encoding a raster
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Container to write
    pub format: ExportFormat,
    /// PNG compression effort
    pub png_compression: PngCompression,
    /// TIFF compression method
    pub tiff_compression: TiffCompression,
    /// Horizontal differencing predictor for compressed TIFF
    pub tiff_predictor: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            png_compression: PngCompression::Default,
            tiff_compression: TiffCompression::Lzw,
            tiff_predictor: true,
        }
    }
}

impl ExportConfig {
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::default()
    }
}

/// Builder for ExportConfig
#[derive(Default)]
pub struct ExportConfigBuilder {
    format: Option<ExportFormat>,
    png_compression: Option<PngCompression>,
    tiff_compression: Option<TiffCompression>,
    tiff_predictor: Option<bool>,
}

impl ExportConfigBuilder {
    pub fn format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn png_compression(mut self, compression: PngCompression) -> Self {
        self.png_compression = Some(compression);
        self
    }

    pub fn tiff_compression(mut self, compression: TiffCompression) -> Self {
        self.tiff_compression = Some(compression);
        self
    }

    pub fn tiff_predictor(mut self, enable: bool) -> Self {
        self.tiff_predictor = Some(enable);
        self
    }

    pub fn build(self) -> ExportConfig {
        let default = ExportConfig::default();
        ExportConfig {
            format: self.format.unwrap_or(default.format),
            png_compression: self.png_compression.unwrap_or(default.png_compression),
            tiff_compression: self.tiff_compression.unwrap_or(default.tiff_compression),
            tiff_predictor: self.tiff_predictor.unwrap_or(default.tiff_predictor),
        }
    }
}
