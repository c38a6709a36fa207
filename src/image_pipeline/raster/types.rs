//! Raster image type

use image::RgbaImage;
use rayon::prelude::*;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::jobs::CancelToken;
use crate::image_pipeline::raster::BAND_ROWS;

/// A decoded pixel grid of interleaved 8-bit RGBA quadruples.
///
/// `data.len() == width * height * 4` always holds. A raster with a zero
/// dimension is a valid, empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(PipelineError::InvalidDimensions(width, height))?;
        if data.len() != expected {
            return Err(PipelineError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Every pixel set to the same RGBA value.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            data: rgba.repeat(width * height),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Fails with `EmptyInput` for zero-dimension rasters.
    pub fn require_non_empty(&self) -> Result<&Self> {
        if self.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        Ok(self)
    }

    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let (w, h) = self.dimensions_u32()?;
        RgbaImage::from_raw(w, h, self.data.clone())
            .ok_or(PipelineError::InvalidDimensions(self.width, self.height))
    }

    /// Same dimensions as `self`, new pixel bytes. Callers produce `data` from a
    /// pass over `self`, so the length already matches.
    pub(crate) fn with_data(&self, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }

    pub(crate) fn dimensions_u32(&self) -> Result<(u32, u32)> {
        let w = u32::try_from(self.width)
            .map_err(|_| PipelineError::InvalidDimensions(self.width, self.height))?;
        let h = u32::try_from(self.height)
            .map_err(|_| PipelineError::InvalidDimensions(self.width, self.height))?;
        Ok((w, h))
    }

    /// Runs `f` over every pixel into a new raster of the same size, one band of
    /// rows per rayon task.
    pub fn map_pixels<F>(&self, f: F) -> RasterImage
    where
        F: Fn([u8; 4]) -> [u8; 4] + Sync,
    {
        self.map_bands(None, f)
    }

    /// Like `map_pixels`, but the token is checked before each band. A cancelled
    /// run returns `Cancelled` and its partial output is dropped.
    pub fn try_map_pixels<F>(&self, cancel: &CancelToken, f: F) -> Result<RasterImage>
    where
        F: Fn([u8; 4]) -> [u8; 4] + Sync,
    {
        let out = self.map_bands(Some(cancel), f);
        cancel.check()?;
        Ok(out)
    }

    fn map_bands<F>(&self, cancel: Option<&CancelToken>, f: F) -> RasterImage
    where
        F: Fn([u8; 4]) -> [u8; 4] + Sync,
    {
        if self.is_empty() {
            return self.with_data(Vec::new());
        }

        let band = self.width * 4 * BAND_ROWS;
        let mut out = vec![0u8; self.data.len()];
        out.par_chunks_mut(band)
            .zip(self.data.par_chunks(band))
            .for_each(|(band_out, band_in)| {
                if cancel.is_some_and(CancelToken::is_cancelled) {
                    return;
                }
                for (dst, src) in band_out.chunks_exact_mut(4).zip(band_in.chunks_exact(4)) {
                    dst.copy_from_slice(&f([src[0], src[1], src[2], src[3]]));
                }
            });

        self.with_data(out)
    }
}

impl From<RgbaImage> for RasterImage {
    fn from(image: RgbaImage) -> Self {
        let width = image.width() as usize;
        let height = image.height() as usize;
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}
