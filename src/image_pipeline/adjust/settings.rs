//! Adjustment slider values

use std::ops::RangeInclusive;

use crate::image_pipeline::common::error::{PipelineError, Result};

pub const BRIGHTNESS_RANGE: RangeInclusive<f32> = 0.5..=1.5;
pub const CONTRAST_RANGE: RangeInclusive<f32> = 0.5..=1.5;
pub const GRAYSCALE_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Gaussian sigma in pixels.
pub const BLUR_RANGE: RangeInclusive<f32> = 0.0..=5.0;

/// Filter chain parameters, applied in field order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentSettings {
    /// Channel multiplier
    pub brightness: f32,
    /// Scale around mid-grey
    pub contrast: f32,
    /// Desaturation amount
    pub grayscale: f32,
    /// Blur radius (sigma) in pixels
    pub blur: f32,
}

impl Default for AdjustmentSettings {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            grayscale: 0.0,
            blur: 0.0,
        }
    }
}

fn clamp_into(value: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_nan() {
        return fallback;
    }
    value.clamp(*range.start(), *range.end())
}

fn check(name: &'static str, value: f32, range: &RangeInclusive<f32>) -> Result<()> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(PipelineError::InvalidSetting {
        name,
        value,
        min: *range.start(),
        max: *range.end(),
    })
}

impl AdjustmentSettings {
    pub fn with_brightness(mut self, value: f32) -> Self {
        self.brightness = clamp_into(value, &BRIGHTNESS_RANGE, 1.0);
        self
    }

    pub fn with_contrast(mut self, value: f32) -> Self {
        self.contrast = clamp_into(value, &CONTRAST_RANGE, 1.0);
        self
    }

    pub fn with_grayscale(mut self, value: f32) -> Self {
        self.grayscale = clamp_into(value, &GRAYSCALE_RANGE, 0.0);
        self
    }

    pub fn with_blur(mut self, value: f32) -> Self {
        self.blur = clamp_into(value, &BLUR_RANGE, 0.0);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check("brightness", self.brightness, &BRIGHTNESS_RANGE)?;
        check("contrast", self.contrast, &CONTRAST_RANGE)?;
        check("grayscale", self.grayscale, &GRAYSCALE_RANGE)?;
        check("blur", self.blur, &BLUR_RANGE)
    }

    /// True when the chain leaves every pixel unchanged.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn has_color_stage(&self) -> bool {
        self.brightness != 1.0 || self.contrast != 1.0 || self.grayscale != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_clamp() {
        let s = AdjustmentSettings::default()
            .with_brightness(3.0)
            .with_contrast(0.1)
            .with_grayscale(-1.0)
            .with_blur(f32::NAN);
        assert_eq!(s.brightness, 1.5);
        assert_eq!(s.contrast, 0.5);
        assert_eq!(s.grayscale, 0.0);
        assert_eq!(s.blur, 0.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_names_offending_field() {
        let s = AdjustmentSettings {
            blur: 9.0,
            ..AdjustmentSettings::default()
        };
        match s.validate() {
            Err(PipelineError::InvalidSetting { name, max, .. }) => {
                assert_eq!(name, "blur");
                assert_eq!(max, 5.0);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_identity() {
        assert!(AdjustmentSettings::default().is_identity());
        assert!(!AdjustmentSettings::default().with_blur(1.0).is_identity());
    }
}
