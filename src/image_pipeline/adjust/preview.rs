use std::sync::Arc;

use tracing::debug;

use crate::image_pipeline::adjust::filters::apply_adjustments;
use crate::image_pipeline::adjust::settings::AdjustmentSettings;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raster::RasterImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    /// No image
    Idle,
    /// Image present, default settings
    Loaded,
    /// Image present, at least one setting moved off its default
    Adjusted,
}

/// Live preview over an immutable source raster.
///
/// The last render is memoised by settings, so redrawing without a slider
/// change costs nothing.
#[derive(Debug, Default)]
pub struct AdjustmentPreview {
    source: Option<Arc<RasterImage>>,
    settings: AdjustmentSettings,
    rendered: Option<(AdjustmentSettings, Arc<RasterImage>)>,
}

impl AdjustmentPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous image and resets the settings.
    pub fn load(&mut self, image: impl Into<Arc<RasterImage>>) -> PreviewState {
        let image = image.into();
        debug!(width = image.width(), height = image.height(), "Preview source loaded");
        self.source = Some(image);
        self.settings = AdjustmentSettings::default();
        self.rendered = None;
        self.state()
    }

    /// Applies new slider values. Out-of-range values are rejected and leave the
    /// previous settings in place; with no image loaded this is `EmptyInput`.
    pub fn update(&mut self, settings: AdjustmentSettings) -> Result<PreviewState> {
        if self.source.is_none() {
            return Err(PipelineError::EmptyInput);
        }
        settings.validate()?;
        self.settings = settings;
        Ok(self.state())
    }

    /// The filtered view for the current settings, `None` while idle.
    pub fn render(&mut self) -> Option<Arc<RasterImage>> {
        let source = self.source.as_ref()?;
        if self.settings.is_identity() {
            return Some(Arc::clone(source));
        }
        if let Some((settings, image)) = &self.rendered {
            if *settings == self.settings {
                return Some(Arc::clone(image));
            }
        }

        let image = Arc::new(apply_adjustments(source, &self.settings));
        self.rendered = Some((self.settings, Arc::clone(&image)));
        Some(image)
    }

    /// Back to default settings, keeping the image.
    pub fn reset_settings(&mut self) -> PreviewState {
        self.settings = AdjustmentSettings::default();
        self.rendered = None;
        self.state()
    }

    /// Drops the image and settings.
    pub fn reset(&mut self) -> PreviewState {
        *self = Self::default();
        self.state()
    }

    pub fn state(&self) -> PreviewState {
        match &self.source {
            None => PreviewState::Idle,
            Some(_) if self.settings.is_identity() => PreviewState::Loaded,
            Some(_) => PreviewState::Adjusted,
        }
    }

    pub fn settings(&self) -> &AdjustmentSettings {
        &self.settings
    }

    pub fn source(&self) -> Option<&Arc<RasterImage>> {
        self.source.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RasterImage {
        RasterImage::filled(6, 4, [120, 80, 40, 255])
    }

    #[test]
    fn test_state_machine() {
        let mut preview = AdjustmentPreview::new();
        assert_eq!(preview.state(), PreviewState::Idle);
        assert!(preview.render().is_none());

        assert_eq!(preview.load(sample()), PreviewState::Loaded);

        let brighter = AdjustmentSettings::default().with_brightness(1.2);
        assert_eq!(preview.update(brighter).unwrap(), PreviewState::Adjusted);

        assert_eq!(preview.reset_settings(), PreviewState::Loaded);
        assert_eq!(preview.update(brighter).unwrap(), PreviewState::Adjusted);

        assert_eq!(preview.reset(), PreviewState::Idle);
        assert!(preview.source().is_none());
    }

    #[test]
    fn test_update_without_image_is_empty_input() {
        let mut preview = AdjustmentPreview::new();
        let result = preview.update(AdjustmentSettings::default().with_blur(1.0));
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn test_invalid_update_keeps_previous_settings() {
        let mut preview = AdjustmentPreview::new();
        preview.load(sample());
        let good = AdjustmentSettings::default().with_contrast(1.4);
        preview.update(good).unwrap();

        let bad = AdjustmentSettings {
            grayscale: 2.0,
            ..good
        };
        assert!(preview.update(bad).is_err());
        assert_eq!(*preview.settings(), good);
    }

    #[test]
    fn test_render_does_not_touch_source() {
        let mut preview = AdjustmentPreview::new();
        preview.load(sample());
        preview
            .update(AdjustmentSettings::default().with_grayscale(1.0).with_blur(2.0))
            .unwrap();

        let rendered = preview.render().unwrap();
        assert_ne!(*rendered, sample());
        assert_eq!(**preview.source().unwrap(), sample());
    }

    #[test]
    fn test_render_is_memoised() {
        let mut preview = AdjustmentPreview::new();
        preview.load(sample());
        preview
            .update(AdjustmentSettings::default().with_brightness(0.8))
            .unwrap();

        let first = preview.render().unwrap();
        let second = preview.render().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        preview
            .update(AdjustmentSettings::default().with_brightness(0.9))
            .unwrap();
        let third = preview.render().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_loaded_render_is_source() {
        let mut preview = AdjustmentPreview::new();
        preview.load(sample());
        let rendered = preview.render().unwrap();
        assert!(Arc::ptr_eq(&rendered, preview.source().unwrap()));
    }

    #[test]
    fn test_new_upload_replaces_image() {
        let mut preview = AdjustmentPreview::new();
        preview.load(sample());
        preview
            .update(AdjustmentSettings::default().with_blur(1.0))
            .unwrap();

        let replacement = RasterImage::filled(2, 2, [0, 0, 0, 255]);
        assert_eq!(preview.load(replacement.clone()), PreviewState::Loaded);
        assert_eq!(**preview.source().unwrap(), replacement);
        assert!(preview.settings().is_identity());
    }
}
