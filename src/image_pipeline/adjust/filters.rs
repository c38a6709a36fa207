use rayon::prelude::*;
use tracing::instrument;

use crate::image_pipeline::adjust::settings::AdjustmentSettings;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::jobs::CancelToken;
use crate::image_pipeline::raster::RasterImage;
use crate::image_pipeline::simulate::ColorTransformMatrix;

/// Renders `image` through the brightness -> contrast -> grayscale -> blur chain.
/// The source is only read.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn apply_adjustments(image: &RasterImage, settings: &AdjustmentSettings) -> RasterImage {
    let colored = if settings.has_color_stage() {
        let _span = tracing::info_span!("color_stage").entered();
        image.map_pixels(color_stage(settings))
    } else {
        image.clone()
    };

    if settings.blur > 0.0 {
        let _span = tracing::info_span!("blur_stage", sigma = settings.blur).entered();
        blur(&colored, settings.blur, None)
    } else {
        colored
    }
}

/// `apply_adjustments`, abandoning the work with `Cancelled` once `cancel` fires.
#[instrument(skip(image, cancel), fields(width = image.width(), height = image.height()))]
pub fn apply_adjustments_cancellable(
    image: &RasterImage,
    settings: &AdjustmentSettings,
    cancel: &CancelToken,
) -> Result<RasterImage> {
    let colored = if settings.has_color_stage() {
        image.try_map_pixels(cancel, color_stage(settings))?
    } else {
        image.clone()
    };

    if settings.blur > 0.0 {
        let blurred = blur(&colored, settings.blur, Some(cancel));
        cancel.check()?;
        Ok(blurred)
    } else {
        Ok(colored)
    }
}

/// Separable Gaussian blur of all four channels, edges clamped.
pub fn gaussian_blur(image: &RasterImage, sigma: f32) -> RasterImage {
    blur(image, sigma, None)
}

/// Brightness, contrast and grayscale fused into one per-pixel closure. Each
/// stage clamps to the displayable range before the next, like a chain of
/// separate filters would.
fn color_stage(settings: &AdjustmentSettings) -> impl Fn([u8; 4]) -> [u8; 4] + Sync {
    let brightness = settings.brightness;
    let contrast = settings.contrast;
    let gray = ColorTransformMatrix::grayscale(settings.grayscale);

    move |[r, g, b, a]| {
        let level = |v: u8| {
            let v = (f32::from(v) * brightness).clamp(0.0, 255.0);
            ((v - 127.5) * contrast + 127.5).clamp(0.0, 255.0)
        };
        let [r, g, b] = gray
            .project([level(r), level(g), level(b)])
            .map(|v| v.round().clamp(0.0, 255.0) as u8);
        [r, g, b, a]
    }
}

/// 1-D Gaussian kernel truncated at ceil(3*sigma), normalised to sum 1.
fn build_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as usize;
    if radius == 0 {
        return vec![1.0];
    }
    let s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..=radius * 2)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / s2).exp()
        })
        .collect();
    let inv = 1.0 / kernel.iter().sum::<f32>();
    for v in &mut kernel {
        *v *= inv;
    }
    kernel
}

fn blur(image: &RasterImage, sigma: f32, cancel: Option<&CancelToken>) -> RasterImage {
    if image.is_empty() || sigma.is_nan() || sigma <= 0.0 {
        return image.clone();
    }

    let w = image.width();
    let h = image.height();
    let stride = w * 4;
    let kernel = build_gaussian_kernel(sigma);
    let radius = kernel.len() / 2;
    let cancelled = || cancel.is_some_and(CancelToken::is_cancelled);

    let src: Vec<f32> = image.as_raw().iter().map(|&v| f32::from(v)).collect();

    // Horizontal pass, one row per task.
    let mut horizontal = vec![0.0f32; src.len()];
    horizontal
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            if cancelled() {
                return;
            }
            let row_in = &src[y * stride..(y + 1) * stride];
            for x in 0..w {
                let mut acc = [0.0f32; 4];
                for (k, &weight) in kernel.iter().enumerate() {
                    let sx = (x + k).saturating_sub(radius).min(w - 1);
                    let px = &row_in[sx * 4..sx * 4 + 4];
                    for (sum, &v) in acc.iter_mut().zip(px) {
                        *sum += v * weight;
                    }
                }
                row_out[x * 4..x * 4 + 4].copy_from_slice(&acc);
            }
        });

    // Vertical pass, one row per task.
    let mut out = vec![0u8; src.len()];
    out.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            if cancelled() {
                return;
            }
            for x in 0..w {
                let mut acc = [0.0f32; 4];
                for (k, &weight) in kernel.iter().enumerate() {
                    let sy = (y + k).saturating_sub(radius).min(h - 1);
                    let idx = sy * stride + x * 4;
                    for (sum, &v) in acc.iter_mut().zip(&horizontal[idx..idx + 4]) {
                        *sum += v * weight;
                    }
                }
                for (dst, v) in row_out[x * 4..x * 4 + 4].iter_mut().zip(acc) {
                    *dst = v.round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    image.with_data(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::error::PipelineError;

    fn two_tone(width: usize, height: usize) -> RasterImage {
        let mut data = Vec::with_capacity(width * height * 4);
        for _y in 0..height {
            for x in 0..width {
                if x < width / 2 {
                    data.extend_from_slice(&[0, 0, 0, 255]);
                } else {
                    data.extend_from_slice(&[255, 255, 255, 255]);
                }
            }
        }
        RasterImage::new(width, height, data).unwrap()
    }

    #[test]
    fn test_default_settings_leave_pixels_unchanged() {
        let image = two_tone(9, 4);
        assert_eq!(apply_adjustments(&image, &AdjustmentSettings::default()), image);
    }

    #[test]
    fn test_brightness_scales_channels() {
        let image = RasterImage::filled(2, 2, [100, 40, 200, 77]);
        let settings = AdjustmentSettings::default().with_brightness(1.5);
        let out = apply_adjustments(&image, &settings);
        assert!(out.pixels().all(|p| p == [150, 60, 255, 77]));
    }

    #[test]
    fn test_contrast_pulls_toward_mid_grey() {
        let image = RasterImage::new(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
        let settings = AdjustmentSettings::default().with_contrast(0.5);
        let out = apply_adjustments(&image, &settings);
        assert_eq!(out.pixel(0, 0), Some([64, 64, 64, 255]));
        assert_eq!(out.pixel(1, 0), Some([191, 191, 191, 255]));
    }

    #[test]
    fn test_full_grayscale_equalises_channels() {
        let image = RasterImage::filled(3, 3, [255, 0, 0, 200]);
        let settings = AdjustmentSettings::default().with_grayscale(1.0);
        let out = apply_adjustments(&image, &settings);
        assert!(out.pixels().all(|p| p == [54, 54, 54, 200]));
    }

    #[test]
    fn test_blur_keeps_uniform_image() {
        let image = RasterImage::filled(12, 7, [30, 60, 90, 120]);
        let out = gaussian_blur(&image, 2.5);
        assert_eq!(out, image);
    }

    #[test]
    fn test_blur_softens_edge() {
        let image = two_tone(20, 3);
        let out = gaussian_blur(&image, 1.5);
        assert_eq!((out.width(), out.height()), (20, 3));
        let [left, ..] = out.pixel(9, 1).unwrap();
        let [right, ..] = out.pixel(10, 1).unwrap();
        assert!(left > 0 && left < 128, "left of edge: {}", left);
        assert!(right > 128 && right < 255, "right of edge: {}", right);
        assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(out.pixel(19, 2), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_zero_sigma_kernel() {
        assert_eq!(build_gaussian_kernel(0.0), vec![1.0]);
        let kernel = build_gaussian_kernel(1.0);
        assert_eq!(kernel.len(), 7);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_image_passes_through() {
        let settings = AdjustmentSettings::default().with_blur(3.0).with_brightness(0.7);
        assert!(apply_adjustments(&RasterImage::empty(), &settings).is_empty());
    }

    #[test]
    fn test_cancelled_adjustment() {
        let token = CancelToken::new();
        token.cancel();
        let settings = AdjustmentSettings::default().with_blur(1.0);
        let result = apply_adjustments_cancellable(&two_tone(8, 8), &settings, &token);
        assert!(matches!(result, Err(PipelineError::Cancelled)));
    }

    #[test]
    fn test_cancellable_matches_plain() {
        let image = two_tone(16, 16);
        let settings = AdjustmentSettings::default()
            .with_contrast(1.3)
            .with_grayscale(0.4)
            .with_blur(0.8);
        let plain = apply_adjustments(&image, &settings);
        let cancellable =
            apply_adjustments_cancellable(&image, &settings, &CancelToken::new()).unwrap();
        assert_eq!(plain, cancellable);
    }
}
