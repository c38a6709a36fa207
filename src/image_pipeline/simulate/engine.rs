use tracing::{debug, instrument};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::jobs::CancelToken;
use crate::image_pipeline::raster::RasterImage;
use crate::image_pipeline::simulate::matrix::ColorTransformMatrix;
use crate::image_pipeline::simulate::modes::SimulationMode;

/// Applies `matrix` to every pixel's RGB. Alpha is copied, dimensions are kept,
/// and an empty raster yields an empty raster.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn transform(image: &RasterImage, matrix: &ColorTransformMatrix) -> RasterImage {
    debug!("Applying colour matrix {:?}", matrix.rows());
    let matrix = *matrix;
    image.map_pixels(move |[r, g, b, a]| {
        let [r, g, b] = matrix.apply([r, g, b]);
        [r, g, b, a]
    })
}

/// `transform`, abandoning the work with `Cancelled` once `cancel` fires.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn transform_cancellable(
    image: &RasterImage,
    matrix: &ColorTransformMatrix,
    cancel: &CancelToken,
) -> Result<RasterImage> {
    let matrix = *matrix;
    image.try_map_pixels(cancel, move |[r, g, b, a]| {
        let [r, g, b] = matrix.apply([r, g, b]);
        [r, g, b, a]
    })
}

pub fn simulate(image: &RasterImage, mode: SimulationMode) -> RasterImage {
    transform(image, &mode.matrix())
}
