use tracing::{debug, instrument};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::jobs::CancelToken;
use crate::image_pipeline::palette::frequency::ColorFrequencyTable;
use crate::image_pipeline::raster::{RasterImage, Rgb};

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub color: Rgb,
    pub count: u64,
    /// Fraction of all pixels, 0..=1
    pub share: f32,
}

impl PaletteEntry {
    pub fn hex(&self) -> String {
        self.color.to_hex()
    }
}

/// The most frequent colours of one raster, most frequent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    pub entries: Vec<PaletteEntry>,
    pub total_pixels: u64,
    pub distinct_colors: usize,
}

impl Palette {
    /// Uppercase `#RRGGBB` strings in rank order.
    pub fn hex_colors(&self) -> Vec<String> {
        self.entries.iter().map(PaletteEntry::hex).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn from_table(table: &ColorFrequencyTable, top_n: usize) -> Self {
        let total = table.total();
        let entries = {
            let _span = tracing::info_span!("rank_colors", distinct = table.distinct()).entered();
            table
                .ranked()
                .into_iter()
                .take(top_n)
                .map(|(color, count)| PaletteEntry {
                    color,
                    count,
                    share: (count as f64 / total as f64) as f32,
                })
                .collect()
        };
        Self {
            entries,
            total_pixels: total,
            distinct_colors: table.distinct(),
        }
    }
}

/// Up to `top_n` exact colours ranked by pixel count. Never pads: an image with
/// fewer distinct colours returns fewer entries.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn extract_palette(image: &RasterImage, top_n: usize) -> Palette {
    if top_n == 0 || image.is_empty() {
        return Palette::default();
    }
    let table = {
        let _span = tracing::info_span!("count_colors").entered();
        ColorFrequencyTable::build(image)
    };
    let palette = Palette::from_table(&table, top_n);
    debug!(
        "Extracted {} of {} distinct colours",
        palette.len(),
        palette.distinct_colors
    );
    palette
}

/// `extract_palette`, abandoning the count with `Cancelled` once `cancel` fires.
#[instrument(skip(image, cancel), fields(width = image.width(), height = image.height()))]
pub fn extract_palette_cancellable(
    image: &RasterImage,
    top_n: usize,
    cancel: &CancelToken,
) -> Result<Palette> {
    if top_n == 0 || image.is_empty() {
        return Ok(Palette::default());
    }
    let table = {
        let _span = tracing::info_span!("count_colors").entered();
        ColorFrequencyTable::build_cancellable(image, cancel)?
    };
    cancel.check()?;
    Ok(Palette::from_table(&table, top_n))
}
