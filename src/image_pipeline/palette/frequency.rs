use std::collections::HashMap;

use rayon::prelude::*;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::jobs::CancelToken;
use crate::image_pipeline::raster::{BAND_ROWS, RasterImage, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tally {
    count: u64,
    /// Index of the first pixel with this colour, row-major.
    first_seen: usize,
}

/// Occurrence count per exact RGB triple over one raster. Alpha is ignored.
///
/// The counts always add up to the raster's pixel count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorFrequencyTable {
    tallies: HashMap<Rgb, Tally>,
    total: u64,
}

impl ColorFrequencyTable {
    pub fn build(image: &RasterImage) -> Self {
        Self::count_bands(image, None)
    }

    pub fn build_cancellable(image: &RasterImage, cancel: &CancelToken) -> Result<Self> {
        let table = Self::count_bands(image, Some(cancel));
        cancel.check()?;
        Ok(table)
    }

    /// Counts each band of rows on its own rayon task, then merges the partial
    /// tables. Merging sums counts and keeps the earliest first-seen index, so
    /// the result does not depend on scheduling.
    fn count_bands(image: &RasterImage, cancel: Option<&CancelToken>) -> Self {
        if image.is_empty() {
            return Self::default();
        }

        let band_pixels = image.width() * BAND_ROWS;
        image
            .as_raw()
            .par_chunks(band_pixels * 4)
            .enumerate()
            .map(|(band, bytes)| {
                let mut table = Self::default();
                if cancel.is_some_and(CancelToken::is_cancelled) {
                    return table;
                }
                let base = band * band_pixels;
                for (offset, px) in bytes.chunks_exact(4).enumerate() {
                    table.record(Rgb::new(px[0], px[1], px[2]), base + offset);
                }
                table
            })
            .reduce(Self::default, Self::merge)
    }

    fn record(&mut self, color: Rgb, index: usize) {
        self.total += 1;
        self.tallies
            .entry(color)
            .and_modify(|t| t.count += 1)
            .or_insert(Tally {
                count: 1,
                first_seen: index,
            });
    }

    fn merge(self, other: Self) -> Self {
        let (mut into, from) = if self.tallies.len() >= other.tallies.len() {
            (self, other)
        } else {
            (other, self)
        };
        into.total += from.total;
        for (color, tally) in from.tallies {
            into.tallies
                .entry(color)
                .and_modify(|t| {
                    t.count += tally.count;
                    t.first_seen = t.first_seen.min(tally.first_seen);
                })
                .or_insert(tally);
        }
        into
    }

    /// Number of pixels counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct colours observed.
    pub fn distinct(&self) -> usize {
        self.tallies.len()
    }

    pub fn count(&self, color: Rgb) -> u64 {
        self.tallies.get(&color).map_or(0, |t| t.count)
    }

    /// All colours, most frequent first. Equal counts keep first-occurrence order.
    pub fn ranked(&self) -> Vec<(Rgb, u64)> {
        let mut entries: Vec<(Rgb, Tally)> =
            self.tallies.iter().map(|(c, t)| (*c, *t)).collect();
        entries.sort_unstable_by(|(_, a), (_, b)| {
            b.count
                .cmp(&a.count)
                .then(a.first_seen.cmp(&b.first_seen))
        });
        entries.into_iter().map(|(c, t)| (c, t.count)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_pixel_count() {
        let height = BAND_ROWS * 3 + 5;
        let mut data = Vec::new();
        for i in 0..(7 * height) {
            data.extend_from_slice(&[(i % 5) as u8, 0, (i % 3) as u8, (i % 256) as u8]);
        }
        let image = RasterImage::new(7, height, data).unwrap();
        let table = ColorFrequencyTable::build(&image);

        assert_eq!(table.total(), image.pixel_count() as u64);
        let summed: u64 = table.ranked().iter().map(|(_, n)| n).sum();
        assert_eq!(summed, table.total());
        assert_eq!(table.distinct(), 15);
    }

    #[test]
    fn test_alpha_is_ignored() {
        let data = vec![1, 2, 3, 0, 1, 2, 3, 255];
        let image = RasterImage::new(2, 1, data).unwrap();
        let table = ColorFrequencyTable::build(&image);
        assert_eq!(table.distinct(), 1);
        assert_eq!(table.count(Rgb::new(1, 2, 3)), 2);
    }

    #[test]
    fn test_ties_keep_first_occurrence_across_bands() {
        // One blue pixel at the very end, one green pixel first, red fills the rest.
        // Green and blue tie; green is seen first.
        let width = 3;
        let height = BAND_ROWS * 2;
        let mut image = vec![[255u8, 0, 0, 255]; width * height];
        image[0] = [0, 255, 0, 255];
        image[width * height - 1] = [0, 0, 255, 255];
        let raster = RasterImage::new(width, height, image.concat()).unwrap();

        let ranked = ColorFrequencyTable::build(&raster).ranked();
        assert_eq!(ranked[0].0, Rgb::new(255, 0, 0));
        assert_eq!(ranked[1], (Rgb::new(0, 255, 0), 1));
        assert_eq!(ranked[2], (Rgb::new(0, 0, 255), 1));
    }

    #[test]
    fn test_cancelled_build() {
        let token = CancelToken::new();
        token.cancel();
        let image = RasterImage::filled(3, 3, [0, 0, 0, 0]);
        assert!(ColorFrequencyTable::build_cancellable(&image, &token).is_err());
    }

    #[test]
    fn test_empty_image() {
        let table = ColorFrequencyTable::build(&RasterImage::empty());
        assert_eq!(table.total(), 0);
        assert!(table.ranked().is_empty());
    }
}
