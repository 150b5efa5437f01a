//! Reduced-resolution levels.

use super::{CogError, Raster};

/// Filters `factors` down to the levels worth writing for a raster of the
/// given size: sorted, deduplicated, and without factors larger than both
/// dimensions.
pub fn overview_factors(width: u32, height: u32, factors: &[u32]) -> Vec<u32> {
    let mut levels: Vec<u32> = factors
        .iter()
        .copied()
        .filter(|&f| f >= 2 && !(f > width && f > height))
        .collect();
    levels.sort_unstable();
    levels.dedup();
    levels
}

/// Builds one overview level by averaging `factor × factor` windows of
/// full-resolution rows fed top to bottom.
///
/// Samples equal to `nodata` are left out of the average; a window with no
/// valid samples becomes `nodata`. An average that rounds onto `nodata` is
/// moved one step away so it is not mistaken for missing data. Only one
/// output row of running sums is held besides the finished pixels.
#[derive(Debug)]
pub struct OverviewBuilder {
    factor: u32,
    source_width: u32,
    source_height: u32,
    bands: u16,
    nodata: Option<u8>,
    sums: Vec<u64>,
    counts: Vec<u64>,
    rows_seen: u32,
    pixels: Vec<u8>,
}

impl OverviewBuilder {
    pub fn new(width: u32, height: u32, bands: u16, factor: u32, nodata: Option<u8>) -> Self {
        let factor = factor.max(1);
        let row_len = width.div_ceil(factor) as usize * bands as usize;
        Self {
            factor,
            source_width: width,
            source_height: height,
            bands,
            nodata,
            sums: vec![0; row_len],
            counts: vec![0; row_len],
            rows_seen: 0,
            pixels: Vec::with_capacity(row_len * height.div_ceil(factor) as usize),
        }
    }

    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Adds the next source row (`width × bands` samples).
    pub fn push_row(&mut self, row: &[u8]) {
        if self.rows_seen >= self.source_height {
            return;
        }
        let bands = self.bands as usize;
        for (x, pixel) in row
            .chunks_exact(bands)
            .take(self.source_width as usize)
            .enumerate()
        {
            let base = x / self.factor as usize * bands;
            for (band, &value) in pixel.iter().enumerate() {
                if Some(value) != self.nodata {
                    self.sums[base + band] += value as u64;
                    self.counts[base + band] += 1;
                }
            }
        }

        self.rows_seen += 1;
        if self.rows_seen % self.factor == 0 || self.rows_seen == self.source_height {
            for (sum, count) in self.sums.iter_mut().zip(self.counts.iter_mut()) {
                self.pixels.push(average(*sum, *count, self.nodata));
                *sum = 0;
                *count = 0;
            }
        }
    }

    /// The finished level. Fails if fewer rows than the source height were
    /// pushed.
    pub fn finish(self) -> Result<Raster, CogError> {
        Raster::new(
            self.source_width.div_ceil(self.factor),
            self.source_height.div_ceil(self.factor),
            self.bands,
            self.pixels,
        )
    }
}

fn average(sum: u64, count: u64, nodata: Option<u8>) -> u8 {
    let Some(nodata) = nodata else {
        return ((sum + count / 2) / count.max(1)) as u8;
    };
    if count == 0 {
        return nodata;
    }
    let mean = ((sum + count / 2) / count) as u8;
    if mean == nodata {
        if nodata == u8::MAX {
            mean - 1
        } else {
            mean + 1
        }
    } else {
        mean
    }
}
