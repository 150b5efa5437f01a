//! Tiled GeoTIFF writer.
//!
//! Layout: the full-resolution image is the first IFD, followed by one
//! reduced-resolution IFD (`NewSubfileType = 1`) per overview level. Every
//! IFD is cut into square blocks; edge blocks are padded with no-data (or
//! zero when no no-data value is set). Blocks are predicted with horizontal
//! differencing and DEFLATE-compressed with zlib framing.
//!
//! The full-resolution image is pulled from a [`RowSource`] one block row at
//! a time and each block is written as soon as it is compressed. Overview
//! levels are accumulated from the same rows, so only they are held in
//! memory.

use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use chrono::Utc;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;
use tracing::{debug, info};

use super::geo::GeoTags;
use super::metadata::{self, GDAL_METADATA, GDAL_NODATA};
use super::overview::{overview_factors, OverviewBuilder};
use super::{CogError, CogOptions, Raster};

const NEW_SUBFILE_TYPE: u16 = 254;
const SUBFILE_REDUCED_RESOLUTION: u32 = 1;

const COMPRESSION_DEFLATE: u16 = 8;
const PREDICTOR_HORIZONTAL: u16 = 2;
const PHOTOMETRIC_MIN_IS_BLACK: u16 = 1;
const PHOTOMETRIC_RGB: u16 = 2;
const PLANAR_CHUNKY: u16 = 1;
const SAMPLE_FORMAT_UINT: u16 = 1;

/// Summary of a written file.
#[derive(Debug, Clone, PartialEq)]
pub struct CogSummary {
    pub width: u32,
    pub height: u32,
    pub bands: u16,
    /// Overview factors actually written
    pub overview_factors: Vec<u32>,
    /// Size of the file in bytes
    pub bytes: u64,
}

/// Full-resolution pixels handed to the writer in row order.
pub trait RowSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn bands(&self) -> u16;

    /// Appends rows `y0..y0 + count` to `out`, `width × bands` interleaved
    /// samples per row.
    fn read_rows(&mut self, y0: u32, count: u32, out: &mut Vec<u8>) -> Result<(), CogError>;
}

impl RowSource for &Raster {
    fn width(&self) -> u32 {
        Raster::width(self)
    }

    fn height(&self) -> u32 {
        Raster::height(self)
    }

    fn bands(&self) -> u16 {
        Raster::bands(self)
    }

    fn read_rows(&mut self, y0: u32, count: u32, out: &mut Vec<u8>) -> Result<(), CogError> {
        for y in y0..y0 + count {
            out.extend_from_slice(self.row(y));
        }
        Ok(())
    }
}

/// How source bands map onto the bands written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandLayout {
    /// Bands are written as read
    #[default]
    AsIs,
    /// A single gray band is repeated into red, green and blue
    GrayToRgb,
}

impl BandLayout {
    fn output_bands(self, source_bands: u16) -> Result<u16, CogError> {
        match self {
            BandLayout::AsIs => Ok(source_bands),
            BandLayout::GrayToRgb if source_bands == 1 => Ok(3),
            BandLayout::GrayToRgb => Err(CogError::InvalidRaster(format!(
                "gray to RGB needs a single-band source, found {} bands",
                source_bands
            ))),
        }
    }

    fn apply<'a>(self, samples: &'a [u8], scratch: &'a mut Vec<u8>) -> &'a [u8] {
        match self {
            BandLayout::AsIs => samples,
            BandLayout::GrayToRgb => {
                scratch.clear();
                scratch.extend(samples.iter().flat_map(|&v| [v, v, v]));
                scratch.as_slice()
            }
        }
    }
}

/// Writes `raster` to `path` as a tiled, compressed GeoTIFF with overviews.
///
/// A partially written file is removed on error.
pub fn write_cog(
    path: &Path,
    raster: &Raster,
    geo: &GeoTags,
    options: &CogOptions,
) -> Result<CogSummary, CogError> {
    let mut source = raster;
    write_cog_from(path, &mut source, BandLayout::AsIs, geo, options)
}

/// Writes the rows of `source` to `path`, mapping bands through `layout`.
///
/// A partially written file is removed on error.
pub fn write_cog_from<S: RowSource>(
    path: &Path,
    source: &mut S,
    layout: BandLayout,
    geo: &GeoTags,
    options: &CogOptions,
) -> Result<CogSummary, CogError> {
    options.validate()?;
    layout.output_bands(source.bands())?;

    let result = File::create(path)
        .map_err(CogError::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            let summary = write_rows_to(&mut writer, source, layout, geo, options)?;
            writer.flush()?;
            Ok(summary)
        });

    if result.is_err() {
        let _ = fs::remove_file(path);
    }

    let summary = result?;
    info!(
        path = %path.display(),
        width = summary.width,
        height = summary.height,
        bands = summary.bands,
        overviews = summary.overview_factors.len(),
        bytes = summary.bytes,
        "Wrote GeoTIFF"
    );
    Ok(summary)
}

/// Writes the GeoTIFF to any seekable writer.
pub fn write_to<W: Write + Seek>(
    writer: &mut W,
    raster: &Raster,
    geo: &GeoTags,
    options: &CogOptions,
) -> Result<CogSummary, CogError> {
    let mut source = raster;
    write_rows_to(writer, &mut source, BandLayout::AsIs, geo, options)
}

fn write_rows_to<W: Write + Seek, S: RowSource>(
    writer: &mut W,
    source: &mut S,
    layout: BandLayout,
    geo: &GeoTags,
    options: &CogOptions,
) -> Result<CogSummary, CogError> {
    options.validate()?;
    let bands = layout.output_bands(source.bands())?;
    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 {
        return Err(CogError::InvalidRaster(format!(
            "dimensions must be positive, got {}x{}",
            width, height
        )));
    }

    let levels = overview_factors(width, height, &options.overview_factors);
    let mut metadata_items = options.metadata.clone();
    if !levels.is_empty() {
        metadata_items.push(("OVERVIEW_RESAMPLING".to_string(), "average".to_string()));
    }
    let mut overviews: Vec<OverviewBuilder> = levels
        .iter()
        .map(|&factor| OverviewBuilder::new(width, height, source.bands(), factor, options.nodata))
        .collect();

    {
        let mut encoder = TiffEncoder::new(&mut *writer)?;

        write_image(
            &mut encoder,
            source,
            layout,
            Some((geo, metadata_items.as_slice())),
            options,
            &mut overviews,
        )?;

        for builder in overviews {
            let factor = builder.factor();
            let overview = builder.finish()?;
            debug!(
                factor,
                width = overview.width(),
                height = overview.height(),
                "Writing overview"
            );
            let mut rows = &overview;
            write_image(&mut encoder, &mut rows, layout, None, options, &mut [])?;
        }
    }

    let bytes = writer.seek(SeekFrom::End(0))?;
    if bytes > u32::MAX as u64 {
        return Err(CogError::FileTooLarge);
    }

    Ok(CogSummary {
        width,
        height,
        bands,
        overview_factors: levels,
        bytes,
    })
}

/// Writes one IFD. `main` carries the georeferencing and metadata that only
/// the full-resolution image gets; `None` marks an overview. Every source
/// row is also pushed into `overviews`.
fn write_image<W: Write + Seek, S: RowSource>(
    encoder: &mut TiffEncoder<W>,
    source: &mut S,
    layout: BandLayout,
    main: Option<(&GeoTags, &[(String, String)])>,
    options: &CogOptions,
    overviews: &mut [OverviewBuilder],
) -> Result<(), CogError> {
    let (width, height) = (source.width(), source.height());
    let source_row_len = width as usize * source.bands() as usize;
    let bands = layout.output_bands(source.bands())? as usize;
    let block = options.block_size;
    let fill = options.nodata.unwrap_or(0);
    let across = width.div_ceil(block);
    let down = height.div_ceil(block);

    let mut dir = encoder.new_directory()?;

    if main.is_none() {
        dir.write_tag(
            Tag::from_u16_exhaustive(NEW_SUBFILE_TYPE),
            SUBFILE_REDUCED_RESOLUTION,
        )?;
    }
    dir.write_tag(Tag::ImageWidth, width)?;
    dir.write_tag(Tag::ImageLength, height)?;
    dir.write_tag(Tag::BitsPerSample, vec![8u16; bands].as_slice())?;
    dir.write_tag(Tag::Compression, COMPRESSION_DEFLATE)?;
    let photometric = if bands == 3 {
        PHOTOMETRIC_RGB
    } else {
        PHOTOMETRIC_MIN_IS_BLACK
    };
    dir.write_tag(Tag::PhotometricInterpretation, photometric)?;
    dir.write_tag(Tag::SamplesPerPixel, bands as u16)?;
    dir.write_tag(Tag::PlanarConfiguration, PLANAR_CHUNKY)?;
    dir.write_tag(Tag::Predictor, PREDICTOR_HORIZONTAL)?;
    dir.write_tag(Tag::TileWidth, block)?;
    dir.write_tag(Tag::TileLength, block)?;
    dir.write_tag(Tag::SampleFormat, vec![SAMPLE_FORMAT_UINT; bands].as_slice())?;

    if let Some(nodata) = options.nodata {
        dir.write_tag(
            Tag::from_u16_exhaustive(GDAL_NODATA),
            nodata.to_string().as_str(),
        )?;
    }

    if let Some((geo, items)) = main {
        dir.write_tag(
            Tag::Software,
            concat!("geobatch ", env!("CARGO_PKG_VERSION")),
        )?;
        dir.write_tag(
            Tag::DateTime,
            Utc::now().format("%Y:%m:%d %H:%M:%S").to_string().as_str(),
        )?;
        geo.write(&mut dir)?;
        if !items.is_empty() {
            dir.write_tag(
                Tag::from_u16_exhaustive(GDAL_METADATA),
                metadata::to_xml(items).as_str(),
            )?;
        }
    }

    let blocks = across as usize * down as usize;
    let mut offsets = Vec::with_capacity(blocks);
    let mut byte_counts = Vec::with_capacity(blocks);
    let mut strip = Vec::new();
    let mut expanded = Vec::new();
    let mut buffer = vec![fill; block as usize * block as usize * bands];

    for by in 0..down {
        let y0 = by * block;
        let rows = (height - y0).min(block);

        strip.clear();
        source.read_rows(y0, rows, &mut strip)?;
        if strip.len() != source_row_len * rows as usize {
            return Err(CogError::InvalidRaster(format!(
                "rows {}..{} yielded {} samples, expected {}",
                y0,
                y0 + rows,
                strip.len(),
                source_row_len * rows as usize
            )));
        }
        for row in strip.chunks_exact(source_row_len) {
            for builder in overviews.iter_mut() {
                builder.push_row(row);
            }
        }

        let samples = layout.apply(&strip, &mut expanded);
        for bx in 0..across {
            let data = encode_block(&mut buffer, samples, width, bands, bx * block, options)?;
            let offset = dir.write_data(data.as_slice())?;
            offsets.push(u32::try_from(offset).map_err(|_| CogError::FileTooLarge)?);
            byte_counts.push(u32::try_from(data.len()).map_err(|_| CogError::FileTooLarge)?);
        }
    }

    dir.write_tag(Tag::TileOffsets, offsets.as_slice())?;
    dir.write_tag(Tag::TileByteCounts, byte_counts.as_slice())?;

    dir.finish()?;
    Ok(())
}

/// Cuts the block starting at column `x0` out of a strip of whole rows,
/// pads it to a full block, predicts and compresses it.
fn encode_block(
    buffer: &mut [u8],
    strip: &[u8],
    width: u32,
    bands: usize,
    x0: u32,
    options: &CogOptions,
) -> Result<Vec<u8>, CogError> {
    let block = options.block_size;
    let row_len = block as usize * bands;
    let strip_row_len = width as usize * bands;
    let copy_width = (width - x0).min(block) as usize * bands;

    buffer.fill(options.nodata.unwrap_or(0));
    for (dy, src) in strip.chunks_exact(strip_row_len).enumerate() {
        let start = dy * row_len;
        buffer[start..start + copy_width]
            .copy_from_slice(&src[x0 as usize * bands..][..copy_width]);
    }

    for row in buffer.chunks_exact_mut(row_len) {
        apply_horizontal_predictor(row, bands);
    }

    compress(buffer, options.deflate_level)
}

/// Replaces each sample with its difference from the same band of the
/// previous pixel (TIFF predictor 2).
fn apply_horizontal_predictor(row: &mut [u8], samples_per_pixel: usize) {
    for i in (samples_per_pixel..row.len()).rev() {
        row[i] = row[i].wrapping_sub(row[i - samples_per_pixel]);
    }
}

fn compress(data: &[u8], level: u32) -> Result<Vec<u8>, CogError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
