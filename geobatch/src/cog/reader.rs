//! 8-bit GeoTIFF reader.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tiff::ColorType;
use tracing::debug;

use super::geo::GeoTags;
use super::metadata::{self, GDAL_METADATA, GDAL_NODATA};
use super::writer::RowSource;
use super::{CogError, Raster};

/// A raster read from disk together with the tags needed to write it back
/// out georeferenced.
#[derive(Debug, Clone)]
pub struct GeoRaster {
    pub raster: Raster,
    pub geo: Option<GeoTags>,
    pub nodata: Option<u8>,
    pub metadata: Vec<(String, String)>,
    /// Number of IFDs after the first (usually overviews)
    pub extra_images: usize,
}

/// Reads the first image of an 8-bit gray or RGB GeoTIFF.
pub fn read_geotiff(path: &Path) -> Result<GeoRaster, CogError> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?.with_limits(Limits::unlimited());

    let (width, height) = decoder.dimensions()?;
    let bands = sample_bands(&mut decoder, path)?;
    let tags = ImageTags::read(&mut decoder);

    let pixels = match decoder.read_image()? {
        DecodingResult::U8(data) => data,
        _ => return Err(not_8bit(path)),
    };

    let mut extra_images = 0;
    while decoder.more_images() {
        decoder.next_image()?;
        extra_images += 1;
    }

    debug!(
        path = %path.display(),
        width,
        height,
        bands,
        georeferenced = tags.geo.is_some(),
        "Read GeoTIFF"
    );

    Ok(GeoRaster {
        raster: Raster::new(width, height, bands, pixels)?,
        geo: tags.geo,
        nodata: tags.nodata,
        metadata: tags.metadata,
        extra_images,
    })
}

/// The first image of an 8-bit GeoTIFF, decoded one chunk row at a time.
///
/// Works for tiled and stripped files alike; only the chunks covering the
/// rows last asked for are kept in memory.
pub struct GeoTiffRows {
    decoder: Decoder<BufReader<File>>,
    path: PathBuf,
    width: u32,
    height: u32,
    bands: u16,
    chunk_width: u32,
    chunk_height: u32,
    chunks_across: u32,
    loaded_row: Option<u32>,
    chunks: Vec<Vec<u8>>,
    tags: ImageTags,
}

impl GeoTiffRows {
    pub fn open(path: &Path) -> Result<Self, CogError> {
        let file = File::open(path)?;
        let mut decoder = Decoder::new(BufReader::new(file))?.with_limits(Limits::unlimited());

        let (width, height) = decoder.dimensions()?;
        let bands = sample_bands(&mut decoder, path)?;
        if bands > 1
            && decoder
                .find_tag_unsigned::<u16>(Tag::PlanarConfiguration)?
                .is_some_and(|planar| planar != 1)
        {
            return Err(CogError::Unsupported {
                path: path.to_path_buf(),
                reason: "band-sequential (planar) layout".to_string(),
            });
        }
        let tags = ImageTags::read(&mut decoder);

        let (chunk_width, chunk_height) = decoder.chunk_dimensions();
        if chunk_width == 0 || chunk_height == 0 {
            return Err(CogError::Unsupported {
                path: path.to_path_buf(),
                reason: format!("empty {}x{} chunks", chunk_width, chunk_height),
            });
        }

        debug!(
            path = %path.display(),
            width,
            height,
            bands,
            chunk_width,
            chunk_height,
            "Opened GeoTIFF for streaming"
        );

        Ok(Self {
            decoder,
            path: path.to_path_buf(),
            width,
            height,
            bands,
            chunk_width,
            chunk_height,
            chunks_across: width.div_ceil(chunk_width),
            loaded_row: None,
            chunks: Vec::new(),
            tags,
        })
    }

    pub fn geo(&self) -> Option<&GeoTags> {
        self.tags.geo.as_ref()
    }

    pub fn nodata(&self) -> Option<u8> {
        self.tags.nodata
    }

    pub fn metadata(&self) -> &[(String, String)] {
        &self.tags.metadata
    }

    fn load_chunk_row(&mut self, chunk_row: u32) -> Result<(), CogError> {
        self.chunks.clear();
        let rows = (self.height - chunk_row * self.chunk_height).min(self.chunk_height) as usize;
        for cx in 0..self.chunks_across {
            let index = chunk_row * self.chunks_across + cx;
            let data = match self.decoder.read_chunk(index)? {
                DecodingResult::U8(data) => data,
                _ => return Err(not_8bit(&self.path)),
            };
            let columns = (self.width - cx * self.chunk_width).min(self.chunk_width) as usize;
            if data.len() != columns * rows * self.bands as usize {
                return Err(CogError::Tiff(format!(
                    "chunk {} of {} decoded to {} samples, expected {}",
                    index,
                    self.path.display(),
                    data.len(),
                    columns * rows * self.bands as usize
                )));
            }
            self.chunks.push(data);
        }
        self.loaded_row = Some(chunk_row);
        Ok(())
    }
}

impl RowSource for GeoTiffRows {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn bands(&self) -> u16 {
        self.bands
    }

    fn read_rows(&mut self, y0: u32, count: u32, out: &mut Vec<u8>) -> Result<(), CogError> {
        let end = y0.saturating_add(count);
        if end > self.height {
            return Err(CogError::InvalidRaster(format!(
                "rows {}..{} outside an image of height {}",
                y0, end, self.height
            )));
        }
        let bands = self.bands as usize;
        for y in y0..end {
            let chunk_row = y / self.chunk_height;
            if self.loaded_row != Some(chunk_row) {
                self.load_chunk_row(chunk_row)?;
            }
            let line = (y - chunk_row * self.chunk_height) as usize;
            for (cx, data) in self.chunks.iter().enumerate() {
                let columns =
                    (self.width - cx as u32 * self.chunk_width).min(self.chunk_width) as usize;
                let stride = columns * bands;
                out.extend_from_slice(&data[line * stride..][..stride]);
            }
        }
        Ok(())
    }
}

/// Tags carried from an input image to a converted output.
#[derive(Debug, Clone)]
struct ImageTags {
    geo: Option<GeoTags>,
    nodata: Option<u8>,
    metadata: Vec<(String, String)>,
}

impl ImageTags {
    fn read<R: Read + Seek>(decoder: &mut Decoder<R>) -> Self {
        let geo = GeoTags::read(decoder);
        let nodata = decoder
            .get_tag_ascii_string(Tag::from_u16_exhaustive(GDAL_NODATA))
            .ok()
            .and_then(|s| parse_nodata(&s));
        let metadata = decoder
            .get_tag_ascii_string(Tag::from_u16_exhaustive(GDAL_METADATA))
            .map(|xml| metadata::from_xml(&xml))
            .unwrap_or_default();
        Self {
            geo,
            nodata,
            metadata,
        }
    }
}

fn sample_bands<R: Read + Seek>(decoder: &mut Decoder<R>, path: &Path) -> Result<u16, CogError> {
    match decoder.colortype()? {
        ColorType::Gray(8) => Ok(1),
        ColorType::RGB(8) => Ok(3),
        other => Err(CogError::Unsupported {
            path: path.to_path_buf(),
            reason: format!("expected 8-bit gray or RGB, found {:?}", other),
        }),
    }
}

fn not_8bit(path: &Path) -> CogError {
    CogError::Unsupported {
        path: path.to_path_buf(),
        reason: "sample type is not 8-bit unsigned".to_string(),
    }
}

/// Parses a `GDAL_NODATA` string into an 8-bit value.
///
/// Values outside 0-255 cannot occur in an 8-bit band and are ignored.
fn parse_nodata(text: &str) -> Option<u8> {
    let value: f64 = text.trim().trim_end_matches('\0').parse().ok()?;
    if value.fract() == 0.0 && (0.0..=255.0).contains(&value) {
        Some(value as u8)
    } else {
        None
    }
}
