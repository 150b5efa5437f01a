//! GeoTIFF georeferencing tags.

use std::io::{Read, Seek, Write};

use tiff::decoder::Decoder;
use tiff::encoder::{DirectoryEncoder, TiffKind};
use tiff::tags::Tag;

use super::CogError;
use crate::coord::GeoTransform;

pub(crate) const MODEL_PIXEL_SCALE: u16 = 33550;
pub(crate) const MODEL_TIEPOINT: u16 = 33922;
pub(crate) const GEO_KEY_DIRECTORY: u16 = 34735;
pub(crate) const GEO_DOUBLE_PARAMS: u16 = 34736;
pub(crate) const GEO_ASCII_PARAMS: u16 = 34737;

// GeoKey IDs
const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;

// GeoKey values
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;
const EPSG_WGS84: u16 = 4326;

/// Raw georeferencing tags of one GeoTIFF.
///
/// Kept as plain tag values so a converter can copy them from an input file
/// to an output file without interpreting every key.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTags {
    pub pixel_scale: Vec<f64>,
    pub tiepoint: Vec<f64>,
    pub geo_keys: Vec<u16>,
    pub double_params: Option<Vec<f64>>,
    pub ascii_params: Option<String>,
}

impl GeoTags {
    /// Tags for a north-up EPSG:4326 raster (geographic model, pixel is area).
    pub fn wgs84(transform: &GeoTransform) -> Self {
        Self {
            pixel_scale: transform.model_pixel_scale().to_vec(),
            tiepoint: transform.model_tiepoint().to_vec(),
            geo_keys: vec![
                1, 1, 0, 3, // version 1.1.0, 3 keys
                GT_MODEL_TYPE_GEO_KEY, 0, 1, MODEL_TYPE_GEOGRAPHIC,
                GT_RASTER_TYPE_GEO_KEY, 0, 1, RASTER_PIXEL_IS_AREA,
                GEOGRAPHIC_TYPE_GEO_KEY, 0, 1, EPSG_WGS84,
            ],
            double_params: None,
            ascii_params: None,
        }
    }

    /// Affine transform implied by the scale and tiepoint.
    pub fn transform(&self) -> Option<GeoTransform> {
        GeoTransform::from_tiepoint(&self.tiepoint, &self.pixel_scale)
    }

    /// EPSG code of the geographic CRS key, if present.
    pub fn geographic_epsg(&self) -> Option<u16> {
        self.geo_keys
            .get(4..)?
            .chunks_exact(4)
            .find(|entry| entry[0] == GEOGRAPHIC_TYPE_GEO_KEY && entry[1] == 0)
            .map(|entry| entry[3])
    }

    pub(crate) fn write<W: Write + Seek, K: TiffKind>(
        &self,
        dir: &mut DirectoryEncoder<W, K>,
    ) -> Result<(), CogError> {
        dir.write_tag(
            Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE),
            self.pixel_scale.as_slice(),
        )?;
        dir.write_tag(
            Tag::from_u16_exhaustive(MODEL_TIEPOINT),
            self.tiepoint.as_slice(),
        )?;
        dir.write_tag(
            Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY),
            self.geo_keys.as_slice(),
        )?;
        if let Some(params) = &self.double_params {
            dir.write_tag(Tag::from_u16_exhaustive(GEO_DOUBLE_PARAMS), params.as_slice())?;
        }
        if let Some(params) = &self.ascii_params {
            dir.write_tag(Tag::from_u16_exhaustive(GEO_ASCII_PARAMS), params.as_str())?;
        }
        Ok(())
    }

    /// Reads the tags from the current image of `decoder`.
    ///
    /// Returns `None` when the file is not georeferenced.
    pub(crate) fn read<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<Self> {
        let pixel_scale = decoder
            .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE))
            .ok()?;
        let tiepoint = decoder
            .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_TIEPOINT))
            .ok()?;
        let geo_keys = decoder
            .get_tag_u16_vec(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY))
            .unwrap_or_default();
        let double_params = decoder
            .get_tag_f64_vec(Tag::from_u16_exhaustive(GEO_DOUBLE_PARAMS))
            .ok();
        let ascii_params = decoder
            .get_tag_ascii_string(Tag::from_u16_exhaustive(GEO_ASCII_PARAMS))
            .ok();

        Some(Self {
            pixel_scale,
            tiepoint,
            geo_keys,
            double_params,
            ascii_params,
        })
    }
}
