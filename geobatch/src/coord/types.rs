//! Coordinate type definitions

use std::fmt;

/// Valid latitude range (geographic degrees)
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range (geographic degrees)
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Geographic bounding box in EPSG:4326 degrees.
///
/// Invariant: `west < east` and `south < north`, all values finite and inside
/// the valid lat/lon ranges. Use [`BoundingBox::new`] to construct one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western edge (minimum longitude)
    pub west: f64,
    /// Southern edge (minimum latitude)
    pub south: f64,
    /// Eastern edge (maximum longitude)
    pub east: f64,
    /// Northern edge (maximum latitude)
    pub north: f64,
}

impl BoundingBox {
    /// Creates a validated bounding box.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, CoordError> {
        for (name, value) in [
            ("west", west),
            ("south", south),
            ("east", east),
            ("north", north),
        ] {
            if !value.is_finite() {
                return Err(CoordError::NonFinite(name));
            }
        }
        if !(MIN_LON..=MAX_LON).contains(&west) {
            return Err(CoordError::InvalidLongitude(west));
        }
        if !(MIN_LON..=MAX_LON).contains(&east) {
            return Err(CoordError::InvalidLongitude(east));
        }
        if !(MIN_LAT..=MAX_LAT).contains(&south) {
            return Err(CoordError::InvalidLatitude(south));
        }
        if !(MIN_LAT..=MAX_LAT).contains(&north) {
            return Err(CoordError::InvalidLatitude(north));
        }
        if west >= east {
            return Err(CoordError::EmptyLongitudeSpan { west, east });
        }
        if south >= north {
            return Err(CoordError::EmptyLatitudeSpan { south, north });
        }

        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// Longitude extent in degrees.
    #[inline]
    pub fn width_deg(&self) -> f64 {
        self.east - self.west
    }

    /// Latitude extent in degrees.
    #[inline]
    pub fn height_deg(&self) -> f64 {
        self.north - self.south
    }

    /// Returns true if the point lies inside or on the edge of the box.
    #[inline]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }
}

/// Formats as `west,south,east,north`, the same order the CLI accepts.
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

/// Errors that can occur when building or parsing coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range (-90 to 90)
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180 to 180)
    InvalidLongitude(f64),
    /// A coordinate is NaN or infinite
    NonFinite(&'static str),
    /// west >= east
    EmptyLongitudeSpan { west: f64, east: f64 },
    /// south >= north
    EmptyLatitudeSpan { south: f64, north: f64 },
    /// Bounding box string could not be parsed
    MalformedBbox(String),
    /// Region name is not in the registry
    UnknownRegion(String),
    /// Neither a region nor a bounding box was given
    MissingSelector,
    /// Both a region and a bounding box were given
    ConflictingSelectors,
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::NonFinite(edge) => write!(f, "Bounding box {} is not a finite number", edge),
            CoordError::EmptyLongitudeSpan { west, east } => {
                write!(f, "Bounding box west ({}) must be less than east ({})", west, east)
            }
            CoordError::EmptyLatitudeSpan { south, north } => {
                write!(
                    f,
                    "Bounding box south ({}) must be less than north ({})",
                    south, north
                )
            }
            CoordError::MalformedBbox(input) => {
                write!(
                    f,
                    "Malformed bounding box '{}' (expected 'west,south,east,north')",
                    input
                )
            }
            CoordError::UnknownRegion(name) => write!(f, "Unknown region: '{}'", name),
            CoordError::MissingSelector => write!(f, "Must specify either a region or a bbox"),
            CoordError::ConflictingSelectors => {
                write!(f, "Specify either a region or a bbox, not both")
            }
        }
    }
}

impl std::error::Error for CoordError {}
