//! Named regions and bounding-box parsing.

use super::{BoundingBox, CoordError};

/// Predefined regions as (name, west, south, east, north).
const REGIONS: &[(&str, f64, f64, f64, f64)] = &[
    ("global", -180.0, -90.0, 180.0, 90.0),
    ("europe", -25.0, 35.0, 45.0, 72.0),
    ("asia", 60.0, -10.0, 150.0, 55.0),
    ("africa", -20.0, -35.0, 55.0, 40.0),
    ("north_america", -170.0, 15.0, -50.0, 75.0),
    ("south_america", -82.0, -56.0, -34.0, 13.0),
    ("oceania", 110.0, -50.0, 180.0, 0.0),
];

/// Name used for output files when the area came from an explicit bbox.
pub const CUSTOM_REGION_NAME: &str = "custom";

/// Names of all predefined regions, in registry order.
pub fn region_names() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|(name, ..)| *name)
}

/// Looks up a predefined region by name (case-insensitive).
pub fn region_bbox(name: &str) -> Result<BoundingBox, CoordError> {
    let lower = name.to_lowercase();
    REGIONS
        .iter()
        .find(|(n, ..)| *n == lower)
        .ok_or_else(|| CoordError::UnknownRegion(name.to_string()))
        .and_then(|&(_, w, s, e, n)| BoundingBox::new(w, s, e, n))
}

/// Parses a `west,south,east,north` string.
///
/// Whitespace around each number is tolerated.
pub fn parse_bbox(input: &str) -> Result<BoundingBox, CoordError> {
    let values: Vec<f64> = input
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| CoordError::MalformedBbox(input.to_string()))?;

    match values.as_slice() {
        [w, s, e, n] => BoundingBox::new(*w, *s, *e, *n),
        _ => Err(CoordError::MalformedBbox(input.to_string())),
    }
}

/// Area of interest chosen on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaSelection {
    /// Region name, or [`CUSTOM_REGION_NAME`] for an explicit bbox
    pub name: String,
    /// Resolved bounding box
    pub bbox: BoundingBox,
}

/// Resolves exactly one of `region` or `bbox` into an [`AreaSelection`].
pub fn resolve_area(region: Option<&str>, bbox: Option<&str>) -> Result<AreaSelection, CoordError> {
    match (region, bbox) {
        (Some(_), Some(_)) => Err(CoordError::ConflictingSelectors),
        (Some(name), None) => Ok(AreaSelection {
            name: name.to_lowercase(),
            bbox: region_bbox(name)?,
        }),
        (None, Some(raw)) => Ok(AreaSelection {
            name: CUSTOM_REGION_NAME.to_string(),
            bbox: parse_bbox(raw)?,
        }),
        (None, None) => Err(CoordError::MissingSelector),
    }
}
