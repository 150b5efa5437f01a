//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::file::{ConfigFile, ConfigFileError};

/// Parses an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [wms] section
    if let Some(section) = ini.section(Some("wms")) {
        if let Some(v) = section.get("endpoint") {
            let v = v.trim();
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(invalid("wms", "endpoint", v, "must be an http(s) URL"));
            }
            config.wms.endpoint = v.to_string();
        }
        if let Some(v) = section.get("timeout") {
            config.wms.timeout = parse_positive("wms", "timeout", v, "seconds")?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = Some(expand_tilde(v));
            }
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("block_size") {
            let size: u32 = parse_positive("output", "block_size", v, "pixels")?;
            if size % 16 != 0 {
                return Err(invalid("output", "block_size", v, "must be a multiple of 16"));
            }
            config.output.block_size = size;
        }
        if let Some(v) = section.get("deflate_level") {
            config.output.deflate_level = match v.trim().parse::<u32>() {
                Ok(level) if level <= 9 => level,
                _ => return Err(invalid("output", "deflate_level", v, "must be 0-9")),
            };
        }
        if let Some(v) = section.get("nodata") {
            config.output.nodata = v
                .trim()
                .parse()
                .map_err(|_| invalid("output", "nodata", v, "must be an integer 0-255"))?;
        }
        if let Some(v) = section.get("overviews") {
            config.output.overviews = parse_overviews(v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = Some(expand_tilde(v));
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_positive<T>(section: &str, key: &str, value: &str, unit: &str) -> Result<T, ConfigFileError>
where
    T: FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(invalid(
            section,
            key,
            value,
            &format!("must be a positive integer ({})", unit),
        )),
    }
}

/// Parses a comma-separated list of overview factors. An empty value
/// disables overviews.
fn parse_overviews(value: &str) -> Result<Vec<u32>, ConfigFileError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<u32>() {
            Ok(factor) if factor >= 2 => Ok(factor),
            _ => Err(invalid(
                "output",
                "overviews",
                value,
                "expected comma-separated integers of at least 2",
            )),
        })
        .collect()
}

/// Expands a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
