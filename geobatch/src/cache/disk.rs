//! On-disk tile cache.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::key::CacheKey;
use crate::fetch::TileBlock;

/// Directory of `tile_{sha256}.bin` files, one per distinct request.
///
/// Entries are never evicted. Writes go through a per-process temp file and
/// a rename, so a reader sees either nothing or a complete entry.
#[derive(Debug, Clone)]
pub struct DiskTileCache {
    directory: PathBuf,
}

impl DiskTileCache {
    /// Opens (without creating) a cache rooted at `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Cache root.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Full path of the entry for `key`.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.directory.join(key.file_name())
    }

    /// Looks up a block of exactly `width × height` pixels.
    ///
    /// A missing, unreadable or mismatched entry is a miss.
    pub fn get(&self, key: &CacheKey, width: u32, height: u32) -> Option<TileBlock> {
        let path = self.entry_path(key);
        let file = File::open(&path).ok()?;

        let block: TileBlock = match bincode::deserialize_from(BufReader::new(file)) {
            Ok(block) => block,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt cache entry");
                return None;
            }
        };

        if block.width() != width || block.height() != height || !block.is_consistent() {
            warn!(
                path = %path.display(),
                expected_width = width,
                expected_height = height,
                "Ignoring cache entry with unexpected dimensions"
            );
            return None;
        }

        debug!(key = key.normalized(), "Cache hit");
        Some(block)
    }

    /// Stores a block under `key`.
    pub fn put(&self, key: &CacheKey, block: &TileBlock) -> io::Result<()> {
        fs::create_dir_all(&self.directory)?;

        let path = self.entry_path(key);
        let temp_path = self
            .directory
            .join(format!("{}.{}.tmp", key.file_name(), std::process::id()));

        let write_result = File::create(&temp_path).and_then(|file| {
            bincode::serialize_into(BufWriter::new(file), block)
                .map_err(|e| io::Error::other(format!("Failed to serialize tile: {}", e)))
        });
        if let Err(e) = write_result {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::rename(&temp_path, &path)?;
        debug!(key = key.normalized(), path = %path.display(), "Cached tile");
        Ok(())
    }

    /// Number of complete entries on disk.
    pub fn entry_count(&self) -> usize {
        fs::read_dir(&self.directory)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| {
                        let name = e.file_name();
                        let name = name.to_string_lossy();
                        name.starts_with("tile_") && name.ends_with(".bin")
                    })
                    .count()
            })
            .unwrap_or(0)
    }
}

/// Default cache directory, `<user cache dir>/geobatch/tiles`.
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("geobatch").join("tiles"))
}
