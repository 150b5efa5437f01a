//! Persistent tile cache
//!
//! Each distinct request (layer, extent, pixel size) is hashed with SHA-256
//! and stored as one bincode file. The cache is shared between runs and is
//! append-only.

mod disk;
mod key;

pub use disk::{default_cache_dir, DiskTileCache};
pub use key::CacheKey;
