//! Configuration file support
//!
//! Optional INI file at `~/.geobatch/config.ini`:
//!
//! ```ini
//! [wms]
//! endpoint = https://geoservice.dlr.de/eoc/land/wms
//! timeout = 60
//!
//! [cache]
//! directory = ~/.cache/geobatch/tiles
//!
//! [output]
//! block_size = 512
//! deflate_level = 9
//! nodata = 128
//! overviews = 2,4,8,16,32
//!
//! [logging]
//! file = ~/.geobatch/geobatch.log
//! ```
//!
//! Every key is optional; a missing file yields the defaults shown.

mod file;
mod parser;

pub use file::{
    config_directory, config_file_path, CacheSettings, ConfigFile, ConfigFileError,
    LoggingSettings, OutputSettings, WmsSettings,
};
