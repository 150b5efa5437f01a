//! Remote map image providers
//!
//! A [`MapProvider`] turns a [`TileRequest`](crate::grid::TileRequest) into
//! encoded image bytes. The only implementation is [`WmsProvider`], which
//! talks to an OGC WMS through an [`HttpClient`].
//!
//! ```ignore
//! use geobatch::provider::{ReqwestClient, WmsProvider};
//!
//! let provider = WmsProvider::new(ReqwestClient::with_timeout(60)?);
//! ```

mod http;
mod types;
mod wms;

pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use types::{MapProvider, ProviderError};
pub use wms::{WmsProvider, DEFAULT_WMS_ENDPOINT};

#[cfg(test)]
pub use http::tests::{MockHttpClient, RecordingHttpClient};
