//! OGC Web Map Service (WMS 1.3.0) provider.
//!
//! Issues `GetMap` requests in EPSG:4326. WMS 1.3.0 uses the axis order of
//! the CRS definition, which for EPSG:4326 is latitude first, so `BBOX` is
//! sent as `south,west,north,east`.

use reqwest::Url;
use tracing::debug;

use super::http::HttpClient;
use super::types::{MapProvider, ProviderError};
use crate::grid::TileRequest;

/// DLR land-surface WMS that serves the GUF mosaics.
pub const DEFAULT_WMS_ENDPOINT: &str = "https://geoservice.dlr.de/eoc/land/wms";

/// WMS `GetMap` provider.
///
/// # Example
///
/// ```ignore
/// use geobatch::provider::{ReqwestClient, WmsProvider};
///
/// let provider = WmsProvider::new(ReqwestClient::new()?);
/// let png = provider.get_map(&request)?;
/// ```
pub struct WmsProvider<C: HttpClient> {
    http_client: C,
    endpoint: String,
}

impl<C: HttpClient> WmsProvider<C> {
    /// Creates a provider for the default DLR endpoint.
    pub fn new(http_client: C) -> Self {
        Self::with_endpoint(http_client, DEFAULT_WMS_ENDPOINT)
    }

    /// Creates a provider for a custom endpoint.
    pub fn with_endpoint(http_client: C, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Underlying HTTP client.
    pub fn http_client(&self) -> &C {
        &self.http_client
    }

    /// Builds the `GetMap` URL for a request.
    pub fn build_url(&self, request: &TileRequest) -> Result<Url, ProviderError> {
        let bbox = request.bbox();
        let bbox_param = format!("{},{},{},{}", bbox.south, bbox.west, bbox.north, bbox.east);
        let width = request.width().to_string();
        let height = request.height().to_string();

        Url::parse_with_params(
            &self.endpoint,
            &[
                ("SERVICE", "WMS"),
                ("VERSION", "1.3.0"),
                ("REQUEST", "GetMap"),
                ("LAYERS", request.layer()),
                ("STYLES", ""),
                ("CRS", "EPSG:4326"),
                ("BBOX", bbox_param.as_str()),
                ("WIDTH", width.as_str()),
                ("HEIGHT", height.as_str()),
                ("FORMAT", "image/png"),
                ("TRANSPARENT", "false"),
            ],
        )
        .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", self.endpoint, e)))
    }
}

impl<C: HttpClient> MapProvider for WmsProvider<C> {
    fn get_map(&self, request: &TileRequest) -> Result<Vec<u8>, ProviderError> {
        let url = self.build_url(request)?;
        debug!(row = request.row(), col = request.col(), url = %url, "WMS GetMap");

        let body = self.http_client.get(url.as_str())?;
        if body.is_empty() {
            return Err(ProviderError::InvalidResponse("empty body".to_string()));
        }
        Ok(body)
    }

    fn name(&self) -> &str {
        "WMS"
    }
}
