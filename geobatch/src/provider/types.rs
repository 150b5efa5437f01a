//! Provider trait and error type.

use crate::grid::TileRequest;

/// Source of rendered map images for tile requests.
pub trait MapProvider: Send + Sync {
    /// Fetches the encoded image (PNG, JPEG) covering `request`.
    fn get_map(&self, request: &TileRequest) -> Result<Vec<u8>, ProviderError>;

    /// Short provider name for log fields.
    fn name(&self) -> &str;
}

/// Errors from fetching map images.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Transport failure or non-success HTTP status
    HttpError(String),
    /// The request URL could not be built
    InvalidUrl(String),
    /// The service answered, but not with an image
    InvalidResponse(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::HttpError("HTTP 503".to_string());
        assert_eq!(err.to_string(), "HTTP error: HTTP 503");

        let err = ProviderError::InvalidResponse("empty body".to_string());
        assert!(err.to_string().contains("empty body"));
    }
}
