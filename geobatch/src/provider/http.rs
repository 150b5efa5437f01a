//! HTTP client abstraction for testability

use std::time::Duration;

use super::types::ProviderError;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Trait for HTTP client operations.
///
/// Lets tests swap the network for canned responses.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Blocking HTTP client backed by reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the default 60 second timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("geobatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ProviderError::HttpError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ProviderError::HttpError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::HttpError(format!("Failed to read response: {}", e)))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock HTTP client for testing
    pub struct MockHttpClient {
        pub response: Result<Vec<u8>, ProviderError>,
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, _url: &str) -> Result<Vec<u8>, ProviderError> {
            self.response.clone()
        }
    }

    /// Mock that records every URL and counts calls
    pub struct RecordingHttpClient {
        pub response: Result<Vec<u8>, ProviderError>,
        pub calls: AtomicUsize,
        pub urls: Mutex<Vec<String>>,
    }

    impl RecordingHttpClient {
        pub fn new(response: Result<Vec<u8>, ProviderError>) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            self.response.clone()
        }
    }

    #[test]
    fn test_mock_client_success() {
        let mock = MockHttpClient {
            response: Ok(vec![1, 2, 3, 4]),
        };

        let result = mock.get("http://example.com");
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_mock_client_error() {
        let mock = MockHttpClient {
            response: Err(ProviderError::HttpError("Test error".to_string())),
        };

        assert!(mock.get("http://example.com").is_err());
    }

    #[test]
    fn test_recording_client_counts() {
        let mock = RecordingHttpClient::new(Ok(vec![0]));
        mock.get("http://a").unwrap();
        mock.get("http://b").unwrap();
        assert_eq!(mock.call_count(), 2);
        assert_eq!(*mock.urls.lock().unwrap(), vec!["http://a", "http://b"]);
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::with_timeout(5).is_ok());
    }
}
