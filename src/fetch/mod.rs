//! Remote image retrieval
//!
//! [`ImageFetcher`] is the seam between the planner and the network. The
//! blocking [`HttpFetcher`] is the production implementation; tests supply
//! in-memory fetchers.

mod types;

pub use types::{FetchError, FetchOptions, Result, DEFAULT_TIMEOUT_SECS};

use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// Retrieves the raw bytes behind a URL
pub trait ImageFetcher {
    /// Fetch `url`, failing on transport errors and non-success responses
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher with a fixed per-request timeout
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher from options
    pub fn new(options: &FetchOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .user_agent(options.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {}", url);

        let request_error = |e: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(request_error)?;
        debug!("Received {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
