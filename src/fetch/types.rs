//! Common types for the fetch module

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fetch error types
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP fetch options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
