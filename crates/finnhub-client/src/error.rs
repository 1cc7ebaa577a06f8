//! Error types for Finnhub API client

use std::fmt;

/// Errors that can occur when interacting with the Finnhub API
#[derive(Debug)]
pub enum FinnhubError {
    /// Finnhub returned HTTP 429. This is the only error callers may
    /// answer by serving previously cached data.
    RateLimited,
    /// HTTP request failed (connect, TLS, timeout, body decode)
    Http(reqwest::Error),
    /// Finnhub returned a non-success status other than 429
    Api(String),
}

impl FinnhubError {
    /// True when the provider is throttling us rather than failing
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

impl fmt::Display for FinnhubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "Finnhub rate limit exceeded"),
            Self::Http(e) => write!(f, "Finnhub HTTP error: {}", e),
            Self::Api(msg) => write!(f, "Finnhub API error: {}", msg),
        }
    }
}

impl std::error::Error for FinnhubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FinnhubError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

/// Result type for Finnhub API operations
pub type Result<T> = std::result::Result<T, FinnhubError>;
