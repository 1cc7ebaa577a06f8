//! Finnhub API HTTP client

use crate::error::{FinnhubError, Result};
use crate::types::*;
use std::time::Duration;

/// Client for the Finnhub stock market data API
///
/// All endpoints share the same failure contract: HTTP 429 is surfaced as
/// the distinguished [`FinnhubError::RateLimited`] so that callers can fall
/// back to cached data instead of failing hard.
pub struct FinnhubClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FinnhubClient {
    /// Base URL for the Finnhub v1 API
    pub const BASE_URL: &'static str = "https://finnhub.io/api/v1";

    /// Create a new client with the default timeout (10 seconds)
    pub fn new(api_key: &str) -> Self {
        Self::with_timeout(api_key, Duration::from_secs(10))
    }

    /// Create a new client with a custom request timeout
    pub fn with_timeout(api_key: &str, timeout: Duration) -> Self {
        Self::with_base_url(api_key, timeout, Self::BASE_URL)
    }

    /// Create a new client against a custom base URL
    pub fn with_base_url(api_key: &str, timeout: Duration, base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let separator = if path_and_query.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}{}token={}",
            self.base_url, path_and_query, separator, self.api_key
        );

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FinnhubError::RateLimited);
        }
        if !status.is_success() {
            return Err(FinnhubError::Api(format!(
                "Finnhub returned status {}",
                status
            )));
        }

        Ok(response.json().await?)
    }

    /// Get a real-time quote for a symbol
    pub async fn quote(&self, symbol: &str) -> Result<Quote> {
        self.get_json(&format!("/quote?symbol={}", urlencoding::encode(symbol)))
            .await
    }

    /// Get the company profile for a symbol
    pub async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        self.get_json(&format!(
            "/stock/profile2?symbol={}",
            urlencoding::encode(symbol)
        ))
        .await
    }

    /// Get general market news for a category (e.g. "general", "forex", "crypto")
    pub async fn market_news(&self, category: &str) -> Result<Vec<NewsArticle>> {
        self.get_json(&format!("/news?category={}", urlencoding::encode(category)))
            .await
    }

    /// Get company news for a symbol within a date range (YYYY-MM-DD)
    pub async fn company_news(&self, symbol: &str, from: &str, to: &str) -> Result<Vec<NewsArticle>> {
        self.get_json(&format!(
            "/company-news?symbol={}&from={}&to={}",
            urlencoding::encode(symbol),
            urlencoding::encode(from),
            urlencoding::encode(to)
        ))
        .await
    }
}
