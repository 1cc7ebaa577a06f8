//! Finnhub API response types

use serde::Deserialize;

/// Real-time quote from `GET /quote`
///
/// Finnhub returns all-zero quotes for unknown symbols rather than a 404;
/// callers should treat `current == 0.0 && previous_close == 0.0` as absent.
#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    /// Current price
    #[serde(rename = "c")]
    pub current: f64,
    /// Change since previous close
    #[serde(rename = "d", default)]
    pub change: Option<f64>,
    /// Percent change since previous close
    #[serde(rename = "dp", default)]
    pub percent_change: Option<f64>,
    /// High price of the day
    #[serde(rename = "h")]
    pub high: f64,
    /// Low price of the day
    #[serde(rename = "l")]
    pub low: f64,
    /// Open price of the day
    #[serde(rename = "o")]
    pub open: f64,
    /// Previous close price
    #[serde(rename = "pc")]
    pub previous_close: f64,
    /// Unix timestamp of the quote
    #[serde(rename = "t", default)]
    pub timestamp: Option<i64>,
}

impl Quote {
    /// Finnhub signals "symbol not found" with an all-zero quote
    pub fn is_empty(&self) -> bool {
        self.current == 0.0 && self.previous_close == 0.0 && self.timestamp.unwrap_or(0) == 0
    }
}

/// Company profile from `GET /stock/profile2`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub ticker: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    #[serde(rename = "finnhubIndustry")]
    pub industry: Option<String>,
    /// Market capitalization in millions
    #[serde(rename = "marketCapitalization")]
    pub market_capitalization: Option<f64>,
    /// Shares outstanding in millions
    #[serde(rename = "shareOutstanding")]
    pub share_outstanding: Option<f64>,
    pub ipo: Option<String>,
    pub weburl: Option<String>,
    pub logo: Option<String>,
}

/// News article from `GET /news` and `GET /company-news`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewsArticle {
    pub id: Option<i64>,
    pub category: Option<String>,
    /// Unix timestamp of publication
    pub datetime: Option<i64>,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    /// Related ticker symbols, comma separated
    pub related: Option<String>,
}
