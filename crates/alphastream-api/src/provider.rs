//! Provider gateway seam for the bulk refresh path

use alphastream_db::UpsertStockParams;
use async_trait::async_trait;
use finnhub_client::{CompanyProfile, FinnhubClient, FinnhubError, Quote};
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::sync::Arc;
use tracing::warn;

/// Simultaneous in-flight provider calls during a bulk fetch. Kept low so a
/// bulk refresh does not burn through the per-minute quota in one burst.
const FETCH_CONCURRENCY: usize = 4;

/// Source of the full tracked dataset for bulk refresh.
///
/// The one distinguished failure is rate limiting: implementations must
/// surface it as [`FinnhubError::RateLimited`] and abort the batch, because
/// hammering a throttled provider with the remaining symbols only extends
/// the penalty window.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Tag recorded in the refresh audit log
    fn source_name(&self) -> &'static str;

    /// Fetch the full dataset. Individual symbols that fail for reasons
    /// other than throttling are skipped, not fatal.
    async fn fetch_batch(&self) -> Result<Vec<UpsertStockParams>, FinnhubError>;
}

/// Finnhub-backed source that snapshots a fixed universe of tickers
pub struct FinnhubUniverse {
    client: Arc<FinnhubClient>,
    symbols: Vec<String>,
}

impl FinnhubUniverse {
    pub fn new(client: Arc<FinnhubClient>, symbols: Vec<String>) -> Self {
        Self { client, symbols }
    }

    async fn fetch_symbol(&self, symbol: &str) -> Result<Option<UpsertStockParams>, FinnhubError> {
        let (quote, profile) = tokio::join!(
            self.client.quote(symbol),
            self.client.company_profile(symbol)
        );

        let quote = quote?;
        if quote.is_empty() {
            warn!(ticker = %symbol, "Finnhub returned an empty quote; skipping");
            return Ok(None);
        }

        // A missing profile degrades the row, it does not invalidate the
        // quote. Rate limiting still aborts.
        let profile = match profile {
            Ok(p) => p,
            Err(e) if e.is_rate_limited() => return Err(e),
            Err(e) => {
                warn!(ticker = %symbol, error = %e, "Profile fetch failed; using quote only");
                CompanyProfile::default()
            }
        };

        Ok(Some(snapshot_params(symbol, &quote, &profile)))
    }
}

#[async_trait]
impl MarketDataSource for FinnhubUniverse {
    fn source_name(&self) -> &'static str {
        "finnhub"
    }

    async fn fetch_batch(&self) -> Result<Vec<UpsertStockParams>, FinnhubError> {
        let mut fetches = Vec::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            fetches.push(
                self.fetch_symbol(symbol)
                    .map(move |result| (symbol.as_str(), result)),
            );
        }
        let results: Vec<_> = stream::iter(fetches)
            .buffer_unordered(FETCH_CONCURRENCY)
            .collect()
            .await;

        let mut batch = Vec::with_capacity(results.len());
        for (symbol, result) in results {
            match result {
                Ok(Some(params)) => batch.push(params),
                Ok(None) => {}
                Err(e) if e.is_rate_limited() => return Err(e),
                Err(e) => {
                    warn!(ticker = %symbol, error = %e, "Skipping symbol that failed to fetch");
                }
            }
        }
        Ok(batch)
    }
}

/// Build upsert parameters from one quote + profile snapshot. Fields the
/// provider does not cover stay `None`; the store keeps its previous values
/// for those.
fn snapshot_params(symbol: &str, quote: &Quote, profile: &CompanyProfile) -> UpsertStockParams {
    UpsertStockParams {
        ticker: symbol.to_uppercase(),
        name: profile
            .name
            .clone()
            .unwrap_or_else(|| symbol.to_uppercase()),
        industry: profile.industry.clone(),
        price: Some(quote.current),
        change_1d: quote.percent_change,
        high_1d: Some(quote.high),
        low_1d: Some(quote.low),
        // Finnhub reports both in millions
        market_cap: profile.market_capitalization.map(|m| m * 1_000_000.0),
        shares_outstanding: profile.share_outstanding.map(|s| s * 1_000_000.0),
        website: profile.weburl.clone(),
        data_source: Some("finnhub".to_string()),
        is_sp500: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_params_scales_millions() {
        let quote = Quote {
            current: 261.74,
            change: Some(1.17),
            percent_change: Some(0.449),
            high: 263.31,
            low: 260.68,
            open: 261.07,
            previous_close: 260.57,
            timestamp: Some(1582641000),
        };
        let profile = CompanyProfile {
            name: Some("Apple Inc".into()),
            industry: Some("Technology".into()),
            market_capitalization: Some(1_415_993.0),
            share_outstanding: Some(4375.48),
            weburl: Some("https://www.apple.com/".into()),
            ..Default::default()
        };

        let params = snapshot_params("aapl", &quote, &profile);
        assert_eq!(params.ticker, "AAPL");
        assert_eq!(params.name, "Apple Inc");
        assert_eq!(params.price, Some(261.74));
        assert_eq!(params.change_1d, Some(0.449));
        assert_eq!(params.market_cap, Some(1_415_993_000_000.0));
        assert_eq!(params.shares_outstanding, Some(4_375_480_000.0));
        assert_eq!(params.data_source.as_deref(), Some("finnhub"));
        // fundamentals the provider cannot supply stay absent
        assert!(params.pe_ratio.is_none());
        assert!(params.sector.is_none());
    }

    #[test]
    fn test_snapshot_params_without_profile() {
        let quote = Quote {
            current: 10.0,
            change: None,
            percent_change: None,
            high: 10.5,
            low: 9.5,
            open: 10.0,
            previous_close: 10.0,
            timestamp: None,
        };
        let params = snapshot_params("XYZ", &quote, &CompanyProfile::default());
        assert_eq!(params.name, "XYZ");
        assert!(params.market_cap.is_none());
    }
}
