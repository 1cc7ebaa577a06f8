//! API response types
//!
//! Field names follow the camelCase wire format the terminal frontend
//! expects; the `/api/data/status` payload keeps its historical snake_case.

use alphastream_db::StockRow;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Compact stock row for universe listings and search results
#[derive(Debug, Clone, Serialize)]
pub struct StockSummary {
    pub ticker: String,
    pub name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "change1D")]
    pub change_1d: Option<f64>,
    #[serde(rename = "change1W")]
    pub change_1w: Option<f64>,
    #[serde(rename = "change1M")]
    pub change_1m: Option<f64>,
    #[serde(rename = "change1Y")]
    pub change_1y: Option<f64>,
    pub volume: Option<i64>,
    #[serde(rename = "peRatio")]
    pub pe_ratio: Option<f64>,
    pub eps: Option<f64>,
    #[serde(rename = "dividendYield")]
    pub dividend_yield: Option<f64>,
    #[serde(rename = "marketCap")]
    pub market_cap: Option<f64>,
    #[serde(rename = "netProfitMargin")]
    pub net_profit_margin: Option<f64>,
    #[serde(rename = "grossMargin")]
    pub gross_margin: Option<f64>,
    pub roe: Option<f64>,
    pub revenue: Option<f64>,
    pub beta: Option<f64>,
    #[serde(rename = "institutionalOwnership")]
    pub institutional_ownership: Option<f64>,
    #[serde(rename = "yearFounded")]
    pub year_founded: Option<i32>,
    pub website: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<StockRow> for StockSummary {
    fn from(row: StockRow) -> Self {
        Self {
            ticker: row.ticker,
            name: row.name,
            sector: row.sector,
            industry: row.industry,
            price: row.price,
            change_1d: row.change_1d,
            change_1w: row.change_1w,
            change_1m: row.change_1m,
            change_1y: row.change_1y,
            volume: row.volume,
            pe_ratio: row.pe_ratio,
            eps: row.eps,
            dividend_yield: row.dividend_yield,
            market_cap: row.market_cap,
            net_profit_margin: row.net_profit_margin,
            gross_margin: row.gross_margin,
            roe: row.roe,
            revenue: row.revenue_ttm,
            beta: row.beta,
            institutional_ownership: row.institutional_ownership,
            year_founded: row.year_founded,
            website: row.website,
            updated_at: row.last_updated,
        }
    }
}

/// Full stock detail for the single-ticker endpoint
#[derive(Debug, Clone, Serialize)]
pub struct StockDetail {
    #[serde(flatten)]
    pub summary: StockSummary,
    #[serde(rename = "change5Y")]
    pub change_5y: Option<f64>,
    #[serde(rename = "changeYTD")]
    pub change_ytd: Option<f64>,
    #[serde(rename = "high1D")]
    pub high_1d: Option<f64>,
    #[serde(rename = "low1D")]
    pub low_1d: Option<f64>,
    #[serde(rename = "high1M")]
    pub high_1m: Option<f64>,
    #[serde(rename = "low1M")]
    pub low_1m: Option<f64>,
    #[serde(rename = "high1Y")]
    pub high_1y: Option<f64>,
    #[serde(rename = "low1Y")]
    pub low_1y: Option<f64>,
    #[serde(rename = "high5Y")]
    pub high_5y: Option<f64>,
    #[serde(rename = "low5Y")]
    pub low_5y: Option<f64>,
    #[serde(rename = "sharesOutstanding")]
    pub shares_outstanding: Option<f64>,
    #[serde(rename = "debtToEquity")]
    pub debt_to_equity: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    #[serde(rename = "dataSource")]
    pub data_source: Option<String>,
}

impl From<StockRow> for StockDetail {
    fn from(row: StockRow) -> Self {
        let change_5y = row.change_5y;
        let change_ytd = row.change_ytd;
        let high_1d = row.high_1d;
        let low_1d = row.low_1d;
        let high_1m = row.high_1m;
        let low_1m = row.low_1m;
        let high_1y = row.high_1y;
        let low_1y = row.low_1y;
        let high_5y = row.high_5y;
        let low_5y = row.low_5y;
        let shares_outstanding = row.shares_outstanding;
        let debt_to_equity = row.debt_to_equity;
        let city = row.city.clone();
        let state = row.state.clone();
        let zip = row.zip.clone();
        let data_source = row.data_source.clone();
        Self {
            summary: row.into(),
            change_5y,
            change_ytd,
            high_1d,
            low_1d,
            high_1m,
            low_1m,
            high_1y,
            low_1y,
            high_5y,
            low_5y,
            shares_outstanding,
            debt_to_equity,
            city,
            state,
            zip,
            data_source,
        }
    }
}

/// Aggregated performance for one sector
#[derive(Debug, Clone, Serialize)]
pub struct SectorPerformance {
    pub sector: String,
    #[serde(rename = "change1D")]
    pub change_1d: f64,
    #[serde(rename = "change1W")]
    pub change_1w: f64,
    #[serde(rename = "change1M")]
    pub change_1m: f64,
    #[serde(rename = "stockCount")]
    pub stock_count: usize,
}

/// One side of the top-movers listing
#[derive(Debug, Clone, Serialize)]
pub struct MoverItem {
    pub ticker: String,
    pub name: String,
    pub price: Option<f64>,
    #[serde(rename = "change1D")]
    pub change_1d: Option<f64>,
    pub volume: Option<i64>,
}

impl From<StockRow> for MoverItem {
    fn from(row: StockRow) -> Self {
        Self {
            ticker: row.ticker,
            name: row.name,
            price: row.price,
            change_1d: row.change_1d,
            volume: row.volume,
        }
    }
}

/// A market news item served by the cache-backed news endpoints
#[derive(Debug, Clone, Serialize)]
pub struct MarketNewsItem {
    pub id: String,
    pub headline: String,
    pub summary: String,
    pub source: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub category: String,
    pub sentiment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickers: Option<Vec<String>>,
    pub url: Option<String>,
}

/// Quote snapshot for one market index ETF
#[derive(Debug, Clone, Serialize)]
pub struct IndexQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: Option<f64>,
    #[serde(rename = "percentChange")]
    pub percent_change: Option<f64>,
}

/// Broad market snapshot served by `/api/market-state`
#[derive(Debug, Clone, Serialize)]
pub struct MarketState {
    pub indices: Vec<IndexQuote>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> StockRow {
        StockRow {
            ticker: "AAPL".into(),
            name: "Apple Inc".into(),
            sector: Some("Technology".into()),
            industry: Some("Consumer Electronics".into()),
            price: Some(261.74),
            change_1d: Some(0.45),
            change_1w: None,
            change_1m: None,
            change_1y: None,
            change_5y: Some(310.0),
            change_ytd: None,
            volume: Some(1_000_000),
            high_1d: Some(263.31),
            low_1d: Some(260.68),
            high_1m: None,
            low_1m: None,
            high_1y: None,
            low_1y: None,
            high_5y: None,
            low_5y: None,
            pe_ratio: Some(28.5),
            eps: None,
            dividend_yield: None,
            market_cap: Some(1_415_993_000_000.0),
            shares_outstanding: None,
            net_profit_margin: None,
            gross_margin: None,
            roe: None,
            revenue_ttm: None,
            beta: None,
            institutional_ownership: None,
            debt_to_equity: None,
            year_founded: Some(1976),
            website: Some("https://www.apple.com/".into()),
            city: Some("Cupertino".into()),
            state: None,
            zip: None,
            weight: None,
            last_updated: Utc::now(),
            data_source: Some("finnhub".into()),
            is_sp500: true,
        }
    }

    #[test]
    fn test_summary_wire_format() {
        let json = serde_json::to_value(StockSummary::from(sample_row())).unwrap();
        assert_eq!(json["ticker"], "AAPL");
        assert_eq!(json["change1D"], 0.45);
        assert_eq!(json["peRatio"], 28.5);
        assert_eq!(json["yearFounded"], 1976);
        assert!(json.get("change_1d").is_none());
    }

    #[test]
    fn test_detail_flattens_summary() {
        let json = serde_json::to_value(StockDetail::from(sample_row())).unwrap();
        assert_eq!(json["ticker"], "AAPL");
        assert_eq!(json["change5Y"], 310.0);
        assert_eq!(json["high1D"], 263.31);
        assert_eq!(json["dataSource"], "finnhub");
    }

    #[test]
    fn test_news_item_omits_absent_tickers() {
        let item = MarketNewsItem {
            id: "1".into(),
            headline: "h".into(),
            summary: "s".into(),
            source: "src".into(),
            published_at: "2026-01-01T00:00:00".into(),
            category: "general".into(),
            sentiment: "neutral".into(),
            tickers: None,
            url: None,
        };
        let json = serde_json::to_value(item).unwrap();
        assert!(json.get("tickers").is_none());
        assert_eq!(json["publishedAt"], "2026-01-01T00:00:00");
    }
}
