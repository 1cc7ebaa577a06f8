use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stock row returned from SELECT queries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockRow {
    pub ticker: String,
    pub name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,

    pub price: Option<f64>,
    pub change_1d: Option<f64>,
    pub change_1w: Option<f64>,
    pub change_1m: Option<f64>,
    pub change_1y: Option<f64>,
    pub change_5y: Option<f64>,
    pub change_ytd: Option<f64>,
    pub volume: Option<i64>,

    pub high_1d: Option<f64>,
    pub low_1d: Option<f64>,
    pub high_1m: Option<f64>,
    pub low_1m: Option<f64>,
    pub high_1y: Option<f64>,
    pub low_1y: Option<f64>,
    pub high_5y: Option<f64>,
    pub low_5y: Option<f64>,

    pub pe_ratio: Option<f64>,
    pub eps: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub market_cap: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub net_profit_margin: Option<f64>,
    pub gross_margin: Option<f64>,
    pub roe: Option<f64>,
    pub revenue_ttm: Option<f64>,
    pub beta: Option<f64>,
    pub institutional_ownership: Option<f64>,
    pub debt_to_equity: Option<f64>,

    pub year_founded: Option<i32>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub weight: Option<f64>,

    pub last_updated: DateTime<Utc>,
    pub data_source: Option<String>,
    pub is_sp500: bool,
}

/// Parameters for upserting one stock. `last_updated` is set by the query.
#[derive(Debug, Clone, Default)]
pub struct UpsertStockParams {
    pub ticker: String,
    pub name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,

    pub price: Option<f64>,
    pub change_1d: Option<f64>,
    pub change_1w: Option<f64>,
    pub change_1m: Option<f64>,
    pub change_1y: Option<f64>,
    pub change_5y: Option<f64>,
    pub change_ytd: Option<f64>,
    pub volume: Option<i64>,

    pub high_1d: Option<f64>,
    pub low_1d: Option<f64>,
    pub high_1m: Option<f64>,
    pub low_1m: Option<f64>,
    pub high_1y: Option<f64>,
    pub low_1y: Option<f64>,
    pub high_5y: Option<f64>,
    pub low_5y: Option<f64>,

    pub pe_ratio: Option<f64>,
    pub eps: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub market_cap: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub net_profit_margin: Option<f64>,
    pub gross_margin: Option<f64>,
    pub roe: Option<f64>,
    pub revenue_ttm: Option<f64>,
    pub beta: Option<f64>,
    pub institutional_ownership: Option<f64>,
    pub debt_to_equity: Option<f64>,

    pub year_founded: Option<i32>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub weight: Option<f64>,

    pub data_source: Option<String>,
    pub is_sp500: bool,
}

/// Refresh audit row returned from SELECT queries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshLogRow {
    pub id: i64,
    pub stocks_updated: i32,
    pub data_source: String,
    pub success: bool,
    pub error_message: Option<String>,
    pub duration_seconds: f64,
    pub created_at: DateTime<Utc>,
}

/// Parameters for appending one refresh audit record
#[derive(Debug, Clone)]
pub struct RefreshLogParams {
    pub stocks_updated: i32,
    pub data_source: String,
    pub success: bool,
    pub error_message: Option<String>,
    pub duration_seconds: f64,
}

/// Fixed orderings for stock listings (never interpolate caller input into SQL)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOrder {
    MarketCapDesc,
    Change1dDesc,
    Change1dAsc,
}

impl StockOrder {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Self::MarketCapDesc => "market_cap DESC NULLS LAST",
            Self::Change1dDesc => "change_1d DESC NULLS LAST",
            Self::Change1dAsc => "change_1d ASC NULLS LAST",
        }
    }
}
