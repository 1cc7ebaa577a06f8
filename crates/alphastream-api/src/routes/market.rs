use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::read_through::read_through;
use crate::state::AppState;
use crate::types::{IndexQuote, MarketState, MoverItem, SectorPerformance};
use alphastream_db::{stocks, StockOrder, StockRow};

/// Index ETFs proxied as the broad-market snapshot
const INDEX_ETFS: &[(&str, &str)] = &[
    ("SPY", "S&P 500"),
    ("QQQ", "Nasdaq 100"),
    ("DIA", "Dow Jones"),
];

const MARKET_STATE_KEY: &str = "market-state";

pub async fn get_sectors(
    State(state): State<AppState>,
) -> Result<Json<Vec<SectorPerformance>>, AppError> {
    let rows = stocks::get_all(&state.pool, StockOrder::MarketCapDesc).await?;
    Ok(Json(aggregate_sectors(&rows)))
}

/// Average the per-stock change columns within each named sector. Rows with
/// no sector (or the importer's "--" placeholder) are left out.
fn aggregate_sectors(rows: &[StockRow]) -> Vec<SectorPerformance> {
    struct Acc {
        change_1d: Vec<f64>,
        change_1w: Vec<f64>,
        change_1m: Vec<f64>,
        count: usize,
    }

    let mut sectors: HashMap<&str, Acc> = HashMap::new();
    for row in rows {
        let sector = match row.sector.as_deref() {
            Some(s) if !s.is_empty() && s != "--" => s,
            _ => continue,
        };
        let acc = sectors.entry(sector).or_insert(Acc {
            change_1d: Vec::new(),
            change_1w: Vec::new(),
            change_1m: Vec::new(),
            count: 0,
        });
        if let Some(c) = row.change_1d {
            acc.change_1d.push(c);
        }
        if let Some(c) = row.change_1w {
            acc.change_1w.push(c);
        }
        if let Some(c) = row.change_1m {
            acc.change_1m.push(c);
        }
        acc.count += 1;
    }

    let mut result: Vec<SectorPerformance> = sectors
        .into_iter()
        .map(|(sector, acc)| SectorPerformance {
            sector: sector.to_string(),
            change_1d: rounded_mean(&acc.change_1d),
            change_1w: rounded_mean(&acc.change_1w),
            change_1m: rounded_mean(&acc.change_1m),
            stock_count: acc.count,
        })
        .collect();

    result.sort_by(|a, b| {
        b.change_1d
            .partial_cmp(&a.change_1d)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    result
}

fn rounded_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (mean * 100.0).round() / 100.0
}

#[derive(Deserialize)]
pub struct MoversParams {
    limit: Option<i64>,
}

pub async fn get_top_movers(
    State(state): State<AppState>,
    Query(params): Query<MoversParams>,
) -> Result<Json<Value>, AppError> {
    let limit = params.limit.unwrap_or(10).clamp(1, 100);

    let gainers = stocks::get_top(&state.pool, StockOrder::Change1dDesc, limit).await?;
    let losers = stocks::get_top(&state.pool, StockOrder::Change1dAsc, limit).await?;

    let gainers: Vec<MoverItem> = gainers.into_iter().map(MoverItem::from).collect();
    let losers: Vec<MoverItem> = losers.into_iter().map(MoverItem::from).collect();

    Ok(Json(json!({ "gainers": gainers, "losers": losers })))
}

/// Broad-market snapshot from index ETF quotes, cached with stale fallback
pub async fn get_market_state(
    State(state): State<AppState>,
) -> Result<Json<MarketState>, AppError> {
    let finnhub = state.finnhub.clone();
    let (snapshot, _stale) = read_through(
        &state.market_cache,
        &state.flights,
        MARKET_STATE_KEY,
        move || async move {
            let mut indices = Vec::with_capacity(INDEX_ETFS.len());
            for (symbol, name) in INDEX_ETFS {
                let quote = finnhub.quote(symbol).await?;
                indices.push(IndexQuote {
                    symbol: symbol.to_string(),
                    name: name.to_string(),
                    price: quote.current,
                    change: quote.change,
                    percent_change: quote.percent_change,
                });
            }
            Ok(MarketState {
                indices,
                timestamp: Utc::now(),
            })
        },
    )
    .await?;

    Ok(Json(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(ticker: &str, sector: Option<&str>, change_1d: Option<f64>) -> StockRow {
        StockRow {
            ticker: ticker.into(),
            name: ticker.into(),
            sector: sector.map(|s| s.to_string()),
            industry: None,
            price: None,
            change_1d,
            change_1w: None,
            change_1m: None,
            change_1y: None,
            change_5y: None,
            change_ytd: None,
            volume: None,
            high_1d: None,
            low_1d: None,
            high_1m: None,
            low_1m: None,
            high_1y: None,
            low_1y: None,
            high_5y: None,
            low_5y: None,
            pe_ratio: None,
            eps: None,
            dividend_yield: None,
            market_cap: None,
            shares_outstanding: None,
            net_profit_margin: None,
            gross_margin: None,
            roe: None,
            revenue_ttm: None,
            beta: None,
            institutional_ownership: None,
            debt_to_equity: None,
            year_founded: None,
            website: None,
            city: None,
            state: None,
            zip: None,
            weight: None,
            last_updated: Utc::now(),
            data_source: None,
            is_sp500: true,
        }
    }

    #[test]
    fn test_sectors_average_and_sort_by_daily_change() {
        let rows = vec![
            row("A", Some("Technology"), Some(2.0)),
            row("B", Some("Technology"), Some(4.0)),
            row("C", Some("Energy"), Some(5.0)),
        ];
        let sectors = aggregate_sectors(&rows);
        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[0].sector, "Energy");
        assert_eq!(sectors[0].change_1d, 5.0);
        assert_eq!(sectors[1].sector, "Technology");
        assert_eq!(sectors[1].change_1d, 3.0);
        assert_eq!(sectors[1].stock_count, 2);
    }

    #[test]
    fn test_sectors_skip_unsectored_and_placeholder_rows() {
        let rows = vec![
            row("A", None, Some(1.0)),
            row("B", Some("--"), Some(1.0)),
            row("C", Some(""), Some(1.0)),
            row("D", Some("Utilities"), None),
        ];
        let sectors = aggregate_sectors(&rows);
        assert_eq!(sectors.len(), 1);
        assert_eq!(sectors[0].sector, "Utilities");
        // no change data at all averages to zero, not NaN
        assert_eq!(sectors[0].change_1d, 0.0);
        assert_eq!(sectors[0].stock_count, 1);
    }

    #[test]
    fn test_rounded_mean_two_decimals() {
        assert_eq!(rounded_mean(&[1.005, 2.007]), 1.51);
        assert_eq!(rounded_mean(&[]), 0.0);
    }
}
