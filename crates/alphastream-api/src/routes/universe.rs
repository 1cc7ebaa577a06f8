use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;
use crate::types::StockSummary;
use alphastream_db::{stocks, StockOrder};

/// Full tracked universe, largest market cap first. Served straight from the
/// store; freshness is the refresh coordinator's job, not the request path's.
pub async fn get_core(
    State(state): State<AppState>,
) -> Result<Json<Vec<StockSummary>>, AppError> {
    let rows = stocks::get_all(&state.pool, StockOrder::MarketCapDesc).await?;
    Ok(Json(rows.into_iter().map(StockSummary::from).collect()))
}

#[derive(Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<StockSummary>>, AppError> {
    let query = params
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("q is required".into()))?;

    let rows = stocks::search(&state.pool, query.trim()).await?;
    Ok(Json(rows.into_iter().map(StockSummary::from).collect()))
}
