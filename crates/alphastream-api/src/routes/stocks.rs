use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use crate::types::StockDetail;
use alphastream_db::stocks;

pub async fn get_stock(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<StockDetail>, AppError> {
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AppError::BadRequest("ticker is required".into()));
    }

    let row = stocks::get(&state.pool, &ticker)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stock {} not found", ticker)))?;

    Ok(Json(StockDetail::from(row)))
}
