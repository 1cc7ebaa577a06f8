use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::freshness;
use crate::state::AppState;
use alphastream_db::{refresh_log, stocks};

/// Recent audit records reported by the status endpoint
const STATUS_HISTORY_LIMIT: i64 = 5;

/// Dataset freshness and refresh history. This payload keeps the historical
/// snake_case field names.
pub async fn get_data_status(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let max_ts = stocks::max_last_updated(&state.pool).await?;
    let age = freshness::dataset_age_minutes(max_ts, Utc::now());
    let recent = refresh_log::recent(&state.pool, STATUS_HISTORY_LIMIT).await?;
    let total = stocks::count(&state.pool).await?;

    Ok(Json(json!({
        "data_age_minutes": age.map(|a| (a * 100.0).round() / 100.0),
        "stale": freshness::needs_refresh(age, state.max_data_age_minutes),
        "max_data_age_minutes": state.max_data_age_minutes,
        "recent_refreshes": recent,
        "total_stocks": total,
    })))
}

/// Manually trigger a bulk refresh. The run happens in the background; the
/// response only says whether this request started one or joined an
/// in-flight run.
pub async fn trigger_refresh(State(state): State<AppState>) -> Json<Value> {
    let started = state.refresher.start_background();
    let message = if started {
        "Refresh started"
    } else {
        "Refresh already in progress"
    };
    Json(json!({ "started": started, "message": message }))
}
