use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "AlphaStream API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match alphastream_db::stocks::count(&state.pool).await {
        Ok(_) => "connected",
        Err(_) => "unavailable",
    };
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "database": database,
    }))
}
