use axum::Json;
use serde_json::{json, Value};

/// Static demo portfolio. The terminal frontend renders this panel before
/// real brokerage integration exists; the numbers are fixed.
pub async fn get_portfolio() -> Json<Value> {
    Json(json!({
        "cash": 25_000.0,
        "totalValue": 158_420.50,
        "dayChange": 1_204.32,
        "dayChangePercent": 0.77,
        "positions": [
            {
                "ticker": "AAPL",
                "name": "Apple Inc",
                "shares": 120,
                "avgCost": 178.25,
                "currentPrice": 261.74,
                "marketValue": 31_408.80,
            },
            {
                "ticker": "MSFT",
                "name": "Microsoft Corporation",
                "shares": 85,
                "avgCost": 310.40,
                "currentPrice": 428.90,
                "marketValue": 36_456.50,
            },
            {
                "ticker": "NVDA",
                "name": "NVIDIA Corporation",
                "shares": 60,
                "avgCost": 495.10,
                "currentPrice": 875.28,
                "marketValue": 52_516.80,
            },
            {
                "ticker": "JPM",
                "name": "JPMorgan Chase & Co",
                "shares": 65,
                "avgCost": 155.80,
                "currentPrice": 198.44,
                "marketValue": 12_898.60,
            },
        ],
    }))
}
