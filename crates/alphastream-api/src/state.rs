use crate::refresh::Refresher;
use crate::types::{MarketNewsItem, MarketState};
use alphastream_db::PgPool;
use finnhub_client::FinnhubClient;
use stale_cache::{FlightGroup, TtlCache};
use std::sync::Arc;

/// Shared application state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub finnhub: Arc<FinnhubClient>,
    pub news_cache: Arc<TtlCache<Vec<MarketNewsItem>>>,
    pub market_cache: Arc<TtlCache<MarketState>>,
    pub flights: Arc<FlightGroup>,
    pub refresher: Arc<Refresher>,
    pub max_data_age_minutes: f64,
}
