mod config;
mod error;
mod freshness;
mod provider;
mod read_through;
mod refresh;
mod routes;
mod state;
mod types;

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use stale_cache::{FlightGroup, TtlCache};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use finnhub_client::FinnhubClient;
use provider::FinnhubUniverse;
use refresh::{PgRefreshStore, Refresher};
use state::AppState;

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "alphastream_api=info,tower_http=info".into());

    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Config::from_env().expect("Invalid configuration");
    info!(port = config.port, "Starting alphastream-api");

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    alphastream_db::migrate::migrate(&pool)
        .await
        .expect("Failed to run migrations");

    let finnhub = Arc::new(match config.finnhub_base_url.as_deref() {
        Some(base_url) => {
            FinnhubClient::with_base_url(&config.finnhub_api_key, config.provider_timeout, base_url)
        }
        None => FinnhubClient::with_timeout(&config.finnhub_api_key, config.provider_timeout),
    });

    let refresher = Arc::new(Refresher::new(
        Arc::new(FinnhubUniverse::new(
            finnhub.clone(),
            config.universe.clone(),
        )),
        Arc::new(PgRefreshStore::new(pool.clone())),
        config.max_data_age_minutes,
    ));
    let refresh_handle = refresh::spawn_coordinator(refresher.clone(), config.refresh_interval);

    let state = AppState {
        pool,
        finnhub,
        news_cache: Arc::new(TtlCache::new(config.news_ttl).expect("Invalid news TTL")),
        market_cache: Arc::new(TtlCache::new(config.market_ttl).expect("Invalid market TTL")),
        flights: Arc::new(FlightGroup::new()),
        refresher,
        max_data_age_minutes: config.max_data_age_minutes,
    };

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true)
    };

    let app = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health))
        // Universe / screener
        .route("/api/universe/core", get(routes::universe::get_core))
        .route("/api/universe/search", get(routes::universe::search))
        .route("/api/stock/{ticker}", get(routes::stocks::get_stock))
        // Market
        .route("/api/market/sectors", get(routes::market::get_sectors))
        .route("/api/market/top-movers", get(routes::market::get_top_movers))
        .route("/api/market-state", get(routes::market::get_market_state))
        // Portfolio & news
        .route("/api/portfolio", get(routes::portfolio::get_portfolio))
        .route("/api/news", get(routes::news::get_market_news))
        .route("/api/news/{ticker}", get(routes::news::get_company_news))
        // System / monitoring
        .route("/api/data/status", get(routes::status::get_data_status))
        .route("/api/data/refresh", post(routes::status::trigger_refresh))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("Failed to bind");

    info!(port = config.port, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .expect("Server failed");

    refresh_handle.stop().await;
}
