use std::env;
use std::fmt;
use std::time::Duration;

/// Default tracked universe used when UNIVERSE is not set. The production
/// deployment seeds the full S&P 500 via the bulk importer; this keeps a
/// fresh checkout functional against a free-tier Finnhub key.
const DEFAULT_UNIVERSE: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "AMZN", "GOOGL", "META", "BRK.B", "TSLA", "JPM", "V",
];

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub cors_origins: Vec<String>,
    pub finnhub_api_key: String,
    /// Override for the Finnhub API base URL (local stubs, proxies)
    pub finnhub_base_url: Option<String>,
    /// TTL for the news caches
    pub news_ttl: Duration,
    /// TTL for the market-state cache
    pub market_ttl: Duration,
    /// How often the refresh coordinator polls dataset freshness
    pub refresh_interval: Duration,
    /// Dataset age beyond which a bulk refresh is triggered
    pub max_data_age_minutes: f64,
    /// Timeout for any single provider HTTP call
    pub provider_timeout: Duration,
    /// Ticker symbols refreshed in bulk
    pub universe: Vec<String>,
}

/// Configuration error: the service refuses to start on nonsensical values
#[derive(Debug)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/alphastream".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:8080".to_string(),
                    "http://localhost:5173".to_string(),
                ]
            });

        let finnhub_api_key = env::var("FINNHUB_API_KEY").unwrap_or_default();
        let finnhub_base_url = env::var("FINNHUB_BASE_URL").ok();

        let news_ttl = Duration::from_secs(parse_u64("NEWS_TTL_SECS", 300));
        let market_ttl = Duration::from_secs(parse_u64("MARKET_TTL_SECS", 300));
        let refresh_interval = Duration::from_secs(parse_u64("REFRESH_INTERVAL_SECS", 300));
        let max_data_age_minutes = env::var("MAX_DATA_AGE_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15.0);
        let provider_timeout = Duration::from_secs(parse_u64("PROVIDER_TIMEOUT_SECS", 10));

        let universe = env::var("UNIVERSE")
            .map(|s| {
                s.split(',')
                    .map(|t| t.trim().to_uppercase())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| DEFAULT_UNIVERSE.iter().map(|s| s.to_string()).collect());

        let config = Self {
            port,
            database_url,
            cors_origins,
            finnhub_api_key,
            finnhub_base_url,
            news_ttl,
            market_ttl,
            refresh_interval,
            max_data_age_minutes,
            provider_timeout,
            universe,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.news_ttl.is_zero() {
            return Err(ConfigError("NEWS_TTL_SECS must be positive".into()));
        }
        if self.market_ttl.is_zero() {
            return Err(ConfigError("MARKET_TTL_SECS must be positive".into()));
        }
        if self.refresh_interval.is_zero() {
            return Err(ConfigError("REFRESH_INTERVAL_SECS must be positive".into()));
        }
        if !self.max_data_age_minutes.is_finite() || self.max_data_age_minutes <= 0.0 {
            return Err(ConfigError(
                "MAX_DATA_AGE_MINUTES must be a positive finite number".into(),
            ));
        }
        if self.provider_timeout.is_zero() {
            return Err(ConfigError("PROVIDER_TIMEOUT_SECS must be positive".into()));
        }
        // Staleness must be detected promptly: a poll interval approaching
        // the threshold would leave the dataset stale for most of a cycle.
        let threshold = Duration::from_secs_f64(self.max_data_age_minutes * 60.0);
        if self.refresh_interval > threshold {
            return Err(ConfigError(format!(
                "REFRESH_INTERVAL_SECS ({}s) must not exceed MAX_DATA_AGE_MINUTES ({}m)",
                self.refresh_interval.as_secs(),
                self.max_data_age_minutes
            )));
        }
        Ok(())
    }
}

fn parse_u64(var: &str, default: u64) -> u64 {
    env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
