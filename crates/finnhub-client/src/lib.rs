//! Rust client for the Finnhub market data API
//!
//! Thin typed wrapper over the Finnhub REST API endpoints this service
//! consumes. The one behavior callers must care about: Finnhub throttles
//! free-tier keys aggressively, and a throttled call is reported as the
//! distinguished [`FinnhubError::RateLimited`] variant so the read path can
//! degrade to cached data instead of propagating an opaque failure.
//!
//! # Example
//!
//! ```no_run
//! use finnhub_client::FinnhubClient;
//!
//! # async fn example() -> Result<(), finnhub_client::FinnhubError> {
//! let client = FinnhubClient::new("my-api-key");
//!
//! let quote = client.quote("AAPL").await?;
//! println!("AAPL: {}", quote.current);
//!
//! let news = client.market_news("general").await?;
//! for article in news.iter().take(5) {
//!     println!("{:?}", article.headline);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - `GET /quote` - Real-time quote
//! - `GET /stock/profile2` - Company profile
//! - `GET /news` - General market news by category
//! - `GET /company-news` - Company news by symbol and date range

mod client;
mod error;
mod types;

pub use client::FinnhubClient;
pub use error::{FinnhubError, Result};
pub use types::{CompanyProfile, NewsArticle, Quote};
