pub mod migrate;
pub mod refresh_log;
pub mod stocks;
pub mod types;

pub use sqlx::postgres::PgPool;
pub use types::*;
