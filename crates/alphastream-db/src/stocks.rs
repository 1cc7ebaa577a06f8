use crate::types::{StockOrder, StockRow, UpsertStockParams};
use chrono::{DateTime, Utc};

/// Standard SELECT column list for [`StockRow`] queries.
/// Does not include the SELECT keyword or FROM clause.
const STOCK_COLUMNS: &str = r#"
    ticker, name, sector, industry,
    price, change_1d, change_1w, change_1m, change_1y, change_5y, change_ytd, volume,
    high_1d, low_1d, high_1m, low_1m, high_1y, low_1y, high_5y, low_5y,
    pe_ratio, eps, dividend_yield, market_cap, shares_outstanding,
    net_profit_margin, gross_margin, roe, revenue_ttm,
    beta, institutional_ownership, debt_to_equity,
    year_founded, website, city, state, zip, weight,
    last_updated, data_source, is_sp500
"#;

/// Upsert one stock keyed by ticker. `last_updated` advances to NOW() on
/// every successful write, which is what drives the dataset freshness signal.
/// Columns the quote-driven refresh cannot supply (fundamentals seeded by the
/// bulk importer) COALESCE to the stored value instead of being nulled.
pub async fn upsert(
    executor: impl sqlx::PgExecutor<'_>,
    p: &UpsertStockParams,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO stocks (
            ticker, name, sector, industry,
            price, change_1d, change_1w, change_1m, change_1y, change_5y, change_ytd, volume,
            high_1d, low_1d, high_1m, low_1m, high_1y, low_1y, high_5y, low_5y,
            pe_ratio, eps, dividend_yield, market_cap, shares_outstanding,
            net_profit_margin, gross_margin, roe, revenue_ttm,
            beta, institutional_ownership, debt_to_equity,
            year_founded, website, city, state, zip, weight,
            data_source, is_sp500, last_updated
        ) VALUES (
            $1, $2, $3, $4,
            $5, $6, $7, $8, $9, $10, $11, $12,
            $13, $14, $15, $16, $17, $18, $19, $20,
            $21, $22, $23, $24, $25,
            $26, $27, $28, $29,
            $30, $31, $32,
            $33, $34, $35, $36, $37, $38,
            $39, $40, NOW()
        )
        ON CONFLICT (ticker) DO UPDATE SET
            name = EXCLUDED.name,
            sector = COALESCE(EXCLUDED.sector, stocks.sector),
            industry = COALESCE(EXCLUDED.industry, stocks.industry),
            price = EXCLUDED.price,
            change_1d = EXCLUDED.change_1d,
            change_1w = COALESCE(EXCLUDED.change_1w, stocks.change_1w),
            change_1m = COALESCE(EXCLUDED.change_1m, stocks.change_1m),
            change_1y = COALESCE(EXCLUDED.change_1y, stocks.change_1y),
            change_5y = COALESCE(EXCLUDED.change_5y, stocks.change_5y),
            change_ytd = COALESCE(EXCLUDED.change_ytd, stocks.change_ytd),
            volume = COALESCE(EXCLUDED.volume, stocks.volume),
            high_1d = EXCLUDED.high_1d,
            low_1d = EXCLUDED.low_1d,
            high_1m = COALESCE(EXCLUDED.high_1m, stocks.high_1m),
            low_1m = COALESCE(EXCLUDED.low_1m, stocks.low_1m),
            high_1y = COALESCE(EXCLUDED.high_1y, stocks.high_1y),
            low_1y = COALESCE(EXCLUDED.low_1y, stocks.low_1y),
            high_5y = COALESCE(EXCLUDED.high_5y, stocks.high_5y),
            low_5y = COALESCE(EXCLUDED.low_5y, stocks.low_5y),
            pe_ratio = COALESCE(EXCLUDED.pe_ratio, stocks.pe_ratio),
            eps = COALESCE(EXCLUDED.eps, stocks.eps),
            dividend_yield = COALESCE(EXCLUDED.dividend_yield, stocks.dividend_yield),
            market_cap = COALESCE(EXCLUDED.market_cap, stocks.market_cap),
            shares_outstanding = COALESCE(EXCLUDED.shares_outstanding, stocks.shares_outstanding),
            net_profit_margin = COALESCE(EXCLUDED.net_profit_margin, stocks.net_profit_margin),
            gross_margin = COALESCE(EXCLUDED.gross_margin, stocks.gross_margin),
            roe = COALESCE(EXCLUDED.roe, stocks.roe),
            revenue_ttm = COALESCE(EXCLUDED.revenue_ttm, stocks.revenue_ttm),
            beta = COALESCE(EXCLUDED.beta, stocks.beta),
            institutional_ownership = COALESCE(EXCLUDED.institutional_ownership, stocks.institutional_ownership),
            debt_to_equity = COALESCE(EXCLUDED.debt_to_equity, stocks.debt_to_equity),
            year_founded = COALESCE(EXCLUDED.year_founded, stocks.year_founded),
            website = COALESCE(EXCLUDED.website, stocks.website),
            city = COALESCE(EXCLUDED.city, stocks.city),
            state = COALESCE(EXCLUDED.state, stocks.state),
            zip = COALESCE(EXCLUDED.zip, stocks.zip),
            weight = COALESCE(EXCLUDED.weight, stocks.weight),
            data_source = EXCLUDED.data_source,
            is_sp500 = EXCLUDED.is_sp500,
            last_updated = NOW()
        "#,
    )
    .bind(&p.ticker)
    .bind(&p.name)
    .bind(&p.sector)
    .bind(&p.industry)
    .bind(p.price)
    .bind(p.change_1d)
    .bind(p.change_1w)
    .bind(p.change_1m)
    .bind(p.change_1y)
    .bind(p.change_5y)
    .bind(p.change_ytd)
    .bind(p.volume)
    .bind(p.high_1d)
    .bind(p.low_1d)
    .bind(p.high_1m)
    .bind(p.low_1m)
    .bind(p.high_1y)
    .bind(p.low_1y)
    .bind(p.high_5y)
    .bind(p.low_5y)
    .bind(p.pe_ratio)
    .bind(p.eps)
    .bind(p.dividend_yield)
    .bind(p.market_cap)
    .bind(p.shares_outstanding)
    .bind(p.net_profit_margin)
    .bind(p.gross_margin)
    .bind(p.roe)
    .bind(p.revenue_ttm)
    .bind(p.beta)
    .bind(p.institutional_ownership)
    .bind(p.debt_to_equity)
    .bind(p.year_founded)
    .bind(&p.website)
    .bind(&p.city)
    .bind(&p.state)
    .bind(&p.zip)
    .bind(p.weight)
    .bind(&p.data_source)
    .bind(p.is_sp500)
    .execute(executor)
    .await?;
    Ok(())
}

/// Get a single stock by ticker
pub async fn get(
    executor: impl sqlx::PgExecutor<'_>,
    ticker: &str,
) -> Result<Option<StockRow>, sqlx::Error> {
    let sql = format!("SELECT {STOCK_COLUMNS} FROM stocks WHERE ticker = $1");
    sqlx::query_as(&sql).bind(ticker).fetch_optional(executor).await
}

/// Get all stocks in a fixed order
pub async fn get_all(
    executor: impl sqlx::PgExecutor<'_>,
    order: StockOrder,
) -> Result<Vec<StockRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {STOCK_COLUMNS} FROM stocks ORDER BY {}",
        order.as_sql()
    );
    sqlx::query_as(&sql).fetch_all(executor).await
}

/// Get the top stocks by a fixed order (used for top movers)
pub async fn get_top(
    executor: impl sqlx::PgExecutor<'_>,
    order: StockOrder,
    limit: i64,
) -> Result<Vec<StockRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {STOCK_COLUMNS} FROM stocks ORDER BY {} LIMIT $1",
        order.as_sql()
    );
    sqlx::query_as(&sql).bind(limit).fetch_all(executor).await
}

/// Search stocks by ticker or name, largest market cap first
pub async fn search(
    executor: impl sqlx::PgExecutor<'_>,
    query: &str,
) -> Result<Vec<StockRow>, sqlx::Error> {
    let pattern = format!("%{}%", query.to_uppercase());
    let sql = format!(
        r#"
        SELECT {STOCK_COLUMNS} FROM stocks
        WHERE ticker LIKE $1 OR UPPER(name) LIKE $1
        ORDER BY market_cap DESC NULLS LAST
        LIMIT 50
        "#
    );
    sqlx::query_as(&sql).bind(pattern).fetch_all(executor).await
}

/// Get all stocks in a sector, largest market cap first
pub async fn get_by_sector(
    executor: impl sqlx::PgExecutor<'_>,
    sector: &str,
) -> Result<Vec<StockRow>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {STOCK_COLUMNS} FROM stocks
        WHERE sector = $1
        ORDER BY market_cap DESC NULLS LAST
        "#
    );
    sqlx::query_as(&sql).bind(sector).fetch_all(executor).await
}

/// Number of tracked stocks
pub async fn count(executor: impl sqlx::PgExecutor<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM stocks")
        .fetch_one(executor)
        .await
}

/// The dataset's global freshness scalar: the newest `last_updated` across
/// all rows, or `None` when the table is empty. Deliberately not tracked
/// per ticker (a partial refresh advances it for all reads).
pub async fn max_last_updated(
    executor: impl sqlx::PgExecutor<'_>,
) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
    sqlx::query_scalar("SELECT MAX(last_updated) FROM stocks")
        .fetch_one(executor)
        .await
}
