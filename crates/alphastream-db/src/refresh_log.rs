use crate::types::{RefreshLogParams, RefreshLogRow};

/// Append one refresh audit record. Rows are never updated or deleted here;
/// retention is an operational concern.
pub async fn append(
    executor: impl sqlx::PgExecutor<'_>,
    p: &RefreshLogParams,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO refresh_log (
            stocks_updated, data_source, success, error_message, duration_seconds
        ) VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(p.stocks_updated)
    .bind(&p.data_source)
    .bind(p.success)
    .bind(&p.error_message)
    .bind(p.duration_seconds)
    .execute(executor)
    .await?;
    Ok(())
}

/// Most recent refresh attempts, newest first
pub async fn recent(
    executor: impl sqlx::PgExecutor<'_>,
    limit: i64,
) -> Result<Vec<RefreshLogRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, stocks_updated, data_source, success, error_message,
               duration_seconds, created_at
        FROM refresh_log
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(executor)
    .await
}
