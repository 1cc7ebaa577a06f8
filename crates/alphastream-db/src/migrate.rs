use sqlx::PgPool;
use tracing::info;

/// Apply any pending schema migrations before the service takes traffic.
/// Applied versions are tracked by sqlx in `_sqlx_migrations`, so reruns
/// against an up-to-date database are no-ops.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Applying schema migrations");
    sqlx::migrate!()
        .run(pool)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    info!("Schema is up to date");
    Ok(())
}
