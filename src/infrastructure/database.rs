use crate::domain::error::StoreError;
use crate::infrastructure::config::DatabaseConfig;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, instrument};

/// Opens the shared pool and verifies the server answers.
///
/// Any failure here is fatal to startup and surfaces as [`StoreError::Connection`].
#[instrument(skip_all, fields(database = %config.database, ssl_mode = %config.ssl_mode))]
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let options = config.connect_options().map_err(StoreError::Connection)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(StoreError::Connection)?;

    ping(&pool).await?;
    debug!(pool_size = pool.size(), "Database pool ready");
    Ok(pool)
}

pub async fn ping(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(StoreError::Connection)?;
    Ok(())
}
