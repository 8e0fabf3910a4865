use anyhow::Context;
use libris_kernel::settings::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{PgExecutor, PgPool};

use crate::StoreError;

/// Build connection options from discrete settings rather than a URL, so
/// passwords need no escaping.
pub fn connect_options(settings: &DatabaseSettings) -> anyhow::Result<PgConnectOptions> {
    let ssl_mode: PgSslMode = settings
        .sslmode
        .parse()
        .with_context(|| format!("invalid sslmode '{}'", settings.sslmode))?;

    Ok(PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name)
        .ssl_mode(ssl_mode)
        .options([("TimeZone", settings.timezone.as_str())]))
}

/// Open the shared connection pool.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    tracing::info!(
        target: "libris-db",
        host = %settings.host,
        port = settings.port,
        database = %settings.name,
        "connecting to postgres"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(connect_options(settings)?)
        .await
        .with_context(|| format!("failed to connect to postgres at {}:{}", settings.host, settings.port))
}

pub async fn ping(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Move the `id` sequence of `table` past the largest stored id.
///
/// Needed after inserting a row with an explicit id, otherwise the next
/// generated id can collide with it. `table` must be a trusted identifier.
pub async fn sync_id_sequence<'c, X>(executor: X, table: &str) -> Result<(), StoreError>
where
    X: PgExecutor<'c>,
{
    let sql = format!(
        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
         GREATEST((SELECT COALESCE(MAX(id), 0) FROM {table}), 1))"
    );
    sqlx::query(&sql).execute(executor).await?;
    Ok(())
}

/// Delete the row of `table` with `id`, reporting a missing row as
/// [`StoreError::NotFound`]. `table` must be a trusted identifier.
pub async fn delete_by_id(pool: &PgPool, table: &str, id: i64) -> Result<(), StoreError> {
    let sql = format!("DELETE FROM {table} WHERE id = $1");
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}
