use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use std::str::FromStr;
use tracing::log::LevelFilter;

/// Configure SQLite PRAGMAs for optimal performance with WAL mode
///
/// - WAL mode enables concurrent reads and writes
/// - busy_timeout reduces SQLITE_BUSY errors
/// - synchronous=NORMAL is safe with WAL and improves performance
/// - foreign_keys must be explicitly enabled (disabled by default)
async fn configure_pragmas(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = true")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA temp_store = memory")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create a connection pool for reads
///
/// Multiple connections maximize read throughput; size to CPU cores.
pub async fn create_read_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .log_statements(LevelFilter::Debug);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    configure_pragmas(&pool).await?;

    tracing::info!(max_connections, "created read pool");

    Ok(pool)
}

/// Create a connection pool for writes
///
/// Limited to 1 connection: every atomic unit in the engine runs on this
/// pool, so writes serialize instead of failing with SQLITE_BUSY.
pub async fn create_write_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .log_statements(LevelFilter::Debug);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    configure_pragmas(&pool).await?;

    tracing::info!("created write pool");

    Ok(pool)
}

/// Single general-purpose pool, used by the CLI's one-shot commands.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    create_read_pool(database_url, max_connections).await
}
