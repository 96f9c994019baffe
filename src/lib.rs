pub mod cli;
pub mod config;
pub mod db;
pub mod observability;

pub use db::{create_pool, create_read_pool, create_write_pool};

/// Builds the shared state every command type hangs off: a wide read pool and
/// a single-connection write pool over the same database.
pub async fn create_state(config: &config::Config) -> anyhow::Result<pointshub_shared::State> {
    let read_db =
        create_read_pool(&config.database.url, config.database.max_connections).await?;
    let write_db = create_write_pool(&config.database.url).await?;

    Ok(pointshub_shared::State { read_db, write_db })
}
