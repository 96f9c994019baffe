use std::{path::PathBuf, str::FromStr, time::Duration};

use pointshub_shared::{Actor, PromotionKind, Role, State};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));
    let read_db = SqlitePool::connect_with(opts.clone()).await?;
    // single write connection, as in production
    let write_db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await?;
    let mut conn = write_db.acquire().await?;
    pointshub_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(State { read_db, write_db })
}

pub fn manager() -> Actor {
    Actor::new("00000000000000000000000000", Role::Manager)
}

#[allow(dead_code)]
pub async fn create_promotion(
    cmd: &pointshub_promotion::Command,
    kind: PromotionKind,
    start_time: i64,
    end_time: i64,
    min_spending: Option<f64>,
    rate: Option<f64>,
    points: Option<f64>,
) -> anyhow::Result<String> {
    let id = cmd
        .create(
            &manager(),
            pointshub_promotion::CreatePromotionInput {
                name: "test promotion".to_owned(),
                kind,
                start_time,
                end_time,
                min_spending,
                rate,
                points,
            },
        )
        .await?;

    Ok(id)
}
