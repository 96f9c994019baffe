use std::{path::PathBuf, str::FromStr, time::Duration};

use pointshub_ledger::CreateUserInput;
use pointshub_shared::{Actor, Role, State};
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
pub async fn create_user(
    state: &State,
    utorid: impl Into<String>,
    name: impl Into<String>,
) -> anyhow::Result<String> {
    let cmd = pointshub_ledger::Command::new(state.clone());
    let id = cmd
        .create(
            &manager(),
            CreateUserInput {
                utorid: utorid.into(),
                name: name.into(),
            },
        )
        .await?;

    Ok(id)
}

#[allow(dead_code)]
pub async fn create_event(
    cmd: &pointshub_event::Command,
    points_total: i64,
    capacity: Option<i64>,
) -> anyhow::Result<String> {
    let id = cmd
        .create(
            &manager(),
            pointshub_event::CreateEventInput {
                name: "orientation".to_owned(),
                points_total,
                capacity,
            },
        )
        .await?;

    Ok(id)
}
