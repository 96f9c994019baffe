use std::{path::PathBuf, str::FromStr, time::Duration};

use pointshub_ledger::CreateUserInput;
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

pub fn superuser() -> Actor {
    Actor::new("00000000000000000000000000", Role::Superuser)
}

/// Creates a user and brings them to the requested role. Promotion above
/// regular implies verification, matching the production rule.
pub async fn create_user(
    state: &State,
    utorid: &str,
    role: Role,
    verified: bool,
) -> anyhow::Result<String> {
    let cmd = pointshub_ledger::Command::new(state.clone());
    let id = cmd
        .create(
            &superuser(),
            CreateUserInput {
                utorid: utorid.to_owned(),
                name: utorid.to_owned(),
            },
        )
        .await?;

    if verified || role > Role::Regular {
        cmd.verify(&superuser(), utorid).await?;
    }

    if role > Role::Regular {
        cmd.set_role(&superuser(), utorid, role).await?;
    }

    Ok(id)
}

#[allow(dead_code)]
pub async fn gift_points(state: &State, user_id: &str, amount: i64) -> anyhow::Result<i64> {
    let mut conn = state.write_db.acquire().await?;
    let balance = pointshub_ledger::adjust_balance(&mut conn, user_id, amount).await?;

    Ok(balance)
}

#[allow(dead_code)]
pub async fn balance_of(state: &State, user_id: &str) -> anyhow::Result<i64> {
    let cmd = pointshub_ledger::Command::new(state.clone());
    let user = cmd.load(user_id).await?.expect("user exists");

    Ok(user.points)
}

#[allow(dead_code)]
pub async fn create_promotion(
    state: &State,
    kind: PromotionKind,
    min_spending: Option<f64>,
    rate: Option<f64>,
    points: Option<f64>,
) -> anyhow::Result<String> {
    let cmd = pointshub_promotion::Command::new(state.clone());
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    let id = cmd
        .create(
            &superuser(),
            pointshub_promotion::CreatePromotionInput {
                name: "test promotion".to_owned(),
                kind,
                start_time: now - 60,
                end_time: now + 3600,
                min_spending,
                rate,
                points,
            },
        )
        .await?;

    Ok(id)
}

#[allow(dead_code)]
pub async fn create_event(
    state: &State,
    points_total: i64,
    guests: &[&str],
) -> anyhow::Result<String> {
    let cmd = pointshub_event::Command::new(state.clone());
    let id = cmd
        .create(
            &superuser(),
            pointshub_event::CreateEventInput {
                name: "orientation".to_owned(),
                points_total,
                capacity: None,
            },
        )
        .await?;

    for utorid in guests {
        cmd.add_guest(&superuser(), &id, *utorid).await?;
    }

    Ok(id)
}
