use pointshub_db::table::{Event, EventGuest, EventOrganizer};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow};

#[derive(FromRow, Clone, Debug)]
pub struct EventRow {
    pub id: String,
    pub name: String,
    pub points_total: i64,
    pub points_remain: i64,
    pub points_awarded: i64,
    pub capacity: Option<i64>,
}

#[derive(FromRow, Clone, Debug)]
pub struct GuestRow {
    pub user_id: String,
    pub confirmed: bool,
}

pub async fn find(
    conn: &mut SqliteConnection,
    id: &str,
) -> pointshub_shared::Result<Option<EventRow>> {
    let statement = Query::select()
        .columns([
            Event::Id,
            Event::Name,
            Event::PointsTotal,
            Event::PointsRemain,
            Event::PointsAwarded,
            Event::Capacity,
        ])
        .from(Event::Table)
        .and_where(Expr::col(Event::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, EventRow, _>(&sql, values)
        .fetch_optional(conn)
        .await?)
}

pub(crate) async fn create(
    conn: &mut SqliteConnection,
    id: String,
    name: String,
    points_total: i64,
    capacity: Option<i64>,
    now: i64,
) -> pointshub_shared::Result<()> {
    let statement = Query::insert()
        .into_table(Event::Table)
        .columns([
            Event::Id,
            Event::Name,
            Event::PointsTotal,
            Event::PointsRemain,
            Event::PointsAwarded,
            Event::Capacity,
            Event::CreatedAt,
        ])
        .values_panic([
            id.into(),
            name.into(),
            points_total.into(),
            points_total.into(),
            0.into(),
            capacity.into(),
            now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub async fn guests(
    conn: &mut SqliteConnection,
    event_id: &str,
) -> pointshub_shared::Result<Vec<GuestRow>> {
    let statement = Query::select()
        .columns([EventGuest::UserId, EventGuest::Confirmed])
        .from(EventGuest::Table)
        .and_where(Expr::col(EventGuest::EventId).eq(event_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, GuestRow, _>(&sql, values)
        .fetch_all(conn)
        .await?)
}

pub async fn is_guest(
    conn: &mut SqliteConnection,
    event_id: &str,
    user_id: &str,
) -> pointshub_shared::Result<bool> {
    let statement = Query::select()
        .column(EventGuest::UserId)
        .from(EventGuest::Table)
        .and_where(Expr::col(EventGuest::EventId).eq(event_id))
        .and_where(Expr::col(EventGuest::UserId).eq(user_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_optional(conn)
        .await?;

    Ok(row.is_some())
}

pub async fn is_organizer(
    conn: &mut SqliteConnection,
    event_id: &str,
    user_id: &str,
) -> pointshub_shared::Result<bool> {
    let statement = Query::select()
        .column(EventOrganizer::UserId)
        .from(EventOrganizer::Table)
        .and_where(Expr::col(EventOrganizer::EventId).eq(event_id))
        .and_where(Expr::col(EventOrganizer::UserId).eq(user_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_optional(conn)
        .await?;

    Ok(row.is_some())
}

pub(crate) async fn guest_count(
    conn: &mut SqliteConnection,
    event_id: &str,
) -> pointshub_shared::Result<i64> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM event_guest WHERE event_id = ?1")
            .bind(event_id)
            .fetch_one(conn)
            .await?;

    Ok(count)
}

pub(crate) async fn add_guest(
    conn: &mut SqliteConnection,
    event_id: &str,
    user_id: &str,
) -> pointshub_shared::Result<()> {
    let statement = Query::insert()
        .into_table(EventGuest::Table)
        .columns([EventGuest::EventId, EventGuest::UserId, EventGuest::Confirmed])
        .values_panic([event_id.into(), user_id.into(), false.into()])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub(crate) async fn remove_guest(
    conn: &mut SqliteConnection,
    event_id: &str,
    user_id: &str,
) -> pointshub_shared::Result<()> {
    let statement = Query::delete()
        .from_table(EventGuest::Table)
        .and_where(Expr::col(EventGuest::EventId).eq(event_id))
        .and_where(Expr::col(EventGuest::UserId).eq(user_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub(crate) async fn add_organizer(
    conn: &mut SqliteConnection,
    event_id: &str,
    user_id: &str,
) -> pointshub_shared::Result<()> {
    let statement = Query::insert()
        .into_table(EventOrganizer::Table)
        .columns([EventOrganizer::EventId, EventOrganizer::UserId])
        .values_panic([event_id.into(), user_id.into()])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}
