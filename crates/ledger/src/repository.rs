use pointshub_db::table::User;
use pointshub_shared::Role;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow};

#[derive(FromRow)]
pub struct UserRow {
    pub id: String,
    pub utorid: String,
    pub name: String,
    pub role: sqlx::types::Text<Role>,
    pub points: i64,
    pub verified: bool,
    pub suspicious: bool,
}

pub enum FindType {
    Id(String),
    Utorid(String),
}

pub async fn find(
    conn: &mut SqliteConnection,
    arg_type: FindType,
) -> pointshub_shared::Result<Option<UserRow>> {
    let mut statement = Query::select()
        .columns([
            User::Id,
            User::Utorid,
            User::Name,
            User::Role,
            User::Points,
            User::Verified,
            User::Suspicious,
        ])
        .from(User::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Id(id) => statement.and_where(Expr::col(User::Id).eq(id)),
        FindType::Utorid(utorid) => statement.and_where(Expr::col(User::Utorid).eq(utorid)),
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_optional(conn)
        .await?)
}

pub(crate) async fn create(
    conn: &mut SqliteConnection,
    id: String,
    utorid: String,
    name: String,
    now: i64,
) -> pointshub_shared::Result<()> {
    let statement = Query::insert()
        .into_table(User::Table)
        .columns([
            User::Id,
            User::Utorid,
            User::Name,
            User::Role,
            User::Points,
            User::Verified,
            User::Suspicious,
            User::CreatedAt,
        ])
        .values_panic([
            id.into(),
            utorid.into(),
            name.into(),
            Role::Regular.to_string().into(),
            0.into(),
            false.into(),
            false.into(),
            now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub struct UpdateInput {
    pub id: String,
    pub role: Option<Role>,
    pub verified: Option<bool>,
    pub suspicious: Option<bool>,
}

pub async fn update(
    conn: &mut SqliteConnection,
    input: UpdateInput,
) -> pointshub_shared::Result<()> {
    let mut statement = Query::update()
        .table(User::Table)
        .and_where(Expr::col(User::Id).eq(input.id))
        .to_owned();

    if let Some(role) = input.role {
        statement.value(User::Role, role.as_ref());
    }

    if let Some(verified) = input.verified {
        statement.value(User::Verified, verified);
    }

    if let Some(suspicious) = input.suspicious {
        statement.value(User::Suspicious, suspicious);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}
