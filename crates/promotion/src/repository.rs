use pointshub_db::table::Promotion;
use pointshub_shared::PromotionKind;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow};

const COLUMNS: [Promotion; 8] = [
    Promotion::Id,
    Promotion::Name,
    Promotion::Kind,
    Promotion::StartTime,
    Promotion::EndTime,
    Promotion::MinSpending,
    Promotion::Rate,
    Promotion::Points,
];

#[derive(FromRow, Clone, Debug)]
pub struct PromotionRow {
    pub id: String,
    pub name: String,
    pub kind: sqlx::types::Text<PromotionKind>,
    pub start_time: i64,
    pub end_time: i64,
    pub min_spending: Option<f64>,
    pub rate: Option<f64>,
    pub points: Option<f64>,
}

impl PromotionRow {
    /// The validity window is half-open: `[start_time, end_time)`.
    pub fn active_at(&self, as_of: i64) -> bool {
        self.start_time <= as_of && as_of < self.end_time
    }
}

pub async fn find(
    conn: &mut SqliteConnection,
    id: &str,
) -> pointshub_shared::Result<Option<PromotionRow>> {
    let statement = Query::select()
        .columns(COLUMNS)
        .from(Promotion::Table)
        .and_where(Expr::col(Promotion::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, PromotionRow, _>(&sql, values)
        .fetch_optional(conn)
        .await?)
}

pub async fn find_many(
    conn: &mut SqliteConnection,
    ids: &[String],
) -> pointshub_shared::Result<Vec<PromotionRow>> {
    let statement = Query::select()
        .columns(COLUMNS)
        .from(Promotion::Table)
        .and_where(Expr::col(Promotion::Id).is_in(ids.iter().cloned()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, PromotionRow, _>(&sql, values)
        .fetch_all(conn)
        .await?)
}

pub(crate) struct NewPromotion {
    pub id: String,
    pub name: String,
    pub kind: PromotionKind,
    pub start_time: i64,
    pub end_time: i64,
    pub min_spending: Option<f64>,
    pub rate: Option<f64>,
    pub points: Option<f64>,
    pub created_at: i64,
}

pub(crate) async fn create(
    conn: &mut SqliteConnection,
    promotion: NewPromotion,
) -> pointshub_shared::Result<()> {
    let statement = Query::insert()
        .into_table(Promotion::Table)
        .columns([
            Promotion::Id,
            Promotion::Name,
            Promotion::Kind,
            Promotion::StartTime,
            Promotion::EndTime,
            Promotion::MinSpending,
            Promotion::Rate,
            Promotion::Points,
            Promotion::CreatedAt,
        ])
        .values_panic([
            promotion.id.into(),
            promotion.name.into(),
            promotion.kind.to_string().into(),
            promotion.start_time.into(),
            promotion.end_time.into(),
            promotion.min_spending.into(),
            promotion.rate.into(),
            promotion.points.into(),
            promotion.created_at.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub(crate) struct UpdateInput {
    pub id: String,
    pub name: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub min_spending: Option<Option<f64>>,
    pub rate: Option<Option<f64>>,
    pub points: Option<Option<f64>>,
}

pub(crate) async fn update(
    conn: &mut SqliteConnection,
    input: UpdateInput,
) -> pointshub_shared::Result<()> {
    let mut statement = Query::update()
        .table(Promotion::Table)
        .and_where(Expr::col(Promotion::Id).eq(input.id))
        .to_owned();

    if let Some(name) = input.name {
        statement.value(Promotion::Name, name);
    }

    if let Some(start_time) = input.start_time {
        statement.value(Promotion::StartTime, start_time);
    }

    if let Some(end_time) = input.end_time {
        statement.value(Promotion::EndTime, end_time);
    }

    if let Some(min_spending) = input.min_spending {
        statement.value(Promotion::MinSpending, min_spending);
    }

    if let Some(rate) = input.rate {
        statement.value(Promotion::Rate, rate);
    }

    if let Some(points) = input.points {
        statement.value(Promotion::Points, points);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub(crate) async fn delete(
    conn: &mut SqliteConnection,
    id: &str,
) -> pointshub_shared::Result<()> {
    let statement = Query::delete()
        .from_table(Promotion::Table)
        .and_where(Expr::col(Promotion::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}
