use pointshub_db::table::{Promotion, PromotionUse};
use pointshub_shared::{Error, PromotionKind, Result};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqliteConnection;

use crate::repository::{self, PromotionRow};

/// Automatic promotions whose window contains `as_of` and whose minimum spend
/// (if any) is met. One-time promotions never show up here; they only enter a
/// purchase through the manually supplied id list.
pub async fn active_automatic(
    conn: &mut SqliteConnection,
    spent: f64,
    as_of: i64,
) -> Result<Vec<PromotionRow>> {
    let statement = Query::select()
        .columns([
            Promotion::Id,
            Promotion::Name,
            Promotion::Kind,
            Promotion::StartTime,
            Promotion::EndTime,
            Promotion::MinSpending,
            Promotion::Rate,
            Promotion::Points,
        ])
        .from(Promotion::Table)
        .and_where(Expr::col(Promotion::Kind).eq(PromotionKind::Automatic.as_ref()))
        .and_where(Expr::col(Promotion::StartTime).lte(as_of))
        .and_where(Expr::col(Promotion::EndTime).gt(as_of))
        .and_where(
            Expr::col(Promotion::MinSpending)
                .is_null()
                .or(Expr::col(Promotion::MinSpending).lte(spent)),
        )
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, PromotionRow, _>(&sql, values)
        .fetch_all(conn)
        .await?)
}

/// Resolves manually supplied promotion ids against the catalog. Every id must
/// exist, be inside its window, and have its minimum spend met; anything else
/// fails the whole purchase with `InvalidPromotion`.
pub async fn resolve_manual(
    conn: &mut SqliteConnection,
    ids: &[String],
    spent: f64,
    as_of: i64,
) -> Result<Vec<PromotionRow>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let rows = repository::find_many(conn, ids).await?;

    for id in ids {
        if !rows.iter().any(|row| &row.id == id) {
            return Err(Error::InvalidPromotion(id.to_owned()));
        }
    }

    for row in &rows {
        if !row.active_at(as_of) {
            return Err(Error::InvalidPromotion(row.id.to_owned()));
        }
        if let Some(min_spending) = row.min_spending
            && spent < min_spending
        {
            return Err(Error::InvalidPromotion(row.id.to_owned()));
        }
    }

    Ok(rows)
}

/// Advisory pre-check used before the atomic unit begins. The INSERT in
/// `mark_one_time_used` remains the authority under races.
pub async fn is_one_time_used(
    conn: &mut SqliteConnection,
    user_id: &str,
    promotion_id: &str,
) -> Result<bool> {
    let statement = Query::select()
        .column(PromotionUse::UserId)
        .from(PromotionUse::Table)
        .and_where(Expr::col(PromotionUse::UserId).eq(user_id))
        .and_where(Expr::col(PromotionUse::PromotionId).eq(promotion_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_optional(conn)
        .await?;

    Ok(row.is_some())
}

/// Records the one-time-use fact. The unique key on (user_id, promotion_id)
/// is the race-safety mechanism: a lost race surfaces as
/// `PromotionAlreadyUsed` and aborts the enclosing unit.
pub async fn mark_one_time_used(
    conn: &mut SqliteConnection,
    user_id: &str,
    promotion_id: &str,
    now: i64,
) -> Result<()> {
    let statement = Query::insert()
        .into_table(PromotionUse::Table)
        .columns([
            PromotionUse::UserId,
            PromotionUse::PromotionId,
            PromotionUse::UsedAt,
        ])
        .values_panic([user_id.into(), promotion_id.into(), now.into()])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values)
        .execute(conn)
        .await
        .map_err(|err| {
            if pointshub_shared::is_unique_violation(&err) {
                Error::PromotionAlreadyUsed
            } else {
                err.into()
            }
        })?;

    Ok(())
}

/// Active one-time promotions the user has not consumed yet. Advertisement
/// only; purchases are gated by the unique-key insert, not by this query.
pub async fn eligible_one_time_for(
    conn: &mut SqliteConnection,
    user_id: &str,
    as_of: i64,
) -> Result<Vec<PromotionRow>> {
    let used = Query::select()
        .column(PromotionUse::PromotionId)
        .from(PromotionUse::Table)
        .and_where(Expr::col(PromotionUse::UserId).eq(user_id))
        .to_owned();

    let statement = Query::select()
        .columns([
            Promotion::Id,
            Promotion::Name,
            Promotion::Kind,
            Promotion::StartTime,
            Promotion::EndTime,
            Promotion::MinSpending,
            Promotion::Rate,
            Promotion::Points,
        ])
        .from(Promotion::Table)
        .and_where(Expr::col(Promotion::Kind).eq(PromotionKind::OneTime.as_ref()))
        .and_where(Expr::col(Promotion::StartTime).lte(as_of))
        .and_where(Expr::col(Promotion::EndTime).gt(as_of))
        .and_where(Expr::col(Promotion::Id).not_in_subquery(used))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, PromotionRow, _>(&sql, values)
        .fetch_all(conn)
        .await?)
}
