use pointshub_db::table;
use pointshub_shared::TransactionKind;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow};

use crate::Transaction;

#[derive(FromRow, Clone, Debug)]
pub struct TransactionRow {
    pub id: String,
    pub user_id: String,
    pub kind: sqlx::types::Text<TransactionKind>,
    pub amount: i64,
    pub spent: Option<f64>,
    pub redeemed: Option<i64>,
    pub related_id: Option<String>,
    pub suspicious: bool,
    pub remark: Option<String>,
    pub processed_at: Option<i64>,
    pub processed_by: Option<String>,
    pub created_by: String,
    pub created_at: i64,
}

pub(crate) struct NewTransaction {
    pub id: String,
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount: i64,
    pub spent: Option<f64>,
    pub redeemed: Option<i64>,
    pub related_id: Option<String>,
    pub suspicious: bool,
    pub remark: Option<String>,
    pub created_by: String,
    pub created_at: i64,
}

pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    row: NewTransaction,
) -> pointshub_shared::Result<()> {
    let statement = Query::insert()
        .into_table(table::Transaction::Table)
        .columns([
            table::Transaction::Id,
            table::Transaction::UserId,
            table::Transaction::Kind,
            table::Transaction::Amount,
            table::Transaction::Spent,
            table::Transaction::Redeemed,
            table::Transaction::RelatedId,
            table::Transaction::Suspicious,
            table::Transaction::Remark,
            table::Transaction::CreatedBy,
            table::Transaction::CreatedAt,
        ])
        .values_panic([
            row.id.into(),
            row.user_id.into(),
            row.kind.to_string().into(),
            row.amount.into(),
            row.spent.into(),
            row.redeemed.into(),
            row.related_id.into(),
            row.suspicious.into(),
            row.remark.into(),
            row.created_by.into(),
            row.created_at.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub async fn find_row(
    conn: &mut SqliteConnection,
    id: &str,
) -> pointshub_shared::Result<Option<TransactionRow>> {
    let statement = Query::select()
        .columns([
            table::Transaction::Id,
            table::Transaction::UserId,
            table::Transaction::Kind,
            table::Transaction::Amount,
            table::Transaction::Spent,
            table::Transaction::Redeemed,
            table::Transaction::RelatedId,
            table::Transaction::Suspicious,
            table::Transaction::Remark,
            table::Transaction::ProcessedAt,
            table::Transaction::ProcessedBy,
            table::Transaction::CreatedBy,
            table::Transaction::CreatedAt,
        ])
        .from(table::Transaction::Table)
        .and_where(Expr::col(table::Transaction::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, TransactionRow, _>(&sql, values)
        .fetch_optional(conn)
        .await?)
}

pub(crate) async fn link_promotions(
    conn: &mut SqliteConnection,
    transaction_id: &str,
    promotion_ids: &[String],
) -> pointshub_shared::Result<()> {
    if promotion_ids.is_empty() {
        return Ok(());
    }

    let mut statement = Query::insert()
        .into_table(table::TransactionPromotion::Table)
        .columns([
            table::TransactionPromotion::TransactionId,
            table::TransactionPromotion::PromotionId,
        ])
        .to_owned();

    for promotion_id in promotion_ids {
        statement.values_panic([transaction_id.into(), promotion_id.to_owned().into()]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub async fn promotion_ids_for(
    conn: &mut SqliteConnection,
    transaction_id: &str,
) -> pointshub_shared::Result<Vec<String>> {
    let statement = Query::select()
        .column(table::TransactionPromotion::PromotionId)
        .from(table::TransactionPromotion::Table)
        .and_where(Expr::col(table::TransactionPromotion::TransactionId).eq(transaction_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub(crate) struct ListFilter {
    pub user_id: Option<String>,
    pub kind: Option<TransactionKind>,
    pub created_by: Option<String>,
}

pub(crate) async fn list(
    conn: &mut SqliteConnection,
    filter: ListFilter,
) -> pointshub_shared::Result<Vec<TransactionRow>> {
    let mut statement = Query::select()
        .columns([
            table::Transaction::Id,
            table::Transaction::UserId,
            table::Transaction::Kind,
            table::Transaction::Amount,
            table::Transaction::Spent,
            table::Transaction::Redeemed,
            table::Transaction::RelatedId,
            table::Transaction::Suspicious,
            table::Transaction::Remark,
            table::Transaction::ProcessedAt,
            table::Transaction::ProcessedBy,
            table::Transaction::CreatedBy,
            table::Transaction::CreatedAt,
        ])
        .from(table::Transaction::Table)
        .order_by(table::Transaction::CreatedAt, Order::Desc)
        .order_by(table::Transaction::Id, Order::Desc)
        .to_owned();

    if let Some(user_id) = filter.user_id {
        statement.and_where(Expr::col(table::Transaction::UserId).eq(user_id));
    }

    if let Some(kind) = filter.kind {
        statement.and_where(Expr::col(table::Transaction::Kind).eq(kind.as_ref()));
    }

    if let Some(created_by) = filter.created_by {
        statement.and_where(Expr::col(table::Transaction::CreatedBy).eq(created_by));
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, TransactionRow, _>(&sql, values)
        .fetch_all(conn)
        .await?)
}

/// Builds the in-process tagged union out of the flexible storage row.
pub(crate) fn assemble(row: TransactionRow, promotion_ids: Vec<String>) -> Transaction {
    match *row.kind {
        TransactionKind::Purchase => Transaction::Purchase {
            id: row.id,
            user_id: row.user_id,
            spent: row.spent.unwrap_or_default(),
            earned: row.amount,
            promotion_ids,
            suspicious: row.suspicious,
            remark: row.remark,
            created_by: row.created_by,
            created_at: row.created_at,
        },
        TransactionKind::Adjustment => Transaction::Adjustment {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            related_id: row.related_id,
            promotion_ids,
            remark: row.remark,
            created_by: row.created_by,
            created_at: row.created_at,
        },
        TransactionKind::Redemption => Transaction::Redemption {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            redeemed: row.redeemed.unwrap_or_default(),
            processed_at: row.processed_at,
            processed_by: row.processed_by,
            remark: row.remark,
            created_by: row.created_by,
            created_at: row.created_at,
        },
        TransactionKind::Transfer => Transaction::Transfer {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            related_user_id: row.related_id.unwrap_or_default(),
            remark: row.remark,
            created_by: row.created_by,
            created_at: row.created_at,
        },
        TransactionKind::Event => Transaction::Event {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            event_id: row.related_id.unwrap_or_default(),
            remark: row.remark,
            created_by: row.created_by,
            created_at: row.created_at,
        },
    }
}
