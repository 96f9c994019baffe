use sqlx::SqliteConnection;

use pointshub_shared::{Error, Result};

use crate::repository::{self, FindType};

/// Applies `delta` to a user's balance and returns the new balance. The only
/// writer of `user.points` in the system.
///
/// The update is guarded by `points + delta >= 0` so a balance can never rest
/// negative, even when two debits race: the second one simply matches zero
/// rows and fails `InsufficientPoints`. Callers always invoke this inside the
/// same database transaction as the transaction row that justifies the delta.
pub async fn adjust_balance(
    conn: &mut SqliteConnection,
    user_id: &str,
    delta: i64,
) -> Result<i64> {
    let affected = sqlx::query(
        r#"UPDATE "user" SET points = points + ?1 WHERE id = ?2 AND points + ?1 >= 0"#,
    )
    .bind(delta)
    .bind(user_id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if affected == 0 {
        return match repository::find(&mut *conn, FindType::Id(user_id.to_owned())).await? {
            Some(_) => Err(Error::InsufficientPoints),
            None => Err(Error::NotFound("user")),
        };
    }

    let (points,): (i64,) = sqlx::query_as(r#"SELECT points FROM "user" WHERE id = ?1"#)
        .bind(user_id)
        .fetch_one(conn)
        .await?;

    Ok(points)
}
