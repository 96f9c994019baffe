use sqlx::SqliteConnection;

use pointshub_shared::{Error, Result};

use crate::repository;

/// Draws `total` points out of an event's pool, decrementing `points_remain`
/// and incrementing `points_awarded` in one statement so the invariant
/// `points_remain + points_awarded == points_total` holds at every instant.
///
/// Guarded by `points_remain >= total`: an overdraw matches zero rows and
/// fails `InsufficientEventPoints`, aborting the enclosing unit.
pub async fn draw_down(conn: &mut SqliteConnection, event_id: &str, total: i64) -> Result<()> {
    let affected = sqlx::query(
        "UPDATE event SET points_remain = points_remain - ?1, points_awarded = points_awarded + ?1 \
         WHERE id = ?2 AND points_remain >= ?1",
    )
    .bind(total)
    .bind(event_id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if affected == 0 {
        return match repository::find(&mut *conn, event_id).await? {
            Some(_) => Err(Error::InsufficientEventPoints),
            None => Err(Error::NotFound("event")),
        };
    }

    Ok(())
}

/// Marks a single guest confirmed once points have been awarded.
pub async fn confirm_guest(
    conn: &mut SqliteConnection,
    event_id: &str,
    user_id: &str,
) -> Result<()> {
    sqlx::query("UPDATE event_guest SET confirmed = 1 WHERE event_id = ?1 AND user_id = ?2")
        .bind(event_id)
        .bind(user_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Marks every guest of the event confirmed (all-guests award).
pub async fn confirm_all_guests(conn: &mut SqliteConnection, event_id: &str) -> Result<()> {
    sqlx::query("UPDATE event_guest SET confirmed = 1 WHERE event_id = ?1")
        .bind(event_id)
        .execute(conn)
        .await?;

    Ok(())
}
