use pointshub_shared::{Actor, Error, Result, Role, role};

use crate::Transaction;
use crate::repository;

impl super::Command {
    /// Flips a transaction's suspicious flag, atomically re-entering the
    /// ledger: flagging debits the row's amount from the affected user,
    /// clearing credits it back. This is how a held purchase's frozen amount
    /// eventually lands.
    ///
    /// Debits that would drive the balance negative fail
    /// `InsufficientPoints`; a manager can adjust the balance first.
    pub async fn set_transaction_suspicious(
        &self,
        actor: &Actor,
        transaction_id: impl Into<String>,
        suspicious: bool,
    ) -> Result<Transaction> {
        role::require(actor, Role::Manager)?;

        let transaction_id = transaction_id.into();

        let mut conn = self.read_db.acquire().await?;
        let row = repository::find_row(&mut conn, &transaction_id)
            .await?
            .ok_or(Error::NotFound("transaction"))?;
        drop(conn);

        if row.suspicious == suspicious {
            return self.find(&transaction_id).await;
        }

        let mut tx = self.write_db.begin().await?;

        // guard on the old value: a concurrent flip makes this a no-op
        let affected = sqlx::query(
            r#"UPDATE "transaction" SET suspicious = ?1 WHERE id = ?2 AND suspicious = ?3"#,
        )
        .bind(suspicious)
        .bind(&transaction_id)
        .bind(row.suspicious)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            return self.find(&transaction_id).await;
        }

        let delta = if suspicious { -row.amount } else { row.amount };
        if delta != 0 {
            pointshub_ledger::adjust_balance(&mut tx, &row.user_id, delta).await?;
        }

        tx.commit().await?;

        tracing::info!(
            transaction_id = %transaction_id,
            user_id = %row.user_id,
            suspicious,
            delta,
            "transaction suspicious flag updated"
        );

        self.find(&transaction_id).await
    }
}
