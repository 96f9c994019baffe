use pointshub_shared::{Error, Result, TransactionKind};

use crate::Transaction;
use crate::repository::{self, ListFilter};

#[derive(Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub created_by: Option<String>,
}

impl super::Command {
    pub async fn find(&self, id: impl Into<String>) -> Result<Transaction> {
        let id = id.into();

        let mut conn = self.read_db.acquire().await?;
        let row = repository::find_row(&mut conn, &id)
            .await?
            .ok_or(Error::NotFound("transaction"))?;
        let promotion_ids = repository::promotion_ids_for(&mut conn, &id).await?;

        Ok(repository::assemble(row, promotion_ids))
    }

    /// A user's transactions, newest first. Feeds account statements in the
    /// HTTP layer and the operator CLI.
    pub async fn list_for_user(
        &self,
        user_id: impl Into<String>,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        let mut conn = self.read_db.acquire().await?;
        let rows = repository::list(
            &mut conn,
            ListFilter {
                user_id: Some(user_id.into()),
                kind: filter.kind,
                created_by: filter.created_by,
            },
        )
        .await?;

        let mut transactions = Vec::with_capacity(rows.len());
        for row in rows {
            let promotion_ids = match *row.kind {
                TransactionKind::Purchase | TransactionKind::Adjustment => {
                    repository::promotion_ids_for(&mut conn, &row.id).await?
                }
                _ => vec![],
            };
            transactions.push(repository::assemble(row, promotion_ids));
        }

        Ok(transactions)
    }
}
