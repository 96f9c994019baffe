use time::OffsetDateTime;
use ulid::Ulid;
use validator::Validate;

use pointshub_ledger::FindType;
use pointshub_shared::{Actor, Error, Result, Role, TransactionKind, role};

use crate::Transaction;
use crate::repository::{self, NewTransaction};

#[derive(Validate)]
pub struct RedemptionInput {
    #[validate(range(min = 1))]
    pub amount: i64,
    #[validate(length(max = 255))]
    pub remark: Option<String>,
}

impl super::Command {
    /// Creates a pending redemption claim for the caller's own account.
    ///
    /// No ledger change happens here: the row carries `amount = 0` and
    /// `redeemed` records the requested quantity. The debit waits for a
    /// cashier to process the claim after confirming identity.
    pub async fn redeem(&self, actor: &Actor, input: RedemptionInput) -> Result<Transaction> {
        role::require(actor, Role::Regular)?;
        input.validate()?;

        let mut conn = self.read_db.acquire().await?;
        let user = pointshub_ledger::repository::find(
            &mut conn,
            FindType::Id(actor.user_id.to_owned()),
        )
        .await?
        .ok_or(Error::NotFound("user"))?;
        drop(conn);

        if !user.verified {
            return Err(Error::NotVerified);
        }

        if user.points < input.amount {
            return Err(Error::InsufficientPoints);
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let id = Ulid::new().to_string();

        let mut conn = self.write_db.acquire().await?;
        repository::insert(
            &mut conn,
            NewTransaction {
                id: id.to_owned(),
                user_id: user.id.to_owned(),
                kind: TransactionKind::Redemption,
                amount: 0,
                spent: None,
                redeemed: Some(input.amount),
                related_id: None,
                suspicious: false,
                remark: input.remark.to_owned(),
                created_by: user.id.to_owned(),
                created_at: now,
            },
        )
        .await?;

        tracing::info!(transaction_id = %id, user_id = %user.id, redeemed = input.amount, "redemption created");

        Ok(Transaction::Redemption {
            id,
            user_id: user.id.to_owned(),
            amount: 0,
            redeemed: input.amount,
            processed_at: None,
            processed_by: None,
            remark: input.remark,
            created_by: user.id,
            created_at: now,
        })
    }

    /// Processes a pending redemption: the irreversible debit.
    ///
    /// The `processed_at IS NULL` guard inside the unit decides races between
    /// two processors, and the owner's balance is re-checked at processing
    /// time since it may have drifted since creation.
    pub async fn process_redemption(
        &self,
        actor: &Actor,
        transaction_id: impl Into<String>,
    ) -> Result<Transaction> {
        role::require(actor, Role::Cashier)?;

        let transaction_id = transaction_id.into();

        let mut conn = self.read_db.acquire().await?;
        let row = repository::find_row(&mut conn, &transaction_id)
            .await?
            .ok_or(Error::NotFound("transaction"))?;
        drop(conn);

        if *row.kind != TransactionKind::Redemption {
            return Err(Error::InvalidTransactionKind);
        }

        if row.processed_at.is_some() {
            return Err(Error::AlreadyProcessed);
        }

        let Some(redeemed) = row.redeemed else {
            return Err(Error::InvalidTransactionKind);
        };

        let now = OffsetDateTime::now_utc().unix_timestamp();

        let mut tx = self.write_db.begin().await?;

        let affected = sqlx::query(
            r#"UPDATE "transaction" SET amount = ?1, processed_at = ?2, processed_by = ?3
               WHERE id = ?4 AND processed_at IS NULL"#,
        )
        .bind(-redeemed)
        .bind(now)
        .bind(&actor.user_id)
        .bind(&transaction_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(Error::AlreadyProcessed);
        }

        pointshub_ledger::adjust_balance(&mut tx, &row.user_id, -redeemed).await?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = %transaction_id,
            user_id = %row.user_id,
            redeemed,
            processed_by = %actor.user_id,
            "redemption processed"
        );

        Ok(Transaction::Redemption {
            id: transaction_id,
            user_id: row.user_id,
            amount: -redeemed,
            redeemed,
            processed_at: Some(now),
            processed_by: Some(actor.user_id.to_owned()),
            remark: row.remark,
            created_by: row.created_by,
            created_at: row.created_at,
        })
    }
}
