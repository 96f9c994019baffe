use time::OffsetDateTime;
use ulid::Ulid;
use validator::Validate;

use pointshub_ledger::FindType;
use pointshub_shared::{Actor, Error, Result, Role, TransactionKind, role};

use crate::Transaction;
use crate::repository::{self, NewTransaction};

#[derive(Validate)]
pub struct TransferInput {
    /// Recipient's utorid.
    pub utorid: String,
    #[validate(range(min = 1))]
    pub amount: i64,
    #[validate(length(max = 255))]
    pub remark: Option<String>,
}

impl super::Command {
    /// Peer-to-peer transfer from the caller's own account.
    ///
    /// Produces two rows in one unit — the sender's negative, the
    /// recipient's positive, each pointing at the other account — and moves
    /// the same amount between the two balances. Both rows land or neither
    /// does. Returns the sender's row.
    pub async fn transfer(&self, actor: &Actor, input: TransferInput) -> Result<Transaction> {
        role::require(actor, Role::Regular)?;
        input.validate()?;

        let mut conn = self.read_db.acquire().await?;
        let sender = pointshub_ledger::repository::find(
            &mut conn,
            FindType::Id(actor.user_id.to_owned()),
        )
        .await?
        .ok_or(Error::NotFound("user"))?;
        let recipient =
            pointshub_ledger::repository::find(&mut conn, FindType::Utorid(input.utorid))
                .await?
                .ok_or(Error::NotFound("user"))?;
        drop(conn);

        if !sender.verified {
            return Err(Error::NotVerified);
        }

        if sender.points < input.amount {
            return Err(Error::InsufficientPoints);
        }

        if !recipient.verified {
            return Err(Error::RecipientNotVerified);
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let sender_row_id = Ulid::new().to_string();
        let recipient_row_id = Ulid::new().to_string();

        let mut tx = self.write_db.begin().await?;

        repository::insert(
            &mut tx,
            NewTransaction {
                id: sender_row_id.to_owned(),
                user_id: sender.id.to_owned(),
                kind: TransactionKind::Transfer,
                amount: -input.amount,
                spent: None,
                redeemed: None,
                related_id: Some(recipient.id.to_owned()),
                suspicious: false,
                remark: input.remark.to_owned(),
                created_by: sender.id.to_owned(),
                created_at: now,
            },
        )
        .await?;
        repository::insert(
            &mut tx,
            NewTransaction {
                id: recipient_row_id.to_owned(),
                user_id: recipient.id.to_owned(),
                kind: TransactionKind::Transfer,
                amount: input.amount,
                spent: None,
                redeemed: None,
                related_id: Some(sender.id.to_owned()),
                suspicious: false,
                remark: input.remark.to_owned(),
                created_by: sender.id.to_owned(),
                created_at: now,
            },
        )
        .await?;

        pointshub_ledger::adjust_balance(&mut tx, &sender.id, -input.amount).await?;
        pointshub_ledger::adjust_balance(&mut tx, &recipient.id, input.amount).await?;

        tx.commit().await?;

        tracing::info!(
            sender = %sender.id,
            recipient = %recipient.id,
            amount = input.amount,
            "transfer completed"
        );

        Ok(Transaction::Transfer {
            id: sender_row_id,
            user_id: sender.id.to_owned(),
            amount: -input.amount,
            related_user_id: recipient.id,
            remark: input.remark,
            created_by: sender.id,
            created_at: now,
        })
    }
}
