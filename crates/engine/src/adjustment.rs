use time::OffsetDateTime;
use ulid::Ulid;
use validator::{Validate, ValidationError};

use pointshub_ledger::FindType;
use pointshub_shared::{Actor, Error, Result, Role, TransactionKind, role};

use crate::Transaction;
use crate::repository::{self, NewTransaction};

#[derive(Validate)]
pub struct AdjustmentInput {
    pub utorid: String,
    #[validate(custom(function = non_zero))]
    pub amount: i64,
    /// Another transaction this adjustment corrects.
    pub related_id: Option<String>,
    /// Recorded for audit; adjustments never recompute points.
    pub promotion_ids: Vec<String>,
    #[validate(length(max = 255))]
    pub remark: Option<String>,
}

fn non_zero(amount: i64) -> std::result::Result<(), ValidationError> {
    if amount == 0 {
        return Err(ValidationError::new("non_zero"));
    }

    Ok(())
}

impl super::Command {
    /// Manager correction of a balance. Applied immediately and
    /// unconditionally; adjustments are never held for suspicion.
    pub async fn adjust(&self, actor: &Actor, input: AdjustmentInput) -> Result<Transaction> {
        role::require(actor, Role::Manager)?;
        input.validate()?;

        let mut conn = self.read_db.acquire().await?;
        let target =
            pointshub_ledger::repository::find(&mut conn, FindType::Utorid(input.utorid))
                .await?
                .ok_or(Error::NotFound("user"))?;

        if let Some(related_id) = &input.related_id {
            repository::find_row(&mut conn, related_id)
                .await?
                .ok_or(Error::NotFound("transaction"))?;
        }

        if !input.promotion_ids.is_empty() {
            let found =
                pointshub_promotion::repository::find_many(&mut conn, &input.promotion_ids)
                    .await?;
            for promotion_id in &input.promotion_ids {
                if !found.iter().any(|p| &p.id == promotion_id) {
                    return Err(Error::InvalidPromotion(promotion_id.to_owned()));
                }
            }
        }
        drop(conn);

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let id = Ulid::new().to_string();

        let mut tx = self.write_db.begin().await?;

        repository::insert(
            &mut tx,
            NewTransaction {
                id: id.to_owned(),
                user_id: target.id.to_owned(),
                kind: TransactionKind::Adjustment,
                amount: input.amount,
                spent: None,
                redeemed: None,
                related_id: input.related_id.to_owned(),
                suspicious: false,
                remark: input.remark.to_owned(),
                created_by: actor.user_id.to_owned(),
                created_at: now,
            },
        )
        .await?;
        repository::link_promotions(&mut tx, &id, &input.promotion_ids).await?;

        pointshub_ledger::adjust_balance(&mut tx, &target.id, input.amount).await?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = %id,
            user_id = %target.id,
            amount = input.amount,
            "adjustment applied"
        );

        Ok(Transaction::Adjustment {
            id,
            user_id: target.id,
            amount: input.amount,
            related_id: input.related_id,
            promotion_ids: input.promotion_ids,
            remark: input.remark,
            created_by: actor.user_id.to_owned(),
            created_at: now,
        })
    }
}
