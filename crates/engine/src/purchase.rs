use time::OffsetDateTime;
use ulid::Ulid;
use validator::Validate;

use pointshub_ledger::FindType;
use pointshub_promotion::{calculate_points, catalog};
use pointshub_shared::{Actor, Error, PromotionKind, Result, Role, TransactionKind, role};

use crate::Transaction;
use crate::repository::{self, NewTransaction};

#[derive(Validate)]
pub struct PurchaseInput {
    pub utorid: String,
    #[validate(range(exclusive_min = 0.0))]
    pub spent: f64,
    pub promotion_ids: Vec<String>,
    #[validate(length(max = 255))]
    pub remark: Option<String>,
}

impl super::Command {
    /// Records a purchase and credits the earned points.
    ///
    /// The applied promotion set is the id-deduplicated union of automatic
    /// promotions matching the spend and the manually supplied ids. One-time
    /// promotions only enter through the manual list and are consumed inside
    /// the same unit that creates the row; a purchase by a suspicious cashier
    /// is recorded with the computed amount but leaves the ledger untouched
    /// until the transaction's flag is cleared.
    pub async fn purchase(&self, actor: &Actor, input: PurchaseInput) -> Result<Transaction> {
        role::require(actor, Role::Cashier)?;
        input.validate()?;

        let mut conn = self.read_db.acquire().await?;
        let creator = pointshub_ledger::repository::find(
            &mut conn,
            FindType::Id(actor.user_id.to_owned()),
        )
        .await?
        .ok_or(Error::NotFound("user"))?;
        let target =
            pointshub_ledger::repository::find(&mut conn, FindType::Utorid(input.utorid))
                .await?
                .ok_or(Error::NotFound("user"))?;

        let now = OffsetDateTime::now_utc().unix_timestamp();

        let mut applied = catalog::active_automatic(&mut conn, input.spent, now).await?;
        let manual =
            catalog::resolve_manual(&mut conn, &input.promotion_ids, input.spent, now).await?;
        for promotion in manual {
            if !applied.iter().any(|p| p.id == promotion.id) {
                applied.push(promotion);
            }
        }

        let one_time: Vec<String> = applied
            .iter()
            .filter(|p| *p.kind == PromotionKind::OneTime)
            .map(|p| p.id.to_owned())
            .collect();

        // advisory pre-check; the unique-key insert below is the authority
        for promotion_id in &one_time {
            if catalog::is_one_time_used(&mut conn, &target.id, promotion_id).await? {
                return Err(Error::PromotionAlreadyUsed);
            }
        }

        let earned = calculate_points(input.spent, &applied);
        let promotion_ids: Vec<String> = applied.iter().map(|p| p.id.to_owned()).collect();
        drop(conn);

        let id = Ulid::new().to_string();
        let mut tx = self.write_db.begin().await?;

        for promotion_id in &one_time {
            catalog::mark_one_time_used(&mut tx, &target.id, promotion_id, now).await?;
        }

        repository::insert(
            &mut tx,
            NewTransaction {
                id: id.to_owned(),
                user_id: target.id.to_owned(),
                kind: TransactionKind::Purchase,
                amount: earned,
                spent: Some(input.spent),
                redeemed: None,
                related_id: None,
                suspicious: creator.suspicious,
                remark: input.remark.to_owned(),
                created_by: creator.id.to_owned(),
                created_at: now,
            },
        )
        .await?;
        repository::link_promotions(&mut tx, &id, &promotion_ids).await?;

        if !creator.suspicious {
            pointshub_ledger::adjust_balance(&mut tx, &target.id, earned).await?;
        }

        tx.commit().await?;

        tracing::info!(
            transaction_id = %id,
            user_id = %target.id,
            earned,
            suspicious = creator.suspicious,
            "purchase recorded"
        );

        Ok(Transaction::Purchase {
            id,
            user_id: target.id,
            spent: input.spent,
            earned,
            promotion_ids,
            suspicious: creator.suspicious,
            remark: input.remark,
            created_by: creator.id,
            created_at: now,
        })
    }
}
