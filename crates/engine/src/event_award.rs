use time::OffsetDateTime;
use ulid::Ulid;
use validator::Validate;

use pointshub_event::{pool, repository as event_repository};
use pointshub_ledger::FindType;
use pointshub_shared::{Actor, Error, Result, Role, TransactionKind};

use crate::Transaction;
use crate::repository::{self, NewTransaction};

#[derive(Validate)]
pub struct EventAwardInput {
    pub event_id: String,
    /// When set, award this single guest; otherwise award every guest.
    pub utorid: Option<String>,
    /// Points per guest.
    #[validate(range(min = 1))]
    pub amount: i64,
    #[validate(length(max = 255))]
    pub remark: Option<String>,
}

impl super::Command {
    /// Awards event points out of the event's pool, one transaction row per
    /// credited guest. Authorized for managers and that event's organizers.
    ///
    /// Single-guest mode draws `amount` from the pool; all-guests mode draws
    /// `amount × guests` in one step so a short pool rejects the whole award.
    /// Credited guests are marked confirmed in the same unit.
    pub async fn award_event(
        &self,
        actor: &Actor,
        input: EventAwardInput,
    ) -> Result<Vec<Transaction>> {
        input.validate()?;

        let mut conn = self.read_db.acquire().await?;

        if actor.role < Role::Manager
            && !event_repository::is_organizer(&mut conn, &input.event_id, &actor.user_id).await?
        {
            return Err(Error::Forbidden);
        }

        event_repository::find(&mut conn, &input.event_id)
            .await?
            .ok_or(Error::NotFound("event"))?;

        let recipients: Vec<String> = match &input.utorid {
            Some(utorid) => {
                let guest = pointshub_ledger::repository::find(
                    &mut conn,
                    FindType::Utorid(utorid.to_owned()),
                )
                .await?
                .ok_or(Error::NotFound("user"))?;

                if !event_repository::is_guest(&mut conn, &input.event_id, &guest.id).await? {
                    return Err(Error::NotAGuest);
                }

                vec![guest.id]
            }
            None => {
                let guests = event_repository::guests(&mut conn, &input.event_id).await?;
                if guests.is_empty() {
                    return Err(Error::NoGuests);
                }

                guests.into_iter().map(|guest| guest.user_id).collect()
            }
        };
        drop(conn);

        let total = input.amount * recipients.len() as i64;
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let mut tx = self.write_db.begin().await?;

        pool::draw_down(&mut tx, &input.event_id, total).await?;

        let mut transactions = Vec::with_capacity(recipients.len());
        for user_id in &recipients {
            let id = Ulid::new().to_string();

            repository::insert(
                &mut tx,
                NewTransaction {
                    id: id.to_owned(),
                    user_id: user_id.to_owned(),
                    kind: TransactionKind::Event,
                    amount: input.amount,
                    spent: None,
                    redeemed: None,
                    related_id: Some(input.event_id.to_owned()),
                    suspicious: false,
                    remark: input.remark.to_owned(),
                    created_by: actor.user_id.to_owned(),
                    created_at: now,
                },
            )
            .await?;

            pointshub_ledger::adjust_balance(&mut tx, user_id, input.amount).await?;

            transactions.push(Transaction::Event {
                id,
                user_id: user_id.to_owned(),
                amount: input.amount,
                event_id: input.event_id.to_owned(),
                remark: input.remark.to_owned(),
                created_by: actor.user_id.to_owned(),
                created_at: now,
            });
        }

        match &input.utorid {
            Some(_) => pool::confirm_guest(&mut tx, &input.event_id, &recipients[0]).await?,
            None => pool::confirm_all_guests(&mut tx, &input.event_id).await?,
        }

        tx.commit().await?;

        tracing::info!(
            event_id = %input.event_id,
            guests = recipients.len(),
            total,
            "event points awarded"
        );

        Ok(transactions)
    }
}
