use time::OffsetDateTime;
use ulid::Ulid;
use validator::Validate;

use pointshub_ledger::FindType;
use pointshub_shared::{Actor, Error, Result, Role, role};

use crate::repository;

#[derive(Validate)]
pub struct CreateEventInput {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(range(min = 1))]
    pub points_total: i64,
    #[validate(range(min = 1))]
    pub capacity: Option<i64>,
}

impl super::Command {
    /// An organizer or a manager may manage an event's guest list; awarding
    /// points in the engine uses the same rule.
    pub async fn can_manage(&self, actor: &Actor, event_id: &str) -> Result<bool> {
        if actor.role >= Role::Manager {
            return Ok(true);
        }

        let mut conn = self.read_db.acquire().await?;
        repository::is_organizer(&mut conn, event_id, &actor.user_id).await
    }

    pub async fn create(&self, actor: &Actor, input: CreateEventInput) -> Result<String> {
        role::require(actor, Role::Manager)?;
        input.validate()?;

        let id = Ulid::new().to_string();
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let mut conn = self.write_db.acquire().await?;
        repository::create(
            &mut conn,
            id.to_owned(),
            input.name,
            input.points_total,
            input.capacity,
            now,
        )
        .await?;

        tracing::info!(event_id = %id, points_total = input.points_total, "event created");

        Ok(id)
    }

    pub async fn add_organizer(
        &self,
        actor: &Actor,
        event_id: impl Into<String>,
        utorid: impl Into<String>,
    ) -> Result<()> {
        role::require(actor, Role::Manager)?;

        let event_id = event_id.into();
        self.load(&event_id)
            .await?
            .ok_or(Error::NotFound("event"))?;

        let mut conn = self.read_db.acquire().await?;
        let user = pointshub_ledger::repository::find(&mut conn, FindType::Utorid(utorid.into()))
            .await?
            .ok_or(Error::NotFound("user"))?;
        drop(conn);

        let mut conn = self.write_db.acquire().await?;
        ok_if_duplicate(repository::add_organizer(&mut conn, &event_id, &user.id).await)?;

        Ok(())
    }

    /// Registers a guest. Capacity, when set, is a hard upper bound on the
    /// guest count; re-adding an existing guest is a no-op.
    pub async fn add_guest(
        &self,
        actor: &Actor,
        event_id: impl Into<String>,
        utorid: impl Into<String>,
    ) -> Result<()> {
        let event_id = event_id.into();
        if !self.can_manage(actor, &event_id).await? {
            return Err(Error::Forbidden);
        }

        let event = self
            .load(&event_id)
            .await?
            .ok_or(Error::NotFound("event"))?;

        let mut conn = self.read_db.acquire().await?;
        let user = pointshub_ledger::repository::find(&mut conn, FindType::Utorid(utorid.into()))
            .await?
            .ok_or(Error::NotFound("user"))?;
        drop(conn);

        let mut conn = self.write_db.acquire().await?;

        if repository::is_guest(&mut conn, &event_id, &user.id).await? {
            return Ok(());
        }

        if let Some(capacity) = event.capacity {
            let count = repository::guest_count(&mut conn, &event_id).await?;
            if count >= capacity {
                return Err(Error::EventFull);
            }
        }

        ok_if_duplicate(repository::add_guest(&mut conn, &event_id, &user.id).await)?;

        tracing::info!(event_id = %event_id, user_id = %user.id, "guest added");

        Ok(())
    }

    /// Drops a guest from the list. An already-confirmed guest keeps the
    /// points previously awarded; reversal is an adjustment's job.
    pub async fn remove_guest(
        &self,
        actor: &Actor,
        event_id: impl Into<String>,
        utorid: impl Into<String>,
    ) -> Result<()> {
        let event_id = event_id.into();
        if !self.can_manage(actor, &event_id).await? {
            return Err(Error::Forbidden);
        }

        let mut conn = self.read_db.acquire().await?;
        let user = pointshub_ledger::repository::find(&mut conn, FindType::Utorid(utorid.into()))
            .await?
            .ok_or(Error::NotFound("user"))?;
        drop(conn);

        let mut conn = self.write_db.acquire().await?;
        repository::remove_guest(&mut conn, &event_id, &user.id).await?;

        Ok(())
    }
}

/// Guest/organizer membership inserts are idempotent: the composite primary
/// key rejects the duplicate and we treat that as success.
fn ok_if_duplicate(result: Result<()>) -> Result<()> {
    match result {
        Err(Error::Database(err)) if pointshub_shared::is_unique_violation(&err) => Ok(()),
        other => other,
    }
}
