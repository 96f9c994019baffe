use time::OffsetDateTime;
use ulid::Ulid;
use validator::{Validate, ValidationError};

use pointshub_shared::{Error, PromotionKind, Result, Role, role};

use crate::repository::{self, NewPromotion, UpdateInput};

#[derive(Validate)]
#[validate(schema(function = validate_window))]
pub struct CreatePromotionInput {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    pub kind: PromotionKind,
    pub start_time: i64,
    pub end_time: i64,
    #[validate(range(exclusive_min = 0.0))]
    pub min_spending: Option<f64>,
    #[validate(range(exclusive_min = 0.0))]
    pub rate: Option<f64>,
    #[validate(range(exclusive_min = 0.0))]
    pub points: Option<f64>,
}

fn validate_window(input: &CreatePromotionInput) -> std::result::Result<(), ValidationError> {
    if input.start_time >= input.end_time {
        return Err(ValidationError::new("window"));
    }

    Ok(())
}

#[derive(Default, Validate)]
pub struct UpdatePromotionInput {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    #[validate(range(exclusive_min = 0.0))]
    pub min_spending: Option<Option<f64>>,
    #[validate(range(exclusive_min = 0.0))]
    pub rate: Option<Option<f64>>,
    #[validate(range(exclusive_min = 0.0))]
    pub points: Option<Option<f64>>,
}

impl super::Command {
    /// Defines a promotion. The definition freezes once `start_time` passes;
    /// only creation may place it anywhere on the clock.
    pub async fn create(
        &self,
        actor: &pointshub_shared::Actor,
        input: CreatePromotionInput,
    ) -> Result<String> {
        role::require(actor, Role::Manager)?;
        input.validate()?;

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let id = Ulid::new().to_string();

        let mut conn = self.write_db.acquire().await?;
        repository::create(
            &mut conn,
            NewPromotion {
                id: id.to_owned(),
                name: input.name,
                kind: input.kind,
                start_time: input.start_time,
                end_time: input.end_time,
                min_spending: input.min_spending,
                rate: input.rate,
                points: input.points,
                created_at: now,
            },
        )
        .await?;

        tracing::info!(promotion_id = %id, kind = %input.kind, "promotion created");

        Ok(id)
    }

    /// Edits a promotion that has not started yet. Past `start_time` the
    /// definition is frozen and every edit fails `PromotionStarted`.
    pub async fn update(
        &self,
        actor: &pointshub_shared::Actor,
        id: impl Into<String>,
        input: UpdatePromotionInput,
    ) -> Result<()> {
        role::require(actor, Role::Manager)?;
        input.validate()?;

        let id = id.into();
        let promotion = self.load(&id).await?.ok_or(Error::NotFound("promotion"))?;

        let now = OffsetDateTime::now_utc().unix_timestamp();
        if promotion.start_time <= now {
            return Err(Error::PromotionStarted);
        }

        let start_time = input.start_time.unwrap_or(promotion.start_time);
        let end_time = input.end_time.unwrap_or(promotion.end_time);
        if start_time >= end_time || start_time < now {
            let mut errors = validator::ValidationErrors::new();
            errors.add("start_time", ValidationError::new("window"));
            return Err(errors.into());
        }

        let mut conn = self.write_db.acquire().await?;
        repository::update(
            &mut conn,
            UpdateInput {
                id: id.to_owned(),
                name: input.name,
                start_time: input.start_time,
                end_time: input.end_time,
                min_spending: input.min_spending,
                rate: input.rate,
                points: input.points,
            },
        )
        .await?;

        tracing::info!(promotion_id = %id, "promotion updated");

        Ok(())
    }

    /// Removes a promotion that has not started yet.
    pub async fn delete(
        &self,
        actor: &pointshub_shared::Actor,
        id: impl Into<String>,
    ) -> Result<()> {
        role::require(actor, Role::Manager)?;

        let id = id.into();
        let promotion = self.load(&id).await?.ok_or(Error::NotFound("promotion"))?;

        let now = OffsetDateTime::now_utc().unix_timestamp();
        if promotion.start_time <= now {
            return Err(Error::PromotionStarted);
        }

        let mut conn = self.write_db.acquire().await?;
        repository::delete(&mut conn, &id).await?;

        tracing::info!(promotion_id = %id, "promotion deleted");

        Ok(())
    }
}
