use std::sync::LazyLock;

use regex::Regex;
use time::OffsetDateTime;
use ulid::Ulid;
use validator::Validate;

use pointshub_shared::{Error, Result, Role, role};

use crate::repository::{self, UpdateInput};

static UTORID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z0-9]{8}$").expect("utorid pattern"));

#[derive(Validate)]
pub struct CreateUserInput {
    #[validate(regex(path = *UTORID_RE))]
    pub utorid: String,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

impl super::Command {
    /// Registers a new account. Cashiers create accounts at the register;
    /// everyone starts regular, unverified, with zero points.
    pub async fn create(
        &self,
        actor: &pointshub_shared::Actor,
        input: CreateUserInput,
    ) -> Result<String> {
        role::require(actor, Role::Cashier)?;
        input.validate()?;

        let id = Ulid::new().to_string();
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let mut conn = self.write_db.acquire().await?;
        repository::create(&mut conn, id.to_owned(), input.utorid.to_owned(), input.name, now)
            .await
            .map_err(|err| match err {
                Error::Database(db) if pointshub_shared::is_unique_violation(&db) => {
                    Error::UtoridTaken
                }
                err => err,
            })?;

        tracing::info!(user_id = %id, utorid = %input.utorid, "user created");

        Ok(id)
    }

    /// Marks an account verified. Verification gates redemptions, transfers,
    /// promotion eligibility and role promotion; it is never unset.
    pub async fn verify(
        &self,
        actor: &pointshub_shared::Actor,
        utorid: impl Into<String>,
    ) -> Result<()> {
        role::require(actor, Role::Manager)?;

        let user = self
            .load_by_utorid(utorid)
            .await?
            .ok_or(Error::NotFound("user"))?;

        let mut conn = self.write_db.acquire().await?;
        repository::update(
            &mut conn,
            UpdateInput {
                id: user.id.to_owned(),
                role: None,
                verified: Some(true),
                suspicious: None,
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, "user verified");

        Ok(())
    }

    /// Flips the user-level suspicious flag. Only future purchases created by
    /// this user as cashier are held; historical transactions are untouched
    /// (those go through the per-transaction toggle).
    pub async fn set_suspicious(
        &self,
        actor: &pointshub_shared::Actor,
        utorid: impl Into<String>,
        suspicious: bool,
    ) -> Result<()> {
        role::require(actor, Role::Manager)?;

        let user = self
            .load_by_utorid(utorid)
            .await?
            .ok_or(Error::NotFound("user"))?;

        let mut conn = self.write_db.acquire().await?;
        repository::update(
            &mut conn,
            UpdateInput {
                id: user.id.to_owned(),
                role: None,
                verified: None,
                suspicious: Some(suspicious),
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, suspicious, "user suspicious flag set");

        Ok(())
    }

    /// Changes an account's role. Managers may grant regular/cashier; the
    /// manager and superuser tiers require a superuser. Promotion above
    /// regular requires a verified target, and a fresh cashier always starts
    /// with a clean suspicious flag.
    pub async fn set_role(
        &self,
        actor: &pointshub_shared::Actor,
        utorid: impl Into<String>,
        new_role: Role,
    ) -> Result<()> {
        let min = if new_role >= Role::Manager {
            Role::Superuser
        } else {
            Role::Manager
        };
        role::require(actor, min)?;

        let user = self
            .load_by_utorid(utorid)
            .await?
            .ok_or(Error::NotFound("user"))?;

        if new_role > Role::Regular && !user.verified {
            return Err(Error::NotVerified);
        }

        let suspicious = (new_role == Role::Cashier).then_some(false);

        let mut conn = self.write_db.acquire().await?;
        repository::update(
            &mut conn,
            UpdateInput {
                id: user.id.to_owned(),
                role: Some(new_role),
                verified: None,
                suspicious,
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, role = %new_role, "user role changed");

        Ok(())
    }
}
