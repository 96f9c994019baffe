use clap::ValueEnum;

use pointshub_ledger::CreateUserInput;
use pointshub_shared::Actor;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Role {
    Regular,
    Cashier,
    Manager,
    Superuser,
}

impl From<Role> for pointshub_shared::Role {
    fn from(role: Role) -> Self {
        match role {
            Role::Regular => pointshub_shared::Role::Regular,
            Role::Cashier => pointshub_shared::Role::Cashier,
            Role::Manager => pointshub_shared::Role::Manager,
            Role::Superuser => pointshub_shared::Role::Superuser,
        }
    }
}

/// Operator commands run with superuser capability; the engine still logs
/// them under the "cli" identity.
fn operator() -> Actor {
    Actor::new("cli", pointshub_shared::Role::Superuser)
}

pub async fn create(
    config: crate::config::Config,
    utorid: String,
    name: String,
) -> anyhow::Result<()> {
    let state = crate::create_state(&config).await?;
    let command = pointshub_ledger::Command::new(state);

    let id = command.create(&operator(), CreateUserInput { utorid, name }).await?;

    tracing::info!(user_id = %id, "user created");

    Ok(())
}

pub async fn set_role(
    config: crate::config::Config,
    utorid: String,
    role: Role,
) -> anyhow::Result<()> {
    let state = crate::create_state(&config).await?;
    let command = pointshub_ledger::Command::new(state);

    let Some(user) = command.load_by_utorid(&utorid).await? else {
        tracing::error!("user {utorid} not found");
        return Ok(());
    };

    command.set_role(&operator(), &utorid, role.into()).await?;

    tracing::info!(user_id = %user.id, "{utorid} role updated");

    Ok(())
}

pub async fn verify(config: crate::config::Config, utorid: String) -> anyhow::Result<()> {
    let state = crate::create_state(&config).await?;
    let command = pointshub_ledger::Command::new(state);

    command.verify(&operator(), &utorid).await?;

    tracing::info!("{utorid} verified");

    Ok(())
}

pub async fn set_suspicious(
    config: crate::config::Config,
    utorid: String,
    suspicious: bool,
) -> anyhow::Result<()> {
    let state = crate::create_state(&config).await?;
    let command = pointshub_ledger::Command::new(state);

    command
        .set_suspicious(&operator(), &utorid, suspicious)
        .await?;

    tracing::info!(suspicious, "{utorid} suspicious flag updated");

    Ok(())
}
