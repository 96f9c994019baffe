use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::{Actor, Error, Result};

/// Capability level of a user. The ordering is total:
/// `Regular < Cashier < Manager < Superuser`.
#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    Regular,
    Cashier,
    Manager,
    Superuser,
}

/// Pure capability check: fails `Forbidden` when the actor sits below the bar.
///
/// Ownership rules (self-only redemption, self-as-sender transfer) and the
/// organizer-or-manager event rule live with the operations that need them.
pub fn require(actor: &Actor, min: Role) -> Result<()> {
    if actor.role < min {
        return Err(Error::Forbidden);
    }

    Ok(())
}
