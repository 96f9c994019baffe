use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// The five transaction kinds. Stored as TEXT; in-process logic works on the
/// `Transaction` tagged union, not on this discriminant alone.
#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum TransactionKind {
    Purchase,
    Adjustment,
    Redemption,
    Transfer,
    Event,
}

/// Automatic promotions apply to any qualifying purchase; one-time promotions
/// must be supplied explicitly and are consumable once per user.
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
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum PromotionKind {
    #[default]
    Automatic,
    OneTime,
}
