use thiserror::Error;

/// Domain-specific errors for ledger operations
///
/// These are the outcomes the HTTP layer maps to status codes. Every variant
/// is a per-request failure; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid promotion: {0}")]
    InvalidPromotion(String),

    #[error("promotion already used")]
    PromotionAlreadyUsed,

    #[error("insufficient points")]
    InsufficientPoints,

    #[error("insufficient event points")]
    InsufficientEventPoints,

    #[error("account not verified")]
    NotVerified,

    #[error("recipient not verified")]
    RecipientNotVerified,

    #[error("user is not a guest of this event")]
    NotAGuest,

    #[error("event has no guests")]
    NoGuests,

    #[error("transaction already processed")]
    AlreadyProcessed,

    #[error("forbidden")]
    Forbidden,

    #[error("transaction kind mismatch")]
    InvalidTransactionKind,

    #[error("event is at capacity")]
    EventFull,

    #[error("utorid already taken")]
    UtoridTaken,

    #[error("promotion window already started")]
    PromotionStarted,

    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// True when the underlying storage error is a unique-constraint hit.
///
/// Constraint violations inside an atomic unit are race losses, and every
/// caller translates them to the matching domain error instead of leaking the
/// storage error.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
