mod error;
mod kind;
pub mod role;

pub use error::*;
pub use kind::*;
pub use role::Role;

/// Database handles shared by every command type.
///
/// Reads go through `read_db` (many connections); every mutation goes through
/// `write_db`, which is capped at a single connection so SQLite writes
/// serialize without SQLITE_BUSY churn.
#[derive(Clone)]
pub struct State {
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}

/// The authenticated caller, as supplied by the (out of scope) HTTP layer.
#[derive(Clone, Debug)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}
