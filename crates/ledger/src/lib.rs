use std::ops::Deref;

mod balance;
mod command;
pub mod repository;

pub use balance::adjust_balance;
pub use command::CreateUserInput;
pub use repository::{FindType, UserRow};

pub struct Command {
    state: pointshub_shared::State,
}

impl Deref for Command {
    type Target = pointshub_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: pointshub_shared::State) -> Self {
        Self { state }
    }

    pub async fn load(&self, id: impl Into<String>) -> pointshub_shared::Result<Option<UserRow>> {
        let mut conn = self.read_db.acquire().await?;

        repository::find(&mut conn, FindType::Id(id.into())).await
    }

    pub async fn load_by_utorid(
        &self,
        utorid: impl Into<String>,
    ) -> pointshub_shared::Result<Option<UserRow>> {
        let mut conn = self.read_db.acquire().await?;

        repository::find(&mut conn, FindType::Utorid(utorid.into())).await
    }
}
