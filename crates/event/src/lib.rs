use std::ops::Deref;

mod command;
pub mod pool;
pub mod repository;

pub use command::CreateEventInput;
pub use repository::{EventRow, GuestRow};

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

    pub async fn load(&self, id: impl Into<String>) -> pointshub_shared::Result<Option<EventRow>> {
        let mut conn = self.read_db.acquire().await?;

        repository::find(&mut conn, &id.into()).await
    }

    pub async fn guests(&self, id: impl Into<String>) -> pointshub_shared::Result<Vec<GuestRow>> {
        let mut conn = self.read_db.acquire().await?;

        repository::guests(&mut conn, &id.into()).await
    }
}
