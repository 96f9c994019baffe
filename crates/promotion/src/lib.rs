use std::ops::Deref;

pub mod catalog;
mod command;
mod points;
pub mod repository;

pub use command::{CreatePromotionInput, UpdatePromotionInput};
pub use points::{POINTS_PER_DOLLAR, calculate_points};
pub use repository::PromotionRow;

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

    pub async fn load(
        &self,
        id: impl Into<String>,
    ) -> pointshub_shared::Result<Option<PromotionRow>> {
        let mut conn = self.read_db.acquire().await?;

        repository::find(&mut conn, &id.into()).await
    }
}
