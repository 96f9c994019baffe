use sea_query::{ColumnDef, Index, Table, TableCreateStatement, TableDropStatement};

use crate::table::EventGuest;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(EventGuest::Table)
        .col(
            ColumnDef::new(EventGuest::EventId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(EventGuest::UserId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(EventGuest::Confirmed)
                .boolean()
                .not_null()
                .default(false),
        )
        .primary_key(
            Index::create()
                .col(EventGuest::EventId)
                .col(EventGuest::UserId),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(EventGuest::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
