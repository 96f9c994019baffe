use sea_query::{ColumnDef, Index, Table, TableCreateStatement, TableDropStatement};

use crate::table::EventOrganizer;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(EventOrganizer::Table)
        .col(
            ColumnDef::new(EventOrganizer::EventId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(EventOrganizer::UserId)
                .string()
                .not_null()
                .string_len(26),
        )
        .primary_key(
            Index::create()
                .col(EventOrganizer::EventId)
                .col(EventOrganizer::UserId),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(EventOrganizer::Table).to_owned()
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
