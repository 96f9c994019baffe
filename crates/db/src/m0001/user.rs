use sea_query::{
    ColumnDef, Expr, ExprTrait, Index, IndexCreateStatement, IndexDropStatement, Table,
    TableCreateStatement, TableDropStatement,
};

use crate::table::User;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(User::Table)
        .col(
            ColumnDef::new(User::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(User::Utorid)
                .string()
                .not_null()
                .string_len(8),
        )
        .col(
            ColumnDef::new(User::Name)
                .string()
                .not_null()
                .string_len(50),
        )
        .col(
            ColumnDef::new(User::Role)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(
            ColumnDef::new(User::Points)
                .big_integer()
                .not_null()
                .default(0)
                .check(Expr::col(User::Points).gte(0)),
        )
        .col(
            ColumnDef::new(User::Verified)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(User::Suspicious)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(User::CreatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(User::Table).to_owned()
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

pub struct CreateUk1;

fn create_uk_1() -> IndexCreateStatement {
    Index::create()
        .name("uk_user_utorid")
        .table(User::Table)
        .unique()
        .col(User::Utorid)
        .to_owned()
}

fn drop_uk_1() -> IndexDropStatement {
    Index::drop()
        .name("uk_user_utorid")
        .table(User::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateUk1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_uk_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_uk_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
