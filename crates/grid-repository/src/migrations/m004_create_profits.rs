use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{DbErr, DeriveMigrationName, Iden, MigrationTrait, SchemaManager, Table},
    schema::{big_integer, big_integer_null, string},
    sea_query,
};

#[derive(Iden)]
enum Profits {
    Table,
    Address,
    Balance,
    Profit,
    Penalty,
    LastTime,
    EndTime,
    Nonce,
    CursorBlock,
    CursorLogIndex,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profits::Table)
                    .if_not_exists()
                    .col(string(Profits::Address).primary_key())
                    .col(string(Profits::Balance))
                    .col(string(Profits::Profit))
                    .col(string(Profits::Penalty))
                    .col(big_integer(Profits::LastTime))
                    .col(big_integer(Profits::EndTime))
                    .col(big_integer(Profits::Nonce).default(0))
                    .col(big_integer_null(Profits::CursorBlock))
                    .col(big_integer_null(Profits::CursorLogIndex))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profits::Table).if_exists().to_owned())
            .await
    }
}
