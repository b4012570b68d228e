use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{DbErr, DeriveMigrationName, Iden, MigrationTrait, SchemaManager, Table},
    schema::{big_integer, integer},
    sea_query,
};

#[derive(Iden)]
enum IngestionCheckpoint {
    Table,
    Id,
    NextBlock,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IngestionCheckpoint::Table)
                    .if_not_exists()
                    .col(integer(IngestionCheckpoint::Id).primary_key())
                    .col(big_integer(IngestionCheckpoint::NextBlock))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(IngestionCheckpoint::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
