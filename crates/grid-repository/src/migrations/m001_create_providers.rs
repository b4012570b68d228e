use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{DbErr, DeriveMigrationName, Iden, MigrationTrait, SchemaManager, Table},
    schema::string,
    sea_query,
};

#[derive(Iden)]
enum Providers {
    Table,
    Address,
    Name,
    Ip,
    Domain,
    Port,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Providers::Table)
                    .if_not_exists()
                    .col(string(Providers::Address).primary_key())
                    .col(string(Providers::Name))
                    .col(string(Providers::Ip))
                    .col(string(Providers::Domain))
                    .col(string(Providers::Port))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Providers::Table).if_exists().to_owned())
            .await
    }
}
