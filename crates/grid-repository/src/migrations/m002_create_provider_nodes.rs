use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{DbErr, DeriveMigrationName, Iden, Index, MigrationTrait, SchemaManager, Table},
    schema::{big_integer, string},
    sea_query,
};

#[derive(Iden)]
enum ProviderNodes {
    Table,
    Address,
    NodeId,
    CpuPrice,
    CpuModel,
    GpuPrice,
    GpuModel,
    MemPrice,
    MemCapacity,
    DiskPrice,
    DiskCapacity,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProviderNodes::Table)
                    .if_not_exists()
                    .col(string(ProviderNodes::Address))
                    .col(big_integer(ProviderNodes::NodeId))
                    .col(string(ProviderNodes::CpuPrice))
                    .col(string(ProviderNodes::CpuModel))
                    .col(string(ProviderNodes::GpuPrice))
                    .col(string(ProviderNodes::GpuModel))
                    .col(string(ProviderNodes::MemPrice))
                    .col(big_integer(ProviderNodes::MemCapacity))
                    .col(string(ProviderNodes::DiskPrice))
                    .col(big_integer(ProviderNodes::DiskCapacity))
                    .primary_key(
                        Index::create()
                            .col(ProviderNodes::Address)
                            .col(ProviderNodes::NodeId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ProviderNodes::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
