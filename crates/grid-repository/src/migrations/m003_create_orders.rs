use sea_orm_migration::{
    async_trait::async_trait,
    prelude::{DbErr, DeriveMigrationName, Iden, Index, MigrationTrait, SchemaManager, Table},
    schema::{big_integer, string},
    sea_query,
};

#[derive(Iden)]
enum Orders {
    Table,
    BlockNumber,
    LogIndex,
    ProviderAddress,
    OrderId,
    ActivateTime,
    StartTime,
    EndTime,
    ProbationSeconds,
    DurationSeconds,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(big_integer(Orders::BlockNumber))
                    .col(big_integer(Orders::LogIndex))
                    .col(string(Orders::ProviderAddress))
                    .col(big_integer(Orders::OrderId))
                    .col(big_integer(Orders::ActivateTime))
                    .col(big_integer(Orders::StartTime))
                    .col(big_integer(Orders::EndTime))
                    .col(big_integer(Orders::ProbationSeconds))
                    .col(big_integer(Orders::DurationSeconds))
                    .primary_key(
                        Index::create()
                            .col(Orders::BlockNumber)
                            .col(Orders::LogIndex),
                    )
                    .to_owned(),
            )
            .await?;

        // Active-order scans filter on the order window
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_window")
                    .table(Orders::Table)
                    .col(Orders::StartTime)
                    .col(Orders::EndTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).if_exists().to_owned())
            .await
    }
}
