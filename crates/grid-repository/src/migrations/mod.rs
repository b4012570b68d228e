use sea_orm_migration::{MigrationTrait, MigratorTrait, async_trait::async_trait};

mod m001_create_providers;
mod m002_create_provider_nodes;
mod m003_create_orders;
mod m004_create_profits;
mod m005_create_ingestion_checkpoint;

pub(crate) struct Migrator;

#[async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m001_create_providers::Migration),
            Box::new(m002_create_provider_nodes::Migration),
            Box::new(m003_create_orders::Migration),
            Box::new(m004_create_profits::Migration),
            Box::new(m005_create_ingestion_checkpoint::Migration),
        ]
    }
}
