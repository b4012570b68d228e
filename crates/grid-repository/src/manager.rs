use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub use crate::config::RepositoryManagerConfig;
use crate::{
    error::RepositoryError,
    migrations::Migrator,
    repositories::{
        checkpoint_repository::CheckpointRepository, node_repository::NodeRepository,
        order_repository::OrderRepository, profit_repository::ProfitRepository,
        provider_repository::ProviderRepository,
    },
};

pub struct RepositoryManager {
    provider_repository: ProviderRepository,
    node_repository: NodeRepository,
    order_repository: OrderRepository,
    profit_repository: ProfitRepository,
    checkpoint_repository: CheckpointRepository,
}

impl RepositoryManager {
    /// Creates a new RepositoryManager instance
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if:
    /// - Database connection fails (e.g. database missing, bad credentials)
    /// - Migrations fail
    pub async fn connect(config: &RepositoryManagerConfig) -> Result<Self, RepositoryError> {
        let mut opt = ConnectOptions::new(config.connection_string());
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .sqlx_logging(true)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        let conn = Database::connect(opt).await?;
        Self::from_connection(conn).await
    }

    /// Applies pending migrations on `conn` and builds the repositories over it.
    pub async fn from_connection(conn: DatabaseConnection) -> Result<Self, RepositoryError> {
        Migrator::up(&conn, None).await?;
        let conn = Arc::new(conn);

        Ok(RepositoryManager {
            provider_repository: ProviderRepository::new(Arc::clone(&conn)),
            node_repository: NodeRepository::new(Arc::clone(&conn)),
            order_repository: OrderRepository::new(Arc::clone(&conn)),
            profit_repository: ProfitRepository::new(Arc::clone(&conn)),
            checkpoint_repository: CheckpointRepository::new(Arc::clone(&conn)),
        })
    }

    pub fn provider_repository(&self) -> ProviderRepository {
        self.provider_repository.clone()
    }

    pub fn node_repository(&self) -> NodeRepository {
        self.node_repository.clone()
    }

    pub fn order_repository(&self) -> OrderRepository {
        self.order_repository.clone()
    }

    pub fn profit_repository(&self) -> ProfitRepository {
        self.profit_repository.clone()
    }

    pub fn checkpoint_repository(&self) -> CheckpointRepository {
        self.checkpoint_repository.clone()
    }
}

#[cfg(test)]
pub(crate) async fn memory_manager() -> RepositoryManager {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1);
    let conn = Database::connect(opt).await.expect("in-memory sqlite");
    RepositoryManager::from_connection(conn)
        .await
        .expect("migrations apply")
}

#[cfg(test)]
mod tests {
    use alloy::primitives::Address;
    use grid_domain::{
        EventPosition, NodeIdentity, Order, ProfitLedgerRow, Provider, ProviderNode,
    };
    use num_bigint::BigInt;

    use super::*;

    fn node(address: Address, node_id: u64, cpu_price: u64) -> ProviderNode {
        ProviderNode {
            identity: NodeIdentity::new(address, node_id),
            cpu_price: BigInt::from(cpu_price),
            cpu_model: "epyc".to_string(),
            gpu_price: BigInt::from(0),
            gpu_model: String::new(),
            mem_price: BigInt::from(2),
            mem_capacity: 64,
            disk_price: BigInt::from(1),
            disk_capacity: 1024,
        }
    }

    #[tokio::test]
    async fn checkpoint_defaults_to_zero_and_overwrites() {
        let repo = memory_manager().await.checkpoint_repository();

        assert_eq!(repo.get().await.unwrap(), 0);
        repo.set(17).await.unwrap();
        repo.set(42).await.unwrap();
        assert_eq!(repo.get().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn provider_upsert_is_idempotent() {
        let repo = memory_manager().await.provider_repository();
        let provider = Provider {
            address: Address::repeat_byte(0xab),
            name: "alpha".to_string(),
            ip: "10.0.0.1".to_string(),
            domain: "alpha.example".to_string(),
            port: "8080".to_string(),
        };

        repo.upsert(&provider).await.unwrap();
        repo.upsert(&provider).await.unwrap();
    }

    #[tokio::test]
    async fn node_upsert_overwrites_and_round_trips_prices() {
        let repo = memory_manager().await.node_repository();
        let address = Address::repeat_byte(1);

        repo.upsert(&node(address, 3, 10)).await.unwrap();
        repo.upsert(&node(address, 3, 97)).await.unwrap();

        let stored = repo
            .find(NodeIdentity::new(address, 3))
            .await
            .unwrap()
            .expect("node stored");
        assert_eq!(stored, node(address, 3, 97));
        assert_eq!(stored.price_per_second(), BigInt::from(100));

        assert!(repo.find(NodeIdentity::new(address, 4)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn orders_insert_once_per_event_position() {
        let repo = memory_manager().await.order_repository();
        let position = EventPosition::new(9, 2);
        let order = Order::new(Address::repeat_byte(2), 1, 100, 20, 10, position).unwrap();

        assert!(repo.insert_if_absent(&order).await.unwrap());
        assert!(!repo.insert_if_absent(&order).await.unwrap());

        assert_eq!(repo.find_active(125).await.unwrap(), vec![order.clone()]);
        assert!(repo.find_active(120).await.unwrap().is_empty());
        assert!(repo.find_active(130).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn profit_rows_keep_big_amounts_and_cursor() {
        let repo = memory_manager().await.profit_repository();
        let address = Address::repeat_byte(3);
        let opened = ProfitLedgerRow::opened(address, 1_000);

        assert!(repo.create_if_absent(&opened).await.unwrap());
        assert!(!repo.create_if_absent(&opened).await.unwrap());

        let mut row = repo.find(&address).await.unwrap().expect("row created");
        assert_eq!(row, opened);

        row.profit = "340282366920938463463374607431768211456000".parse().unwrap();
        row.nonce = 5;
        row.applied_through = Some(EventPosition::new(12, 0));
        repo.update(&row).await.unwrap();

        assert_eq!(repo.find(&address).await.unwrap(), Some(row));
    }

    #[tokio::test]
    async fn updating_missing_profit_row_is_not_found() {
        let repo = memory_manager().await.profit_repository();
        let row = ProfitLedgerRow::opened(Address::repeat_byte(4), 0);

        assert!(matches!(
            repo.update(&row).await,
            Err(RepositoryError::NotFound(_))
        ));
    }
}
