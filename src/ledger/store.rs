use async_trait::async_trait;
use grid_domain::{Address, NodeIdentity, Order, ProfitLedgerRow, Provider, ProviderNode};
use grid_repository::{RepositoryError, RepositoryManager};

/// CRUD contract over persisted ledger state.
#[async_trait]
pub(crate) trait LedgerStore: Send + Sync {
    async fn checkpoint(&self) -> Result<u64, RepositoryError>;

    async fn set_checkpoint(&self, next_block: u64) -> Result<(), RepositoryError>;

    async fn upsert_provider(&self, provider: &Provider) -> Result<(), RepositoryError>;

    async fn upsert_node(&self, node: &ProviderNode) -> Result<(), RepositoryError>;

    async fn node(&self, identity: NodeIdentity) -> Result<Option<ProviderNode>, RepositoryError>;

    /// Returns false when an order for the same event position already exists.
    async fn insert_order_if_absent(&self, order: &Order) -> Result<bool, RepositoryError>;

    async fn active_orders(&self, now: i64) -> Result<Vec<Order>, RepositoryError>;

    /// Returns false when the address already has a row; the existing row is kept.
    async fn create_profit_if_absent(&self, row: &ProfitLedgerRow) -> Result<bool, RepositoryError>;

    async fn profit(&self, address: &Address) -> Result<Option<ProfitLedgerRow>, RepositoryError>;

    async fn update_profit(&self, row: &ProfitLedgerRow) -> Result<(), RepositoryError>;
}

#[async_trait]
impl LedgerStore for RepositoryManager {
    async fn checkpoint(&self) -> Result<u64, RepositoryError> {
        self.checkpoint_repository().get().await
    }

    async fn set_checkpoint(&self, next_block: u64) -> Result<(), RepositoryError> {
        self.checkpoint_repository().set(next_block).await
    }

    async fn upsert_provider(&self, provider: &Provider) -> Result<(), RepositoryError> {
        self.provider_repository().upsert(provider).await
    }

    async fn upsert_node(&self, node: &ProviderNode) -> Result<(), RepositoryError> {
        self.node_repository().upsert(node).await
    }

    async fn node(&self, identity: NodeIdentity) -> Result<Option<ProviderNode>, RepositoryError> {
        self.node_repository().find(identity).await
    }

    async fn insert_order_if_absent(&self, order: &Order) -> Result<bool, RepositoryError> {
        self.order_repository().insert_if_absent(order).await
    }

    async fn active_orders(&self, now: i64) -> Result<Vec<Order>, RepositoryError> {
        self.order_repository().find_active(now).await
    }

    async fn create_profit_if_absent(&self, row: &ProfitLedgerRow) -> Result<bool, RepositoryError> {
        self.profit_repository().create_if_absent(row).await
    }

    async fn profit(&self, address: &Address) -> Result<Option<ProfitLedgerRow>, RepositoryError> {
        self.profit_repository().find(address).await
    }

    async fn update_profit(&self, row: &ProfitLedgerRow) -> Result<(), RepositoryError> {
        self.profit_repository().update(row).await
    }
}
