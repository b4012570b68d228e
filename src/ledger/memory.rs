use std::{
    sync::atomic::{AtomicU64, AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use dashmap::DashMap;
use grid_domain::{
    Address, EventPosition, NodeIdentity, Order, ProfitLedgerRow, Provider, ProviderNode,
};
use grid_repository::RepositoryError;
use sea_orm::DbErr;

use super::LedgerStore;

/// In-memory store for tests, with injectable checkpoint write failures and
/// order query latency.
#[derive(Default)]
pub(crate) struct MemoryLedgerStore {
    checkpoint: AtomicU64,
    providers: DashMap<Address, Provider>,
    nodes: DashMap<NodeIdentity, ProviderNode>,
    orders: DashMap<EventPosition, Order>,
    profits: DashMap<Address, ProfitLedgerRow>,
    failing_checkpoint_writes: AtomicUsize,
    profit_writes: AtomicUsize,
    active_orders_delay_ms: AtomicU64,
}

impl MemoryLedgerStore {
    /// Makes the next `count` checkpoint writes fail.
    pub(crate) fn fail_checkpoint_writes(&self, count: usize) {
        self.failing_checkpoint_writes.store(count, Ordering::SeqCst);
    }

    /// Makes every active order query take `delay` of tokio time.
    pub(crate) fn delay_active_orders(&self, delay: Duration) {
        self.active_orders_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub(crate) fn provider(&self, address: &Address) -> Option<Provider> {
        self.providers.get(address).map(|entry| entry.clone())
    }

    pub(crate) fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub(crate) fn profit_writes(&self) -> usize {
        self.profit_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn checkpoint(&self) -> Result<u64, RepositoryError> {
        Ok(self.checkpoint.load(Ordering::SeqCst))
    }

    async fn set_checkpoint(&self, next_block: u64) -> Result<(), RepositoryError> {
        let failing = self
            .failing_checkpoint_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
        if failing.is_ok() {
            return Err(RepositoryError::Database(DbErr::Custom(
                "injected checkpoint failure".to_string(),
            )));
        }
        self.checkpoint.store(next_block, Ordering::SeqCst);
        Ok(())
    }

    async fn upsert_provider(&self, provider: &Provider) -> Result<(), RepositoryError> {
        self.providers.insert(provider.address, provider.clone());
        Ok(())
    }

    async fn upsert_node(&self, node: &ProviderNode) -> Result<(), RepositoryError> {
        self.nodes.insert(node.identity, node.clone());
        Ok(())
    }

    async fn node(&self, identity: NodeIdentity) -> Result<Option<ProviderNode>, RepositoryError> {
        Ok(self.nodes.get(&identity).map(|entry| entry.clone()))
    }

    async fn insert_order_if_absent(&self, order: &Order) -> Result<bool, RepositoryError> {
        let mut inserted = false;
        self.orders.entry(order.position).or_insert_with(|| {
            inserted = true;
            order.clone()
        });
        Ok(inserted)
    }

    async fn active_orders(&self, now: i64) -> Result<Vec<Order>, RepositoryError> {
        let delay_ms = self.active_orders_delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| entry.is_active(now))
            .map(|entry| entry.clone())
            .collect();
        orders.sort_by_key(|order| order.position);
        Ok(orders)
    }

    async fn create_profit_if_absent(&self, row: &ProfitLedgerRow) -> Result<bool, RepositoryError> {
        let mut inserted = false;
        self.profits.entry(row.provider_address).or_insert_with(|| {
            inserted = true;
            row.clone()
        });
        Ok(inserted)
    }

    async fn profit(&self, address: &Address) -> Result<Option<ProfitLedgerRow>, RepositoryError> {
        Ok(self.profits.get(address).map(|entry| entry.clone()))
    }

    async fn update_profit(&self, row: &ProfitLedgerRow) -> Result<(), RepositoryError> {
        let mut entry = self
            .profits
            .get_mut(&row.provider_address)
            .ok_or_else(|| RepositoryError::NotFound(row.provider_address.to_string()))?;
        *entry = row.clone();
        self.profit_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
