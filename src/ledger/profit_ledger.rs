use std::sync::Arc;

use dashmap::DashMap;
use grid_domain::{Address, ProfitLedgerRow};
use grid_repository::RepositoryError;
use tokio::sync::Mutex;

use super::LedgerStore;

/// Serializes read-modify-write cycles on profit rows per provider address.
///
/// Rows are read fresh from the store on every update and never cached.
#[derive(Clone)]
pub(crate) struct ProfitLedger {
    store: Arc<dyn LedgerStore>,
    locks: Arc<DashMap<Address, Arc<Mutex<()>>>>,
}

impl ProfitLedger {
    pub(crate) fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            locks: Arc::new(DashMap::new()),
        }
    }

    pub(crate) fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    pub(crate) async fn profit(
        &self,
        address: &Address,
    ) -> Result<Option<ProfitLedgerRow>, RepositoryError> {
        self.store.profit(address).await
    }

    /// Applies `apply` to the current row of `address` under its lock and persists
    /// the row if it changed.
    ///
    /// Fails with `NotFound` when the address has no row.
    pub(crate) async fn update_profit<T>(
        &self,
        address: Address,
        apply: impl FnOnce(&mut ProfitLedgerRow) -> T,
    ) -> Result<T, RepositoryError> {
        let lock = Arc::clone(self.locks.entry(address).or_default().value());
        let _guard = lock.lock().await;

        let mut row = self
            .store
            .profit(&address)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("profit row for {address}")))?;
        let before = row.clone();

        let outcome = apply(&mut row);
        if row != before {
            self.store.update_profit(&row).await?;
        }
        Ok(outcome)
    }
}
