use std::sync::Arc;

use super::tasks::chain_events::ContractLogSource;
use crate::{ledger::ProfitLedger, validator::Clock};

#[derive(Clone)]
pub(crate) struct ChainEventsDeps {
    pub(crate) source: Arc<dyn ContractLogSource>,
    pub(crate) ledger: ProfitLedger,
    pub(crate) clock: Arc<dyn Clock>,
    /// Blocks the ingestor stays behind the chain tip.
    pub(crate) confirmations: u64,
}

/// Everything the periodic tasks need, built once at startup.
#[derive(Clone)]
pub(crate) struct PeriodicTasksDeps {
    pub(crate) chain_events: ChainEventsDeps,
}
