use std::sync::Arc;

use crate::{
    bootstrap::CoreBootstrap,
    periodic_tasks::{ChainEventsDeps, PeriodicTasksDeps},
};

pub(crate) fn build_periodic_tasks_deps(core: &CoreBootstrap) -> Arc<PeriodicTasksDeps> {
    Arc::new(PeriodicTasksDeps {
        chain_events: ChainEventsDeps {
            source: core.chain.clone(),
            ledger: core.ledger.clone(),
            clock: Arc::clone(&core.clock),
            confirmations: core.config.blockchain.confirmations,
        },
    })
}
