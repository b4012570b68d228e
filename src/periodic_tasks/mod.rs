mod deps;
mod runner;
pub(crate) mod tasks;

use std::sync::Arc;

pub(crate) use deps::{ChainEventsDeps, PeriodicTasksDeps};
use tasks::chain_events::ChainEventIngestorTask;
pub(crate) use tasks::chain_events::ChainEventsConfig;
use tokio_util::sync::CancellationToken;

/// Spawn all periodic tasks and wait for them to complete.
///
/// Uses `JoinSet` to log panics as they happen. Under normal operation tasks only
/// exit during shutdown.
pub(crate) async fn run(
    deps: Arc<PeriodicTasksDeps>,
    chain_events_config: ChainEventsConfig,
    shutdown: CancellationToken,
) {
    let mut set = tokio::task::JoinSet::new();

    let ingestor = ChainEventIngestorTask::new(deps.chain_events.clone(), &chain_events_config);
    set.spawn(ingestor.run(shutdown.clone()));

    while let Some(result) = set.join_next().await {
        if let Err(error) = result {
            tracing::error!(error = ?error, "Periodic task panicked");
        }
    }
}
