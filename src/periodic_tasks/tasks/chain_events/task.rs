//! Chain event ingestor periodic task implementation.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use grid_blockchain::{ContractEvent, EventSignatureTable};
use grid_domain::EventPosition;
use grid_observability as observability;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{
    ContractLogSource,
    handlers::{self, HandlerOutcome},
};
use crate::{
    error::NodeError, ledger::ProfitLedger, periodic_tasks::ChainEventsDeps,
    periodic_tasks::runner::run_with_shutdown, validator::Clock,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ChainEventsConfig {
    /// Delay between two polls of the chain.
    pub poll_interval_secs: u64,

    /// First block to read when no checkpoint has been stored yet.
    #[serde(default)]
    pub start_block: u64,
}

pub(crate) struct ChainEventIngestorTask {
    source: Arc<dyn ContractLogSource>,
    ledger: ProfitLedger,
    clock: Arc<dyn Clock>,
    signatures: EventSignatureTable,
    confirmations: u64,
    start_block: u64,
    poll_interval: Duration,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct IngestStats {
    fetched_events: usize,
    processed_events: usize,
    skipped_events: usize,
}

impl ChainEventIngestorTask {
    pub(crate) fn new(deps: ChainEventsDeps, config: &ChainEventsConfig) -> Self {
        Self {
            source: deps.source,
            ledger: deps.ledger,
            clock: deps.clock,
            signatures: EventSignatureTable::new(),
            confirmations: deps.confirmations,
            start_block: config.start_block,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
        }
    }

    pub(crate) async fn run(self, shutdown: CancellationToken) {
        run_with_shutdown("chain_events", shutdown, || self.execute()).await;
    }

    #[tracing::instrument(
        name = "periodic_tasks.chain_events",
        skip(self),
        fields(poll_interval_ms = tracing::field::Empty)
    )]
    async fn execute(&self) -> Duration {
        let started = Instant::now();
        tracing::Span::current().record(
            "poll_interval_ms",
            tracing::field::display(self.poll_interval.as_millis()),
        );

        match self.ingest().await {
            Ok(stats) => observability::record_chain_event_ingestor_cycle(
                "ok",
                started.elapsed(),
                stats.fetched_events,
                stats.processed_events,
                stats.skipped_events,
            ),
            Err(error) => {
                observability::record_chain_event_ingestor_cycle(
                    "error",
                    started.elapsed(),
                    0,
                    0,
                    0,
                );
                tracing::error!(error = %error, "Error fetching/processing chain events");
            }
        }

        self.poll_interval
    }

    /// Applies every event between the checkpoint and the confirmed tip, then
    /// moves the checkpoint past it.
    ///
    /// Any failure leaves the checkpoint where it was, so the range is read again
    /// on the next poll.
    async fn ingest(&self) -> Result<IngestStats, NodeError> {
        let mut stats = IngestStats::default();
        let store = self.ledger.store();

        let checkpoint = store.checkpoint().await?;
        let from_block = checkpoint.max(self.start_block);
        let tip = self.source.block_number().await?;
        let Some(safe_tip) = tip.checked_sub(self.confirmations) else {
            return Ok(stats);
        };
        if from_block > safe_tip {
            return Ok(stats);
        }

        let mut logs = self.source.contract_logs(from_block, safe_tip).await?;
        logs.sort_by_key(|log| (log.block_number(), log.log_index()));
        stats.fetched_events = logs.len();
        if !logs.is_empty() {
            tracing::debug!(
                from_block,
                to_block = safe_tip,
                event_count = logs.len(),
                "Fetched chain events"
            );
        }

        let mut last_processed_block = None;
        for log in &logs {
            let (Some(block_number), Some(log_index)) = (log.block_number(), log.log_index())
            else {
                return Err(NodeError::Other(format!(
                    "{} log without block number or log index",
                    log.contract_name().as_str()
                )));
            };
            let position = EventPosition::new(block_number, log_index);

            let Some(event) = self.signatures.decode(log)? else {
                tracing::trace!(position = %position, "Skipping unknown event");
                stats.skipped_events += 1;
                last_processed_block = Some(block_number);
                continue;
            };

            let kind = event.kind();
            let outcome = self.handle(event, position).await?;
            observability::record_chain_event_applied(kind.name(), outcome.label());
            match outcome {
                HandlerOutcome::Applied => stats.processed_events += 1,
                HandlerOutcome::Duplicate | HandlerOutcome::Skipped(_) => {
                    stats.skipped_events += 1
                }
            }
            last_processed_block = Some(block_number);
        }

        let next_block = last_processed_block
            .map_or(0, |block| block + 1)
            .max(safe_tip + 1)
            .max(checkpoint);
        if next_block > checkpoint {
            store.set_checkpoint(next_block).await?;
            observability::record_ingestion_checkpoint(next_block);
        }

        Ok(stats)
    }

    async fn handle(
        &self,
        event: ContractEvent,
        position: EventPosition,
    ) -> Result<HandlerOutcome, NodeError> {
        let outcome = match event {
            ContractEvent::Register(event) => {
                handlers::handle_register(&self.ledger, event, self.clock.now()).await?
            }
            ContractEvent::AddNode(event) => handlers::handle_add_node(&self.ledger, event).await?,
            ContractEvent::CreateOrder(event) => {
                handlers::handle_create_order(&self.ledger, event, position).await?
            }
            ContractEvent::Withdraw(event) => {
                handlers::handle_withdraw(&self.ledger, event, position).await?
            }
        };
        Ok(outcome)
    }
}
