use std::{collections::BTreeMap, sync::Arc, time::Instant};

use grid_domain::{Challenge, NodeIdentity};
use grid_observability::{
    record_challenge_round, record_discarded_proofs, record_settlement_outcome,
    record_validator_stage,
};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use super::{
    challenge::ChallengeBoard,
    clock::Clock,
    config::ValidatorConfig,
    difficulty::FixedDifficulty,
    handle::{ValidatorHandle, ValidatorShared, VerifiedProof},
    timing::CycleWait,
};
use crate::ledger::ProfitLedger;

/// Per-node outcome of one challenge round; `true` once a valid proof arrived.
pub(crate) type Outcomes = BTreeMap<NodeIdentity, bool>;

/// Drives the Prepare, Prove and settlement cycle.
///
/// The engine is the only consumer of the proof queue and the only writer of the
/// challenge board and the cycle anchor.
pub(crate) struct ValidatorEngine {
    shared: Arc<ValidatorShared>,
    ledger: ProfitLedger,
    proofs_rx: mpsc::Receiver<VerifiedProof>,
}

impl ValidatorEngine {
    pub(crate) fn new(
        config: &ValidatorConfig,
        ledger: ProfitLedger,
        clock: Arc<dyn Clock>,
    ) -> (Self, ValidatorHandle) {
        let shared = Arc::new(ValidatorShared::new(
            config.timing,
            clock,
            ChallengeBoard::new(Challenge::random()),
            Arc::new(FixedDifficulty(config.difficulty_bits)),
        ));
        let (proofs_tx, proofs_rx) = mpsc::channel(config.proof_queue_capacity);
        let handle = ValidatorHandle::new(Arc::clone(&shared), proofs_tx, config.submit_timeout);

        (
            Self {
                shared,
                ledger,
                proofs_rx,
            },
            handle,
        )
    }

    pub(crate) fn spawn(self) -> RunningValidator {
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(self.run(shutdown.clone()));
        RunningValidator { shutdown, handle }
    }

    async fn run(mut self, shutdown: CancellationToken) {
        tracing::info!(
            anchor = self.shared.anchor(),
            cycle_secs = self.shared.timing.cycle_secs(),
            "Validator engine started"
        );

        while self.run_cycle(&shutdown).await {}

        tracing::info!("Validator engine stopped");
    }

    /// Runs one full cycle. Returns false once shutdown was requested.
    #[tracing::instrument(name = "validator_cycle", skip_all, fields(round = tracing::field::Empty))]
    async fn run_cycle(&mut self, shutdown: &CancellationToken) -> bool {
        let Some(prepare) = self.await_prepare(shutdown).await else {
            return false;
        };

        let round = self.shared.board.publish(Challenge::random());
        tracing::Span::current().record("round", round);
        tracing::debug!(anchor = prepare.anchor, "Published new challenge");

        let Some(cycle_anchor) = self.await_prove(shutdown).await else {
            return false;
        };

        let Some(outcomes) = self.collect_proofs(round, cycle_anchor, shutdown).await else {
            return false;
        };

        self.settle(cycle_anchor, &outcomes).await;
        self.shared.advance_anchor(prepare.next);
        true
    }

    async fn await_prepare(&self, shutdown: &CancellationToken) -> Option<CycleWait> {
        let wait = self
            .shared
            .timing
            .wait_to_prepare(self.shared.anchor(), self.shared.clock.now());
        self.shared.advance_anchor(wait.anchor);
        sleep_or_cancel(wait, shutdown).await
    }

    async fn await_prove(&self, shutdown: &CancellationToken) -> Option<i64> {
        let wait = self
            .shared
            .timing
            .wait_to_prove(self.shared.anchor(), self.shared.clock.now());
        let wait = sleep_or_cancel(wait, shutdown).await?;
        self.shared.advance_anchor(wait.anchor);
        Some(wait.anchor)
    }

    async fn challenged_nodes(&self, now: i64) -> Outcomes {
        match self.ledger.store().active_orders(now).await {
            Ok(orders) => orders
                .iter()
                .map(|order| (order.identity(), false))
                .collect(),
            Err(error) => {
                tracing::error!(
                    error = %error,
                    "Failed to read active orders, no node is challenged this cycle"
                );
                Outcomes::new()
            }
        }
    }

    /// Collects proofs until the Prove window of `cycle_anchor` closes.
    ///
    /// Returns `None` when cancelled.
    pub(super) async fn collect_proofs(
        &mut self,
        round: u64,
        cycle_anchor: i64,
        shutdown: &CancellationToken,
    ) -> Option<Outcomes> {
        let started = Instant::now();
        let mut outcomes = self.challenged_nodes(self.shared.clock.now()).await;
        record_challenge_round(round, outcomes.len());

        // Re-read after the query so its latency does not extend the window.
        let window = self
            .shared
            .timing
            .prove_window_remaining(cycle_anchor, self.shared.clock.now());
        let deadline = tokio::time::sleep(window);
        tokio::pin!(deadline);

        let mut queue_open = true;
        let mut stale = 0;
        let mut window_open = !window.is_zero();
        while window_open {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => return None,
                _ = &mut deadline => window_open = false,
                received = self.proofs_rx.recv(), if queue_open => match received {
                    Some(proof) if proof.round != round => stale += 1,
                    Some(proof) => match outcomes.get_mut(&proof.identity) {
                        Some(outcome) => *outcome = true,
                        None => tracing::debug!(
                            identity = %proof.identity,
                            "Ignoring proof for a node without an active order"
                        ),
                    },
                    None => queue_open = false,
                },
            }
        }

        let mut late = 0;
        while self.proofs_rx.try_recv().is_ok() {
            late += 1;
        }
        record_discarded_proofs("stale_round", stale);
        record_discarded_proofs("window_closed", late);

        let proven = outcomes.values().filter(|proven| **proven).count();
        tracing::info!(
            challenged = outcomes.len(),
            proven,
            stale,
            late,
            "Prove window closed"
        );
        record_validator_stage("collect", "success", started.elapsed());
        Some(outcomes)
    }

    /// Applies every outcome to its provider's ledger row, in identity order.
    ///
    /// A storage failure, a missing row included, abandons the remaining outcomes
    /// of this cycle.
    pub(super) async fn settle(&self, cycle_anchor: i64, outcomes: &Outcomes) {
        let started = Instant::now();

        for (identity, success) in outcomes {
            let success = *success;
            let result = self
                .ledger
                .update_profit(identity.provider_address, |row| row.settle(cycle_anchor, success))
                .await;

            match result {
                Ok(settlement) => {
                    tracing::debug!(
                        identity = %identity,
                        success,
                        reward = %settlement.reward,
                        penalty = %settlement.penalty,
                        "Settled node"
                    );
                    record_settlement_outcome(if success { "success" } else { "failure" });
                }
                Err(error) => {
                    tracing::error!(
                        identity = %identity,
                        cycle_anchor,
                        error = %error,
                        "Settlement aborted"
                    );
                    record_settlement_outcome("error");
                    record_validator_stage("settle", "failure", started.elapsed());
                    return;
                }
            }
        }

        record_validator_stage("settle", "success", started.elapsed());
    }
}

#[cfg(test)]
impl ValidatorEngine {
    /// Drains the proof queue and returns how many proofs were waiting.
    pub(crate) fn drain_queued_proofs(&mut self) -> usize {
        let mut count = 0;
        while self.proofs_rx.try_recv().is_ok() {
            count += 1;
        }
        count
    }
}

async fn sleep_or_cancel(wait: CycleWait, shutdown: &CancellationToken) -> Option<CycleWait> {
    tokio::select! {
        _ = shutdown.cancelled() => None,
        _ = tokio::time::sleep(wait.delay) => Some(wait),
    }
}

/// A spawned engine together with what is needed to stop it.
pub(crate) struct RunningValidator {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl RunningValidator {
    pub(crate) fn cancel(&self) {
        self.shutdown.cancel();
    }

    #[cfg(test)]
    pub(crate) fn from_parts(shutdown: CancellationToken, handle: JoinHandle<()>) -> Self {
        Self { shutdown, handle }
    }

    /// Cancels the engine and returns once its loop has exited.
    pub(crate) async fn stop(self) {
        self.shutdown.cancel();
        if let Err(error) = self.handle.await {
            tracing::error!(error = ?error, "Validator engine task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use grid_domain::{Address, EventPosition, Order, ProfitLedgerRow, Proof, ProviderNode};
    use num_bigint::BigInt;

    use super::*;
    use crate::{
        ledger::{LedgerStore, MemoryLedgerStore},
        validator::{
            clock::test_clocks::{ManualClock, TokioClock},
            timing::CycleTiming,
        },
    };

    fn config() -> ValidatorConfig {
        ValidatorConfig {
            signer: grid_blockchain::generate_signer(),
            signer_generated: false,
            timing: CycleTiming::new(10, 10, 120),
            difficulty_bits: 0,
            proof_queue_capacity: 8,
            submit_timeout: Duration::from_millis(10),
        }
    }

    fn node(identity: NodeIdentity) -> ProviderNode {
        ProviderNode {
            identity,
            cpu_price: BigInt::from(1),
            cpu_model: "cpu".to_string(),
            gpu_price: BigInt::from(0),
            gpu_model: "gpu".to_string(),
            mem_price: BigInt::from(0),
            mem_capacity: 1,
            disk_price: BigInt::from(0),
            disk_capacity: 1,
        }
    }

    /// Stores an order for `identity` active in `(start, end)` and an open row.
    async fn seed(
        store: &MemoryLedgerStore,
        identity: NodeIdentity,
        start: i64,
        end: i64,
        block: u64,
    ) {
        let order = Order::new(
            identity.provider_address,
            identity.node_id,
            start,
            0,
            end - start,
            EventPosition::new(block, 0),
        )
        .unwrap();
        store.upsert_node(&node(identity)).await.unwrap();
        store.insert_order_if_absent(&order).await.unwrap();
        store
            .create_profit_if_absent(&ProfitLedgerRow::opened(identity.provider_address, 0))
            .await
            .unwrap();
    }

    async fn set_profit(store: &MemoryLedgerStore, address: Address, profit: i64, end_time: i64) {
        let mut row = store.profit(&address).await.unwrap().unwrap();
        row.profit = BigInt::from(profit);
        row.end_time = end_time;
        store.update_profit(&row).await.unwrap();
    }

    fn engine_at(
        store: Arc<MemoryLedgerStore>,
        clock: Arc<dyn Clock>,
    ) -> (ValidatorEngine, ValidatorHandle) {
        ValidatorEngine::new(&config(), ProfitLedger::new(store), clock)
    }

    #[tokio::test(start_paused = true)]
    async fn collection_marks_only_current_round_proofs() {
        let store = Arc::new(MemoryLedgerStore::default());
        let proven = NodeIdentity::new(Address::repeat_byte(1), 1);
        let silent = NodeIdentity::new(Address::repeat_byte(2), 1);
        let stale = NodeIdentity::new(Address::repeat_byte(3), 1);
        for (block, identity) in [proven, silent, stale].into_iter().enumerate() {
            seed(&store, identity, 0, 10_000, block as u64).await;
        }

        let clock = Arc::new(ManualClock::at(1_210));
        let (mut engine, handle) = engine_at(store, clock);
        engine.shared.advance_anchor(1_200);
        let round = engine.shared.board.publish(Challenge::random());

        handle
            .proofs_tx
            .send(VerifiedProof {
                identity: stale,
                round: round - 1,
            })
            .await
            .unwrap();
        handle.submit_proof(Proof::new(proven, 0)).await.unwrap();
        handle
            .submit_proof(Proof::new(NodeIdentity::new(Address::repeat_byte(9), 1), 0))
            .await
            .unwrap();

        let outcomes = engine
            .collect_proofs(round, 1_200, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[&proven]);
        assert!(!outcomes[&silent]);
        assert!(!outcomes[&stale]);
    }

    #[tokio::test(start_paused = true)]
    async fn collection_stops_on_cancel() {
        let store = Arc::new(MemoryLedgerStore::default());
        let (mut engine, _handle) = engine_at(store, Arc::new(ManualClock::at(1_210)));
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        assert!(engine.collect_proofs(1, 1_200, &shutdown).await.is_none());
    }

    #[tokio::test]
    async fn settlement_rewards_success_and_penalizes_failure() {
        let store = Arc::new(MemoryLedgerStore::default());
        let winner = NodeIdentity::new(Address::repeat_byte(1), 1);
        let loser = NodeIdentity::new(Address::repeat_byte(2), 1);
        seed(&store, winner, 0, 10_000, 1).await;
        seed(&store, loser, 0, 10_000, 2).await;
        set_profit(&store, winner.provider_address, 1_000, 400).await;
        set_profit(&store, loser.provider_address, 1_000, 400).await;

        let (engine, _handle) = engine_at(store.clone(), Arc::new(ManualClock::at(0)));
        let outcomes = Outcomes::from([(winner, true), (loser, false)]);
        engine.settle(100, &outcomes).await;

        // 1000 * 100 / 400 = 250 paid, 750 remains.
        let winner_row = store.profit(&winner.provider_address).await.unwrap().unwrap();
        assert_eq!(winner_row.balance, BigInt::from(250));
        assert_eq!(winner_row.profit, BigInt::from(750));
        assert_eq!(winner_row.penalty, BigInt::from(0));
        assert_eq!(winner_row.last_time, 100);

        let loser_row = store.profit(&loser.provider_address).await.unwrap().unwrap();
        assert_eq!(loser_row.balance, BigInt::from(250));
        assert_eq!(loser_row.profit, BigInt::from(743));
        assert_eq!(loser_row.penalty, BigInt::from(7));
    }

    #[tokio::test]
    async fn missing_row_aborts_the_whole_settlement() {
        let store = Arc::new(MemoryLedgerStore::default());
        let known = NodeIdentity::new(Address::repeat_byte(2), 1);
        seed(&store, known, 0, 10_000, 1).await;
        set_profit(&store, known.provider_address, 100, 50).await;
        let writes_before = store.profit_writes();

        let (engine, _handle) = engine_at(store.clone(), Arc::new(ManualClock::at(0)));
        // Settled first in identity order, and has no row.
        let orphan = NodeIdentity::new(Address::repeat_byte(1), 1);
        engine
            .settle(60, &Outcomes::from([(orphan, true), (known, true)]))
            .await;

        let row = store.profit(&known.provider_address).await.unwrap().unwrap();
        assert_eq!(row.balance, BigInt::from(0));
        assert_eq!(row.profit, BigInt::from(100));
        assert_eq!(row.last_time, 0);
        assert_eq!(store.profit_writes(), writes_before);
    }

    #[tokio::test(start_paused = true)]
    async fn proof_queued_after_deadline_is_discarded_not_carried_over() {
        let store = Arc::new(MemoryLedgerStore::default());
        let identity = NodeIdentity::new(Address::repeat_byte(4), 1);
        seed(&store, identity, 0, 10_000, 1).await;

        // 1_220 is the end of the Prove window anchored at 1_200.
        let (mut engine, handle) = engine_at(store, Arc::new(ManualClock::at(1_220)));
        engine.shared.advance_anchor(1_200);
        let round = engine.shared.board.publish(Challenge::random());
        handle
            .proofs_tx
            .send(VerifiedProof { identity, round })
            .await
            .unwrap();

        let outcomes = engine
            .collect_proofs(round, 1_200, &CancellationToken::new())
            .await
            .unwrap();
        assert!(!outcomes[&identity]);
        assert_eq!(engine.drain_queued_proofs(), 0);

        let next_round = engine.shared.board.publish(Challenge::random());
        let outcomes = engine
            .collect_proofs(next_round, 1_200, &CancellationToken::new())
            .await
            .unwrap();
        assert!(!outcomes[&identity]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_order_query_does_not_extend_the_window() {
        let store = Arc::new(MemoryLedgerStore::default());
        store.delay_active_orders(Duration::from_secs(4));
        // 1_210 opens the Prove window anchored at 1_200, which closes at 1_220.
        let (mut engine, _handle) = engine_at(store, Arc::new(TokioClock::starting_at(1_210)));
        engine.shared.advance_anchor(1_200);
        let round = engine.shared.board.publish(Challenge::random());

        let started = tokio::time::Instant::now();
        engine
            .collect_proofs(round, 1_200, &CancellationToken::new())
            .await
            .unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(10), "closed early: {elapsed:?}");
        assert!(elapsed < Duration::from_secs(11), "window overran: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn full_cycle_settles_proven_node_and_advances_anchor() {
        let store = Arc::new(MemoryLedgerStore::default());
        let identity = NodeIdentity::new(Address::repeat_byte(7), 3);
        seed(&store, identity, 0, 100_000, 1).await;
        set_profit(&store, identity.provider_address, 1_200, 1_320).await;

        // 1_205 is inside Prepare of the cycle anchored at 1_200.
        let (engine, handle) = engine_at(store.clone(), Arc::new(TokioClock::starting_at(1_205)));
        let running = engine.spawn();

        tokio::time::sleep(Duration::from_secs(7)).await;
        assert_eq!(handle.challenge().round, 1);
        handle.submit_proof(Proof::new(identity, 0)).await.unwrap();

        tokio::time::sleep(Duration::from_secs(30)).await;
        running.stop().await;

        // Settled at anchor 1_200: 1200 * (1200 - 0) / (1320 - 0) = 1090.
        let row = store.profit(&identity.provider_address).await.unwrap().unwrap();
        assert_eq!(row.last_time, 1_200);
        assert_eq!(row.balance, BigInt::from(1_090));
        assert_eq!(row.penalty, BigInt::from(0));
        assert_eq!(handle.shared.anchor(), 1_320);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_returns_while_waiting_for_prepare() {
        let store = Arc::new(MemoryLedgerStore::default());
        // Wait phase: the engine sleeps until the next Prepare.
        let (engine, handle) = engine_at(store, Arc::new(TokioClock::starting_at(1_250)));
        let running = engine.spawn();
        tokio::task::yield_now().await;

        running.stop().await;

        assert_eq!(handle.challenge().round, 0);
    }
}
