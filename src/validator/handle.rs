use std::{
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
    time::Duration,
};

use grid_domain::{NodeIdentity, Proof, pow};
use grid_observability::record_proof_submission;
use tokio::sync::mpsc::{self, error::SendTimeoutError};

use super::{
    challenge::{ChallengeBoard, ChallengeSnapshot},
    clock::Clock,
    difficulty::DifficultyPolicy,
    timing::CycleTiming,
};

/// A proof that passed the PoW check, tagged with the round it was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VerifiedProof {
    pub(crate) identity: NodeIdentity,
    pub(crate) round: u64,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum SubmitProofError {
    #[error("Not prove time")]
    NotProveTime,

    #[error("Verify Proof Failed")]
    InvalidProof,

    #[error("Proof queue is full")]
    QueueFull,

    #[error("Validator engine is not running")]
    EngineStopped,
}

impl SubmitProofError {
    fn outcome(&self) -> &'static str {
        match self {
            Self::NotProveTime => "not_prove_time",
            Self::InvalidProof => "invalid",
            Self::QueueFull => "queue_full",
            Self::EngineStopped => "engine_stopped",
        }
    }
}

/// State the engine owns and request handlers read.
pub(super) struct ValidatorShared {
    pub(super) timing: CycleTiming,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) board: ChallengeBoard,
    pub(super) difficulty: Arc<dyn DifficultyPolicy>,
    anchor: AtomicI64,
}

impl ValidatorShared {
    pub(super) fn new(
        timing: CycleTiming,
        clock: Arc<dyn Clock>,
        board: ChallengeBoard,
        difficulty: Arc<dyn DifficultyPolicy>,
    ) -> Self {
        Self {
            timing,
            clock,
            board,
            difficulty,
            anchor: AtomicI64::new(0),
        }
    }

    pub(super) fn anchor(&self) -> i64 {
        self.anchor.load(Ordering::Acquire)
    }

    /// Moves the anchor forward to `anchor`; an older value is ignored.
    pub(super) fn advance_anchor(&self, anchor: i64) {
        self.anchor.fetch_max(anchor, Ordering::AcqRel);
    }
}

/// Cloneable front door to a running engine.
#[derive(Clone)]
pub(crate) struct ValidatorHandle {
    pub(super) shared: Arc<ValidatorShared>,
    pub(super) proofs_tx: mpsc::Sender<VerifiedProof>,
    submit_timeout: Duration,
}

impl ValidatorHandle {
    pub(super) fn new(
        shared: Arc<ValidatorShared>,
        proofs_tx: mpsc::Sender<VerifiedProof>,
        submit_timeout: Duration,
    ) -> Self {
        Self {
            shared,
            proofs_tx,
            submit_timeout,
        }
    }

    pub(crate) fn challenge(&self) -> ChallengeSnapshot {
        self.shared.board.snapshot()
    }

    /// Checks `proof` against the current challenge and queues it for the engine.
    ///
    /// Only proofs submitted during the Prove phase with a hash meeting the node's
    /// difficulty are queued.
    pub(crate) async fn submit_proof(&self, proof: Proof) -> Result<(), SubmitProofError> {
        let result = self.verify_and_enqueue(proof).await;
        match &result {
            Ok(()) => record_proof_submission("accepted"),
            Err(error) => record_proof_submission(error.outcome()),
        }
        result
    }

    async fn verify_and_enqueue(&self, proof: Proof) -> Result<(), SubmitProofError> {
        let now = self.shared.clock.now();
        if !self.shared.timing.is_prove_time(self.shared.anchor(), now) {
            return Err(SubmitProofError::NotProveTime);
        }

        let snapshot = self.shared.board.snapshot();
        let difficulty_bits = self.shared.difficulty.difficulty_bits(proof.identity);
        if !pow::verify(&proof.hash(&snapshot.challenge), difficulty_bits) {
            return Err(SubmitProofError::InvalidProof);
        }

        let verified = VerifiedProof {
            identity: proof.identity,
            round: snapshot.round,
        };
        match self.proofs_tx.send_timeout(verified, self.submit_timeout).await {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => Err(SubmitProofError::QueueFull),
            Err(SendTimeoutError::Closed(_)) => Err(SubmitProofError::EngineStopped),
        }
    }
}

#[cfg(test)]
mod tests {
    use grid_domain::{Address, Challenge};

    use super::*;
    use crate::validator::{clock::test_clocks::ManualClock, difficulty::FixedDifficulty};

    const TIMING: CycleTiming = CycleTiming::new(10, 10, 120);

    fn handle(
        now: i64,
        capacity: usize,
        difficulty_bits: u32,
    ) -> (ValidatorHandle, mpsc::Receiver<VerifiedProof>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at(now));
        let shared = Arc::new(ValidatorShared::new(
            TIMING,
            clock.clone(),
            ChallengeBoard::new(Challenge::from_bytes([5; 32])),
            Arc::new(FixedDifficulty(difficulty_bits)),
        ));
        let (tx, rx) = mpsc::channel(capacity);
        (
            ValidatorHandle::new(shared, tx, Duration::from_millis(20)),
            rx,
            clock,
        )
    }

    fn identity() -> NodeIdentity {
        NodeIdentity::new(Address::repeat_byte(0x42), 1)
    }

    #[tokio::test]
    async fn rejects_proof_outside_prove_phase() {
        let (handle, mut rx, _clock) = handle(5, 4, 0);

        let result = handle.submit_proof(Proof::new(identity(), 0)).await;

        assert!(matches!(result, Err(SubmitProofError::NotProveTime)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn queues_verified_proof_with_current_round() {
        let (handle, mut rx, _clock) = handle(15, 4, 0);
        handle.shared.board.publish(Challenge::from_bytes([6; 32]));

        handle.submit_proof(Proof::new(identity(), 3)).await.unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            VerifiedProof {
                identity: identity(),
                round: 1,
            }
        );
    }

    #[tokio::test]
    async fn rejects_proof_below_difficulty() {
        let (handle, mut rx, _clock) = handle(15, 4, 255);

        let result = handle.submit_proof(Proof::new(identity(), 3)).await;

        assert!(matches!(result, Err(SubmitProofError::InvalidProof)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn full_queue_times_out() {
        let (handle, _rx, _clock) = handle(15, 1, 0);
        handle.submit_proof(Proof::new(identity(), 1)).await.unwrap();

        let result = handle.submit_proof(Proof::new(identity(), 2)).await;

        assert!(matches!(result, Err(SubmitProofError::QueueFull)));
    }

    #[tokio::test]
    async fn closed_queue_reports_stopped_engine() {
        let (handle, rx, _clock) = handle(15, 1, 0);
        drop(rx);

        let result = handle.submit_proof(Proof::new(identity(), 1)).await;

        assert!(matches!(result, Err(SubmitProofError::EngineStopped)));
    }

    #[tokio::test]
    async fn prove_window_follows_the_clock() {
        let (handle, mut rx, clock) = handle(21, 4, 0);
        assert!(matches!(
            handle.submit_proof(Proof::new(identity(), 0)).await,
            Err(SubmitProofError::NotProveTime)
        ));

        clock.set(130);
        handle.submit_proof(Proof::new(identity(), 0)).await.unwrap();
        assert!(rx.try_recv().is_ok());
    }
}
