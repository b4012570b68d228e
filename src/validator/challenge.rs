use grid_domain::Challenge;
use tokio::sync::watch;

/// The challenge currently in force and the round it was published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChallengeSnapshot {
    pub(crate) round: u64,
    pub(crate) challenge: Challenge,
}

/// Single-writer board the engine publishes challenges on.
///
/// Readers always observe a matching `(round, challenge)` pair.
pub(crate) struct ChallengeBoard {
    tx: watch::Sender<ChallengeSnapshot>,
}

impl ChallengeBoard {
    pub(crate) fn new(initial: Challenge) -> Self {
        let (tx, _rx) = watch::channel(ChallengeSnapshot {
            round: 0,
            challenge: initial,
        });
        Self { tx }
    }

    /// Replaces the challenge and returns the new round number.
    pub(crate) fn publish(&self, challenge: Challenge) -> u64 {
        let mut round = 0;
        self.tx.send_modify(|snapshot| {
            snapshot.round += 1;
            snapshot.challenge = challenge;
            round = snapshot.round;
        });
        round
    }

    pub(crate) fn snapshot(&self) -> ChallengeSnapshot {
        *self.tx.borrow()
    }
}
