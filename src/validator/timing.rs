//! Cycle arithmetic over integer Unix seconds.
//!
//! A cycle starts at `anchor` and consists of Prepare `[0, P)`, Prove `[P, P+V]`
//! and Wait `(P+V, C)`, measured as `elapsed = (now - anchor) mod C`.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Prepare,
    Prove,
    Wait,
}

/// Outcome of a wait computation: how long to sleep, the re-based anchor and
/// the anchor of the following cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CycleWait {
    pub(crate) delay: Duration,
    pub(crate) anchor: i64,
    pub(crate) next: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CycleTiming {
    prepare_secs: i64,
    prove_secs: i64,
    cycle_secs: i64,
}

impl CycleTiming {
    /// Caller guarantees `prepare_secs + prove_secs < cycle_secs` and positive durations.
    pub(crate) const fn new(prepare_secs: i64, prove_secs: i64, cycle_secs: i64) -> Self {
        Self {
            prepare_secs,
            prove_secs,
            cycle_secs,
        }
    }

    pub(crate) fn cycle_secs(&self) -> i64 {
        self.cycle_secs
    }

    fn elapsed(&self, anchor: i64, now: i64) -> i64 {
        now.wrapping_sub(anchor).rem_euclid(self.cycle_secs)
    }

    fn prove_end(&self) -> i64 {
        self.prepare_secs + self.prove_secs
    }

    pub(crate) fn phase(&self, anchor: i64, now: i64) -> Phase {
        let elapsed = self.elapsed(anchor, now);
        if elapsed < self.prepare_secs {
            Phase::Prepare
        } else if elapsed <= self.prove_end() {
            Phase::Prove
        } else {
            Phase::Wait
        }
    }

    pub(crate) fn is_prove_time(&self, anchor: i64, now: i64) -> bool {
        self.phase(anchor, now) == Phase::Prove
    }

    pub(crate) fn wait_to_prepare(&self, anchor: i64, now: i64) -> CycleWait {
        let elapsed = self.elapsed(anchor, now);
        let delay = if elapsed >= self.prepare_secs {
            self.cycle_secs - elapsed
        } else {
            0
        };

        let anchor = now - elapsed;
        CycleWait {
            delay: seconds(delay),
            anchor,
            next: anchor + self.cycle_secs,
        }
    }

    pub(crate) fn wait_to_prove(&self, anchor: i64, now: i64) -> CycleWait {
        let elapsed = self.elapsed(anchor, now);
        let (delay, anchor) = if elapsed < self.prepare_secs {
            (self.prepare_secs - elapsed, now - elapsed)
        } else if elapsed > self.prove_end() {
            (
                self.cycle_secs + self.prepare_secs - elapsed,
                now - elapsed + self.cycle_secs,
            )
        } else {
            (0, anchor)
        };

        CycleWait {
            delay: seconds(delay),
            anchor,
            next: anchor + self.cycle_secs,
        }
    }

    /// Time left until the Prove phase of the current cycle closes; zero outside Prove.
    pub(crate) fn prove_window_remaining(&self, anchor: i64, now: i64) -> Duration {
        let elapsed = self.elapsed(anchor, now);
        if self.phase(anchor, now) == Phase::Prove {
            seconds(self.prove_end() - elapsed)
        } else {
            Duration::ZERO
        }
    }
}

fn seconds(value: i64) -> Duration {
    Duration::from_secs(value.max(0) as u64)
}
