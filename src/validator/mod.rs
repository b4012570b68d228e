//! Challenge-response validation of provider nodes.
//!
//! The engine publishes a random challenge every cycle, collects proofs of work
//! submitted through [`ValidatorHandle`] during the Prove phase and settles each
//! challenged node's outcome against its provider's profit ledger.

mod challenge;
mod clock;
mod config;
mod difficulty;
mod engine;
mod handle;
mod timing;

#[cfg(test)]
pub(crate) use clock::test_clocks;
pub(crate) use clock::{Clock, SystemClock};
pub(crate) use config::{ValidatorConfig, ValidatorConfigRaw};
pub(crate) use engine::{RunningValidator, ValidatorEngine};
pub(crate) use handle::{SubmitProofError, ValidatorHandle};
#[cfg(test)]
pub(crate) use timing::CycleTiming;
