mod amount;
mod challenge;
mod identity;
mod ledger;
pub mod pow;
mod proof;

pub use alloy::primitives::Address;
pub use amount::{
    AmountParseError, amount_from_u256, minimal_be_bytes, parse_amount, parse_non_negative_amount,
};
pub use challenge::{Challenge, ChallengeParseError};
pub use identity::NodeIdentity;
pub use ledger::{EventPosition, Order, ProfitLedgerRow, Provider, ProviderNode, Settlement};
pub use proof::Proof;
