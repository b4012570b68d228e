mod chains;
mod config;
mod config_error;
mod contract_events;
mod error;
mod error_classification;
mod rpc_executor;
mod rpc_rate_limiter;
mod signing;
mod utils;

pub use alloy::{
    primitives::{Address, B256, U256},
    rpc::types::Log,
    signers::local::PrivateKeySigner,
};
pub use chains::evm::{ContractLog, ContractName, EvmChain, Market, Registry};
pub use config::{BlockchainConfig, BlockchainConfigRaw};
pub use config_error::ConfigError;
pub use contract_events::{ContractEvent, EventDecodeError, EventKind, EventSignatureTable};
pub use error::BlockchainError;
pub use rpc_rate_limiter::RpcRateLimiter;
pub use signing::{generate_signer, sign_digest, signer_from_private_key, withdrawal_digest};
pub use utils::{keccak256_encode_packed, to_hex_string};
