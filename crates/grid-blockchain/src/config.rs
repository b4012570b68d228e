use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Chain connection settings for the registry and market contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockchainConfigRaw {
    /// Human-readable chain label used in logs (e.g. "grid-devchain").
    pub chain: String,

    /// RPC endpoints for EVM JSON-RPC calls (supports HTTP and WebSocket).
    /// Multiple endpoints enable fallback if primary fails.
    #[serde(default)]
    pub rpc_endpoints: Vec<String>,

    /// Address of the provider registry contract (Register, AddNode events).
    pub registry_contract_address: String,

    /// Address of the order market contract (CreateOrder, Withdraw events).
    pub market_contract_address: String,

    /// Maximum RPC requests per second (optional rate limiting).
    pub max_rpc_requests_per_second: Option<u32>,

    /// Blocks behind the chain tip that the event ingestor stays.
    pub confirmations: u64,
}

impl BlockchainConfigRaw {
    pub fn resolve(self) -> Result<BlockchainConfig, ConfigError> {
        if self.rpc_endpoints.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "rpc_endpoints must include at least one endpoint".to_string(),
            ));
        }
        if self.max_rpc_requests_per_second == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "max_rpc_requests_per_second must be greater than zero".to_string(),
            ));
        }

        Ok(BlockchainConfig {
            registry_contract_address: parse_address(
                "registry_contract_address",
                &self.registry_contract_address,
            )?,
            market_contract_address: parse_address(
                "market_contract_address",
                &self.market_contract_address,
            )?,
            chain: self.chain,
            rpc_endpoints: self.rpc_endpoints,
            max_rpc_requests_per_second: self.max_rpc_requests_per_second,
            confirmations: self.confirmations,
        })
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidConfig(format!("{field} is not a valid address: {value}")))
}

#[derive(Debug, Clone)]
pub struct BlockchainConfig {
    pub chain: String,
    pub rpc_endpoints: Vec<String>,
    pub registry_contract_address: Address,
    pub market_contract_address: Address,
    pub max_rpc_requests_per_second: Option<u32>,
    pub confirmations: u64,
}
