use alloy::{primitives::Address, rpc::types::Log};

use crate::{
    BlockchainConfig, RpcRateLimiter,
    error::BlockchainError,
    rpc_executor::{RetryPolicy, RetryableError, backoff_delay},
};

mod contracts;
mod provider;
mod rpc;

pub use contracts::{Market, Registry};
use provider::{BlockchainProvider, initialize_provider};

const MAXIMUM_NUMBERS_OF_BLOCKS_TO_FETCH: u64 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractName {
    Registry,
    Market,
}

impl ContractName {
    pub const ALL: [ContractName; 2] = [ContractName::Registry, ContractName::Market];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractName::Registry => "Registry",
            ContractName::Market => "Market",
        }
    }
}

/// A raw log tagged with the contract it was fetched from.
#[derive(Debug, Clone)]
pub struct ContractLog {
    contract_name: ContractName,
    log: Log,
}

impl ContractLog {
    pub fn new(contract_name: ContractName, log: Log) -> Self {
        Self { contract_name, log }
    }

    pub fn contract_name(&self) -> ContractName {
        self.contract_name
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn block_number(&self) -> Option<u64> {
        self.log.block_number
    }

    pub fn log_index(&self) -> Option<u64> {
        self.log.log_index
    }
}

pub struct EvmChain {
    config: BlockchainConfig,
    provider: BlockchainProvider,
    rpc_rate_limiter: RpcRateLimiter,
    rpc_retry_policy: RetryPolicy,
}

impl EvmChain {
    pub async fn connect(config: BlockchainConfig) -> Result<Self, BlockchainError> {
        let provider = initialize_provider(&config.rpc_endpoints).await?;
        let rpc_rate_limiter = RpcRateLimiter::new(config.max_rpc_requests_per_second);

        tracing::info!(
            chain = %config.chain,
            registry = %config.registry_contract_address,
            market = %config.market_contract_address,
            rate_limited = rpc_rate_limiter.is_limited(),
            "Connected to blockchain"
        );

        Ok(Self {
            config,
            provider,
            rpc_rate_limiter,
            rpc_retry_policy: RetryPolicy::rpc_default(),
        })
    }

    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    pub fn contract_address(&self, contract_name: ContractName) -> Address {
        match contract_name {
            ContractName::Registry => self.config.registry_contract_address,
            ContractName::Market => self.config.market_contract_address,
        }
    }

    fn provider(&self) -> &BlockchainProvider {
        &self.provider
    }

    /// Runs an RPC operation under the rate limiter, retrying transient failures.
    pub(crate) async fn rpc_call<T, E, F, O>(&self, operation_name: &str, mut operation: F) -> Result<T, E>
    where
        E: RetryableError,
        F: FnMut() -> O,
        O: std::future::IntoFuture<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            self.rpc_rate_limiter.acquire().await;
            match operation().into_future().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.rpc_retry_policy.max_attempts || !err.is_retryable() {
                        return Err(err);
                    }

                    let delay = backoff_delay(&self.rpc_retry_policy, attempt, err.backoff_hint());
                    grid_observability::record_blockchain_rpc_retry(operation_name);
                    tracing::warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts = self.rpc_retry_policy.max_attempts,
                        delay_ms = delay.as_millis(),
                        error = %err,
                        "rpc_call failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
