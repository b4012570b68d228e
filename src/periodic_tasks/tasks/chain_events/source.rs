use async_trait::async_trait;
use grid_blockchain::{BlockchainError, ContractLog, EvmChain};

/// Where the ingestor reads registry and market logs from.
#[async_trait]
pub(crate) trait ContractLogSource: Send + Sync {
    async fn block_number(&self) -> Result<u64, BlockchainError>;

    /// All logs of the watched contracts in `[from_block, to_block]`.
    async fn contract_logs(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ContractLog>, BlockchainError>;
}

#[async_trait]
impl ContractLogSource for EvmChain {
    async fn block_number(&self) -> Result<u64, BlockchainError> {
        self.get_block_number().await
    }

    async fn contract_logs(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ContractLog>, BlockchainError> {
        self.get_contract_logs(from_block, to_block).await
    }
}
