use std::time::Instant;

use alloy::{providers::Provider, rpc::types::Filter};

use crate::{
    ContractLog, ContractName,
    chains::evm::{EvmChain, MAXIMUM_NUMBERS_OF_BLOCKS_TO_FETCH},
    error::BlockchainError,
};

impl EvmChain {
    pub async fn get_block_number(&self) -> Result<u64, BlockchainError> {
        self.rpc_call("get_block_number", || async {
            self.provider().get_block_number().await
        })
        .await
        .map_err(BlockchainError::get_block_number)
    }

    /// Fetches logs of the registry and market contracts in `[from_block, to_block]`,
    /// in chunks of at most 50 blocks.
    pub async fn get_contract_logs(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ContractLog>, BlockchainError> {
        let mut all_logs = Vec::new();

        let mut block = from_block;
        while block <= to_block {
            let chunk_end = std::cmp::min(
                block.saturating_add(MAXIMUM_NUMBERS_OF_BLOCKS_TO_FETCH - 1),
                to_block,
            );
            let block_span = (chunk_end - block + 1) as usize;

            for contract_name in ContractName::ALL {
                let filter = Filter::new()
                    .address(self.contract_address(contract_name))
                    .from_block(block)
                    .to_block(chunk_end);

                let batch_started = Instant::now();
                let logs = match self
                    .rpc_call("get_logs", || async {
                        self.provider().get_logs(&filter).await
                    })
                    .await
                {
                    Ok(logs) => {
                        grid_observability::record_blockchain_event_logs_batch(
                            "ok",
                            batch_started.elapsed(),
                            block_span,
                            logs.len(),
                        );
                        logs
                    }
                    Err(err) => {
                        grid_observability::record_blockchain_event_logs_batch(
                            "error",
                            batch_started.elapsed(),
                            block_span,
                            0,
                        );
                        return Err(BlockchainError::get_logs(err));
                    }
                };

                all_logs.extend(
                    logs.into_iter()
                        .filter(|log| log.topic0().is_some())
                        .map(|log| ContractLog::new(contract_name, log)),
                );
            }

            if chunk_end == u64::MAX {
                break;
            }
            block = chunk_end + 1;
        }

        Ok(all_logs)
    }
}
