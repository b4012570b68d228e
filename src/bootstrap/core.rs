use std::sync::Arc;

use grid_blockchain::EvmChain;
use grid_repository::RepositoryManager;

use crate::{
    config::{self, Config},
    error::NodeError,
    ledger::ProfitLedger,
    validator::{Clock, SystemClock},
};

pub(crate) struct CoreBootstrap {
    pub(crate) config: Config,
    pub(crate) ledger: ProfitLedger,
    pub(crate) chain: Arc<EvmChain>,
    pub(crate) clock: Arc<dyn Clock>,
}

/// Loads configuration, installs logging and opens the ledger database and chain RPC.
///
/// Configuration errors are returned before any subscriber is installed; the
/// caller reports them on stderr.
pub(crate) async fn build_core() -> Result<CoreBootstrap, NodeError> {
    let config = config::initialize_configuration()?;
    crate::logger::initialize(&config.logger, &config.telemetry)
        .map_err(|error| NodeError::Other(format!("failed to install logger: {error}")))?;

    tracing::info!(
        validator = %config.validator.signer.address(),
        chain = %config.blockchain.chain,
        "Starting grid validator"
    );
    if config.validator.signer_generated {
        tracing::warn!(
            address = %config.validator.signer.address(),
            "No validator private key configured, signing with a key generated for this run only"
        );
    }

    let repository = RepositoryManager::connect(&config.repository).await?;
    let ledger = ProfitLedger::new(Arc::new(repository));

    let chain = Arc::new(EvmChain::connect(config.blockchain.clone()).await?);

    Ok(CoreBootstrap {
        config,
        ledger,
        chain,
        clock: Arc::new(SystemClock),
    })
}
