use grid_blockchain::{BlockchainConfig, BlockchainConfigRaw};
use grid_repository::{RepositoryManagerConfig, RepositoryManagerConfigRaw};
use serde::{Deserialize, Serialize};

use crate::{
    config::ConfigError,
    controllers::HttpApiConfig,
    logger::{LoggerConfig, TelemetryConfig},
    periodic_tasks::ChainEventsConfig,
    validator::{ValidatorConfig, ValidatorConfigRaw},
};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigRaw {
    pub environment: String,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
    pub http_api: HttpApiConfig,
    pub repository: RepositoryManagerConfigRaw,
    pub blockchain: BlockchainConfigRaw,
    pub chain_events: ChainEventsConfig,
    pub validator: ValidatorConfigRaw,
}

#[derive(Debug)]
pub(crate) struct Config {
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
    pub http_api: HttpApiConfig,
    pub repository: RepositoryManagerConfig,
    pub blockchain: BlockchainConfig,
    pub chain_events: ChainEventsConfig,
    pub validator: ValidatorConfig,
}

impl ConfigRaw {
    pub(crate) fn resolve(self) -> Result<Config, ConfigError> {
        if self.chain_events.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "chain_events.poll_interval_secs must be greater than zero".to_string(),
            ));
        }

        Ok(Config {
            logger: self.logger,
            telemetry: self.telemetry,
            http_api: self.http_api,
            repository: self.repository.resolve()?,
            blockchain: self.blockchain.resolve()?,
            chain_events: self.chain_events,
            validator: self.validator.resolve()?,
        })
    }
}
