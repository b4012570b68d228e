//! Typed default configurations for each environment.
//!
//! Each environment (development, testnet, mainnet) gets a fully constructed
//! [`ConfigRaw`] via [`config_for`]. Shared defaults live in helper functions so
//! the per-environment constructors only spell out what differs.

use grid_blockchain::BlockchainConfigRaw;
use grid_repository::RepositoryManagerConfigRaw;

use super::{ConfigError, ConfigRaw};
use crate::{
    controllers::{HttpApiConfig, http_api_controller::middleware::RateLimiterConfig},
    logger::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig},
    periodic_tasks::ChainEventsConfig,
    validator::ValidatorConfigRaw,
};

const REGISTRY_CONTRACT_ADDRESS: &str = "0x0975F806ef48E94f46FAADdDA6ED86da7C522330";
const MARKET_CONTRACT_ADDRESS: &str = "0x2f196ba4929e1E4aE2623130A1045f877bD1Afca";

/// Returns the default [`ConfigRaw`] for the given environment name.
pub(crate) fn config_for(environment: &str) -> Result<ConfigRaw, ConfigError> {
    match environment {
        "development" => Ok(development()),
        "testnet" => Ok(testnet()),
        "mainnet" => Ok(mainnet()),
        _ => Err(ConfigError::UnknownEnvironment(environment.to_string())),
    }
}

// ── Shared defaults (identical across all environments) ─────────

fn http_api() -> HttpApiConfig {
    HttpApiConfig {
        enabled: true,
        port: 8081,
        rate_limiter: RateLimiterConfig::default(),
    }
}

fn chain_events() -> ChainEventsConfig {
    ChainEventsConfig {
        poll_interval_secs: 12,
        start_block: 0,
    }
}

fn validator() -> ValidatorConfigRaw {
    ValidatorConfigRaw {
        private_key: None,
        prepare_secs: 10,
        prove_secs: 10,
        cycle_secs: 120,
        difficulty_bits: 8,
        proof_queue_capacity: 100,
        submit_timeout_ms: 500,
    }
}

// ── Parameterized helpers (shared structure, varying values) ────

fn blockchain(chain: &str, rpc_endpoint: &str, confirmations: u64) -> BlockchainConfigRaw {
    BlockchainConfigRaw {
        chain: chain.to_string(),
        rpc_endpoints: vec![rpc_endpoint.to_string()],
        registry_contract_address: REGISTRY_CONTRACT_ADDRESS.to_string(),
        market_contract_address: MARKET_CONTRACT_ADDRESS.to_string(),
        max_rpc_requests_per_second: None,
        confirmations,
    }
}

fn repository(url: Option<&str>, max_connections: u32) -> RepositoryManagerConfigRaw {
    RepositoryManagerConfigRaw {
        url: url.map(str::to_string),
        max_connections,
        min_connections: 1,
    }
}

fn logger(level: &str) -> LoggerConfig {
    LoggerConfig {
        level: level.to_string(),
        format: LogFormat::Pretty,
    }
}

fn telemetry(enabled: bool) -> TelemetryConfig {
    TelemetryConfig {
        metrics: TelemetryMetricsConfig {
            enabled,
            bind_address: "0.0.0.0:9464".to_string(),
        },
    }
}

// ── Per-environment constructors ────────────────────────────────

fn development() -> ConfigRaw {
    ConfigRaw {
        environment: "development".to_string(),
        logger: logger("grid_validator=debug,grid_blockchain=debug,info"),
        telemetry: telemetry(true),
        http_api: http_api(),
        repository: repository(Some("sqlite://grid-validator.sqlite?mode=rwc"), 10),
        blockchain: blockchain("grid-devchain", "https://devchain.metamemo.one:8501", 1),
        chain_events: chain_events(),
        validator: validator(),
    }
}

fn testnet() -> ConfigRaw {
    ConfigRaw {
        environment: "testnet".to_string(),
        logger: logger("info"),
        telemetry: telemetry(false),
        http_api: http_api(),
        repository: repository(None, 20),
        blockchain: blockchain("grid-testchain", "https://testchain.metamemo.one:24180", 3),
        chain_events: chain_events(),
        validator: validator(),
    }
}

fn mainnet() -> ConfigRaw {
    ConfigRaw {
        environment: "mainnet".to_string(),
        logger: logger("info"),
        telemetry: telemetry(false),
        http_api: http_api(),
        repository: repository(None, 20),
        blockchain: blockchain("grid-mainchain", "https://chain.metamemo.one:8501", 6),
        chain_events: chain_events(),
        validator: validator(),
    }
}

#[cfg(test)]
mod tests {
    use figment::{Figment, providers::Serialized};

    use super::*;

    /// Verify that development defaults can round-trip through Figment.
    #[test]
    fn development_defaults_round_trip() {
        let config = config_for("development").expect("development defaults should resolve");
        let figment = Figment::from(Serialized::defaults(&config));
        let extracted: ConfigRaw = figment
            .extract()
            .expect("development defaults failed to extract");
        assert_eq!(extracted.environment, "development");
        assert!(extracted.telemetry.metrics.enabled);
        assert_eq!(extracted.blockchain.confirmations, 1);
        assert!(extracted.repository.url.is_some());
    }

    #[test]
    fn production_defaults_require_database_url() {
        for environment in ["testnet", "mainnet"] {
            let config = config_for(environment).expect("defaults should resolve");
            let extracted: ConfigRaw = Figment::from(Serialized::defaults(&config))
                .extract()
                .expect("defaults failed to extract");
            assert_eq!(extracted.environment, environment);
            assert!(extracted.repository.url.is_none());
            assert!(!extracted.telemetry.metrics.enabled);
        }
    }

    #[test]
    fn development_defaults_resolve() {
        let config = development().resolve().expect("development defaults are valid");
        assert_eq!(config.http_api.port, 8081);
        assert_eq!(
            config.blockchain.registry_contract_address.to_checksum(None),
            REGISTRY_CONTRACT_ADDRESS
        );
        assert_eq!(config.validator.difficulty_bits, 8);
        assert_eq!(config.validator.proof_queue_capacity, 100);
    }

    /// Verify that user TOML overrides merge correctly on top of typed defaults.
    #[test]
    fn user_toml_overrides_defaults() {
        use figment::providers::{Format, Toml};

        let defaults = config_for("development").expect("development defaults should resolve");
        let user_toml = r#"
            environment = "development"
            [validator]
            difficulty_bits = 12
            [blockchain]
            rpc_endpoints = ["http://localhost:8545"]
        "#;
        let figment = Figment::from(Serialized::defaults(&defaults)).merge(Toml::string(user_toml));
        let config: ConfigRaw = figment.extract().expect("merge failed");
        assert_eq!(config.validator.difficulty_bits, 12);
        assert_eq!(config.blockchain.rpc_endpoints, vec!["http://localhost:8545"]);
        // Other defaults should be preserved
        assert_eq!(config.http_api.port, 8081);
        assert_eq!(config.validator.cycle_secs, 120);
    }

    #[test]
    fn unknown_environment_returns_error() {
        let error = config_for("staging").expect_err("unknown env should fail");
        assert!(matches!(error, ConfigError::UnknownEnvironment(env) if env == "staging"));
    }
}
