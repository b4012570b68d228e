use std::path::Path;

use clap::{Arg, Command};
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::Deserialize;

use super::{Config, ConfigRaw, defaults};
use crate::config::ConfigError;

/// Environment variables that override secret config keys.
const SECRET_ENV_VARS: [(&str, &str); 2] = [
    ("VALIDATOR_PRIVATE_KEY", "validator.private_key"),
    ("DATABASE_URL", "repository.url"),
];

#[derive(Debug, Deserialize)]
struct EnvironmentConfig {
    environment: Option<String>,
}

/// Command-line values that override every file layer.
#[derive(Debug, Default)]
struct CliOverrides {
    /// Chain name (`dev`, `test`, `product`) or environment name.
    chain: Option<String>,
    /// HTTP listen address such as `:8081` or `0.0.0.0:8081`.
    endpoint: Option<String>,
}

pub(crate) fn initialize_configuration() -> Result<Config, ConfigError> {
    let matches = Command::new("grid-validator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validator node for a decentralized compute marketplace")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file (.toml format)"),
        )
        .arg(
            Arg::new("chain")
                .long("chain")
                .value_name("NAME")
                .help("Selects the chain: dev, test or product (or an environment name)"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .value_name("ADDR")
                .help("HTTP API listen address, e.g. :8081"),
        )
        .get_matches();

    let custom_config_path = matches.get_one::<String>("config").map(String::as_str);
    let overrides = CliOverrides {
        chain: matches.get_one::<String>("chain").cloned(),
        endpoint: matches.get_one::<String>("endpoint").cloned(),
    };
    load_configuration(custom_config_path, &overrides, |name| std::env::var(name).ok())
}

fn load_configuration(
    custom_config_path: Option<&str>,
    overrides: &CliOverrides,
    env_var: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let node_env = resolve_environment(custom_config_path, overrides.chain.as_deref())?;

    tracing::info!("Loading configuration for environment: {}", node_env);

    // Build configuration with layered sources (priority: lowest to highest)
    let mut figment = Figment::from(Serialized::defaults(defaults::config_for(&node_env)?));

    // User overrides from config.toml
    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    // If custom config file is provided, merge it with highest priority
    if let Some(config_path) = custom_config_path {
        tracing::info!("Loading custom config file: {}", config_path);
        figment = figment.merge(Toml::file(config_path));
    }

    let figment = with_cli_overrides(with_secrets(figment, env_var), &node_env, overrides)?;
    let config = extract(figment, &node_env)?;

    tracing::info!("Configuration loaded successfully");

    config.resolve()
}

/// Command-line flags win over files and environment secrets.
fn with_cli_overrides(
    mut figment: Figment,
    node_env: &str,
    overrides: &CliOverrides,
) -> Result<Figment, ConfigError> {
    if overrides.chain.is_some() {
        figment = figment.merge(Serialized::default("environment", node_env));
    }
    if let Some(endpoint) = overrides.endpoint.as_deref() {
        figment = figment.merge(Serialized::default("http_api.port", listen_port(endpoint)?));
    }
    Ok(figment)
}

/// Port of a `host:port` or `:port` listen address.
fn listen_port(endpoint: &str) -> Result<u16, ConfigError> {
    endpoint
        .rsplit_once(':')
        .map_or(endpoint, |(_, port)| port)
        .parse()
        .map_err(|_| ConfigError::InvalidConfig(format!("invalid listen endpoint '{endpoint}'")))
}

/// Maps a chain name to the environment carrying its defaults.
fn environment_for_chain(chain: &str) -> Result<String, ConfigError> {
    let env = match normalize_env(chain.to_string()).as_str() {
        "dev" | "development" => "development",
        "test" | "testnet" => "testnet",
        "product" | "mainnet" => "mainnet",
        _ => return Err(ConfigError::UnknownEnvironment(chain.to_string())),
    };
    Ok(env.to_string())
}

/// Secrets from the environment win over every file layer.
fn with_secrets(mut figment: Figment, env_var: impl Fn(&str) -> Option<String>) -> Figment {
    for (name, key) in SECRET_ENV_VARS {
        if let Some(value) = env_var(name).filter(|value| !value.trim().is_empty()) {
            figment = figment.merge(Serialized::default(key, value));
        }
    }
    figment
}

fn extract(figment: Figment, node_env: &str) -> Result<ConfigRaw, ConfigError> {
    let config: ConfigRaw = figment.extract().map_err(Box::new)?;
    if config.environment != node_env {
        return Err(ConfigError::UnknownEnvironment(format!(
            "config environment '{}' does not match selected '{}'",
            config.environment, node_env
        )));
    }
    Ok(config)
}

fn resolve_environment(
    custom_config_path: Option<&str>,
    chain: Option<&str>,
) -> Result<String, ConfigError> {
    let config_path = custom_config_path.unwrap_or("config.toml");

    // With --chain the default config.toml may be absent; an explicit -c file may not.
    let config_exists = Path::new(config_path).exists();
    if !config_exists && (custom_config_path.is_some() || chain.is_none()) {
        return Err(ConfigError::MissingConfig(config_path.to_string()));
    }

    if let Some(chain) = chain {
        return environment_for_chain(chain);
    }

    let env = read_environment_from(config_path).ok_or_else(|| {
        ConfigError::MissingEnvironment(
            "set environment = \"development|testnet|mainnet\" in your config".to_string(),
        )
    })?;

    if !matches!(env.as_str(), "development" | "testnet" | "mainnet") {
        return Err(ConfigError::UnknownEnvironment(env));
    }

    Ok(env)
}

fn read_environment_from(path: &str) -> Option<String> {
    Figment::from(Toml::file(path))
        .extract::<EnvironmentConfig>()
        .ok()
        .and_then(|config| config.environment)
        .map(normalize_env)
}

fn normalize_env(env: String) -> String {
    env.trim().to_lowercase()
}
