use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Ledger database settings.
///
/// **Secret handling**: the connection URL may carry credentials. It is resolved
/// from configuration or from the `DATABASE_URL` environment variable.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct RepositoryManagerConfigRaw {
    /// sea-orm connection URL (`sqlite://...` or `mysql://...`).
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl RepositoryManagerConfigRaw {
    pub fn resolve(self) -> Result<RepositoryManagerConfig, ConfigError> {
        let url = self.url.ok_or_else(|| {
            ConfigError::MissingSecret("DATABASE_URL env var or repository.url required".to_string())
        })?;

        if !(url.starts_with("sqlite:") || url.starts_with("mysql:")) {
            return Err(ConfigError::InvalidConfig(
                "repository.url must be a sqlite or mysql connection URL".to_string(),
            ));
        }
        if self.max_connections == 0 || self.min_connections > self.max_connections {
            return Err(ConfigError::InvalidConfig(format!(
                "invalid connection pool bounds: min {} max {}",
                self.min_connections, self.max_connections
            )));
        }

        Ok(RepositoryManagerConfig {
            url,
            max_connections: self.max_connections,
            min_connections: self.min_connections,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RepositoryManagerConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl RepositoryManagerConfig {
    pub fn connection_string(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_url_is_a_missing_secret() {
        let raw = RepositoryManagerConfigRaw {
            url: None,
            max_connections: 5,
            min_connections: 1,
        };
        assert!(matches!(raw.resolve(), Err(ConfigError::MissingSecret(_))));
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let raw = RepositoryManagerConfigRaw {
            url: Some("postgres://localhost/grid".to_string()),
            max_connections: 5,
            min_connections: 1,
        };
        assert!(matches!(raw.resolve(), Err(ConfigError::InvalidConfig(_))));
    }
}
