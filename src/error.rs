use thiserror::Error;

/// Top-level application error that composes all subsystem errors
#[derive(Error, Debug)]
pub(crate) enum NodeError {
    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Blockchain RPC and signing errors
    #[error("Blockchain error: {0}")]
    Blockchain(#[from] grid_blockchain::BlockchainError),

    /// Chain event decoding errors
    #[error("Event decode error: {0}")]
    EventDecode(#[from] grid_blockchain::EventDecodeError),

    /// Database/repository errors
    #[error("Repository error: {0}")]
    Repository(#[from] grid_repository::RepositoryError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic application error
    #[error("{0}")]
    Other(String),
}
