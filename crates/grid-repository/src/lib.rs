mod config;
mod config_error;
pub mod error;
mod manager;
mod migrations;
mod models;
mod observability;
mod repositories;

pub use config::{RepositoryManagerConfig, RepositoryManagerConfigRaw};
pub use config_error::ConfigError;
pub use error::RepositoryError;
pub use manager::RepositoryManager;
pub use repositories::{
    checkpoint_repository::CheckpointRepository, node_repository::NodeRepository,
    order_repository::OrderRepository, profit_repository::ProfitRepository,
    provider_repository::ProviderRepository,
};
