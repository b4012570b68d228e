use thiserror::Error;

/// Error types for repository/database operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database error - wraps all SeaORM errors
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    /// Record not found error
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A numeric column holds a value that does not fit its domain type.
    #[error("Invalid numeric value for {field}: {value}")]
    InvalidNumeric { field: &'static str, value: String },

    #[error("Invalid address stored: {0}")]
    InvalidAddress(String),
}

/// Convenient Result type alias for RepositoryError
pub type Result<T> = std::result::Result<T, RepositoryError>;
