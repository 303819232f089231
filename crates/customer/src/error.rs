use thiserror::Error;

/// Errors that can occur in the customer registry.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// No customer row matches the IDN.
    #[error("Customer not found: {0}")]
    NotFound(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for customer registry operations.
pub type Result<T> = std::result::Result<T, CustomerError>;
