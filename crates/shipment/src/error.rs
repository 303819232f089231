//! Shipment domain error types.

use common::InvalidIdn;
use thiserror::Error;

/// Input rejected before any remote or store call is made.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Idn(#[from] InvalidIdn),

    #[error("invalid price: must be a non-negative number, got {0}")]
    Price(f64),
}

/// Errors that can occur during shipment operations.
#[derive(Debug, Error)]
pub enum ShipmentError {
    /// The request failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No shipment exists with the given id.
    #[error("Shipment not found: {0}")]
    NotFound(String),

    /// The customer service call failed.
    #[error("Customer service error: {0}")]
    Upstream(Box<tonic::Status>),

    /// The customer service answered with data that could not be decoded.
    #[error("Customer service returned malformed data: {0}")]
    MalformedCustomer(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl ShipmentError {
    /// Returns true if the error was raised by input validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, ShipmentError::Validation(_))
    }
}

impl From<tonic::Status> for ShipmentError {
    fn from(status: tonic::Status) -> Self {
        ShipmentError::Upstream(Box::new(status))
    }
}

impl From<InvalidIdn> for ShipmentError {
    fn from(err: InvalidIdn) -> Self {
        ShipmentError::Validation(ValidationError::Idn(err))
    }
}

/// Result type for shipment operations.
pub type Result<T> = std::result::Result<T, ShipmentError>;
