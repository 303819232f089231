use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::CustomerId;

use crate::Result;

/// A customer row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub idn: String,
    pub created_at: DateTime<Utc>,
}

/// Persistence capability for customers.
///
/// Implementations own the `customers` table exclusively. All
/// implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Inserts a customer for `idn`, or returns the existing one.
    ///
    /// Must be atomic: concurrent upserts of the same IDN all succeed and
    /// return the same `id`, and leave exactly one row behind.
    async fn upsert_customer(&self, idn: &str) -> Result<Customer>;

    /// Looks a customer up by exact IDN match.
    ///
    /// Returns None if no row matches.
    async fn get_customer_by_idn(&self, idn: &str) -> Result<Option<Customer>>;
}
