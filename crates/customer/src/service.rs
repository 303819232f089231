//! Customer domain logic.

use crate::store::{Customer, CustomerStore};
use crate::{CustomerError, Result};

/// Service for managing customers.
///
/// Currently a pass-through to the store; business rules for customers
/// belong here rather than in the gRPC endpoint.
pub struct CustomerService<S: CustomerStore> {
    store: S,
}

impl<S: CustomerStore> CustomerService<S> {
    /// Creates a new customer service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the customer for `idn`, creating it first if absent.
    #[tracing::instrument(skip(self))]
    pub async fn upsert_customer(&self, idn: &str) -> Result<Customer> {
        let customer = self.store.upsert_customer(idn).await?;
        metrics::counter!("customers_upserted_total").increment(1);
        Ok(customer)
    }

    /// Loads a customer by IDN.
    #[tracing::instrument(skip(self))]
    pub async fn get_customer(&self, idn: &str) -> Result<Customer> {
        self.store
            .get_customer_by_idn(idn)
            .await?
            .ok_or_else(|| CustomerError::NotFound(idn.to_string()))
    }
}
