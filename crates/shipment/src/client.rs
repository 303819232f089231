//! Customer service client trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CustomerId, Idn};
use tonic::{Code, Status};

use crate::Result;

/// A customer record as returned by the customer service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCustomer {
    pub id: CustomerId,
    pub idn: String,
    pub created_at: DateTime<Utc>,
}

/// Calls into the customer registry.
///
/// Implementations never retry: a failed call is reported to the caller as
/// is.
#[async_trait]
pub trait CustomerClient: Send + Sync {
    /// Resolves the customer for `idn`, creating it if absent, and returns
    /// its id.
    async fn upsert_customer(&self, idn: &Idn) -> Result<CustomerId>;

    /// Returns the full customer record for `idn`.
    async fn get_customer(&self, idn: &Idn) -> Result<RemoteCustomer>;
}

#[derive(Debug, Default)]
struct InMemoryCustomerState {
    customers: HashMap<String, RemoteCustomer>,
    upsert_calls: usize,
    fail_with: Option<Code>,
}

/// In-memory customer client for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerClient {
    state: Arc<RwLock<InMemoryCustomerState>>,
}

impl InMemoryCustomerClient {
    /// Creates a new in-memory customer client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures every subsequent call to fail with the given status code,
    /// or to succeed again when `None`.
    pub fn set_failure(&self, code: Option<Code>) {
        self.state.write().unwrap().fail_with = code;
    }

    /// Returns the number of `upsert_customer` calls received.
    pub fn upsert_calls(&self) -> usize {
        self.state.read().unwrap().upsert_calls
    }

    /// Returns the number of distinct customers known.
    pub fn customer_count(&self) -> usize {
        self.state.read().unwrap().customers.len()
    }
}

#[async_trait]
impl CustomerClient for InMemoryCustomerClient {
    async fn upsert_customer(&self, idn: &Idn) -> Result<CustomerId> {
        let mut state = self.state.write().unwrap();
        state.upsert_calls += 1;

        if let Some(code) = state.fail_with {
            return Err(Status::new(code, "customer service unavailable").into());
        }

        let customer = state
            .customers
            .entry(idn.as_str().to_string())
            .or_insert_with(|| RemoteCustomer {
                id: CustomerId::new(),
                idn: idn.as_str().to_string(),
                created_at: Utc::now(),
            });
        Ok(customer.id)
    }

    async fn get_customer(&self, idn: &Idn) -> Result<RemoteCustomer> {
        let state = self.state.read().unwrap();

        if let Some(code) = state.fail_with {
            return Err(Status::new(code, "customer service unavailable").into());
        }

        state
            .customers
            .get(idn.as_str())
            .cloned()
            .ok_or_else(|| Status::not_found("customer not found").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShipmentError;

    fn idn() -> Idn {
        Idn::parse("123456789012").unwrap()
    }

    #[tokio::test]
    async fn upsert_is_stable_per_idn() {
        let client = InMemoryCustomerClient::new();

        let first = client.upsert_customer(&idn()).await.unwrap();
        let second = client.upsert_customer(&idn()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.upsert_calls(), 2);
        assert_eq!(client.customer_count(), 1);
    }

    #[tokio::test]
    async fn get_returns_upserted_record() {
        let client = InMemoryCustomerClient::new();

        let id = client.upsert_customer(&idn()).await.unwrap();
        let customer = client.get_customer(&idn()).await.unwrap();

        assert_eq!(customer.id, id);
        assert_eq!(customer.idn, "123456789012");
    }

    #[tokio::test]
    async fn failure_is_reported_as_upstream() {
        let client = InMemoryCustomerClient::new();
        client.set_failure(Some(Code::Unavailable));

        let err = client.upsert_customer(&idn()).await.unwrap_err();
        assert!(
            matches!(err, ShipmentError::Upstream(ref status) if status.code() == Code::Unavailable)
        );
        assert_eq!(client.customer_count(), 0);
    }
}
