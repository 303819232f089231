use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use common::CustomerId;
use tokio::sync::RwLock;

use crate::Result;
use crate::error::CustomerError;
use crate::store::{Customer, CustomerStore};

/// In-memory customer store for testing.
///
/// Provides the same upsert semantics as the PostgreSQL implementation: the
/// existence check and insert happen under one write lock.
#[derive(Clone, Default)]
pub struct InMemoryCustomerStore {
    customers: Arc<RwLock<HashMap<String, Customer>>>,
    fail: Arc<AtomicBool>,
}

impl InMemoryCustomerStore {
    /// Creates a new empty in-memory customer store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail every call with a database error.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CustomerError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }

    /// Returns the total number of customers stored.
    pub async fn customer_count(&self) -> usize {
        self.customers.read().await.len()
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn upsert_customer(&self, idn: &str) -> Result<Customer> {
        self.check_available()?;
        let mut customers = self.customers.write().await;
        let customer = customers
            .entry(idn.to_string())
            .or_insert_with(|| Customer {
                id: CustomerId::new(),
                idn: idn.to_string(),
                created_at: Utc::now(),
            });
        Ok(customer.clone())
    }

    async fn get_customer_by_idn(&self, idn: &str) -> Result<Option<Customer>> {
        self.check_available()?;
        Ok(self.customers.read().await.get(idn).cloned())
    }
}
