use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use common::ShipmentId;
use tokio::sync::RwLock;

use crate::Result;
use crate::error::ShipmentError;
use crate::store::{DEFAULT_STATUS, NewShipment, Shipment, ShipmentStore};

/// In-memory shipment store for testing.
///
/// Does not check that `customer_id` refers to an existing customer.
#[derive(Clone, Default)]
pub struct InMemoryShipmentStore {
    shipments: Arc<RwLock<HashMap<ShipmentId, Shipment>>>,
    fail_on_insert: Arc<AtomicBool>,
}

impl InMemoryShipmentStore {
    /// Creates a new empty in-memory shipment store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail every insert with a database error.
    pub fn set_fail_on_insert(&self, fail: bool) {
        self.fail_on_insert.store(fail, Ordering::SeqCst);
    }

    /// Returns the total number of shipments stored.
    pub async fn shipment_count(&self) -> usize {
        self.shipments.read().await.len()
    }
}

#[async_trait]
impl ShipmentStore for InMemoryShipmentStore {
    async fn insert_shipment(&self, shipment: NewShipment) -> Result<Shipment> {
        if self.fail_on_insert.load(Ordering::SeqCst) {
            return Err(ShipmentError::Database(sqlx::Error::PoolClosed));
        }

        let stored = Shipment {
            id: ShipmentId::new(),
            route: shipment.route,
            price: shipment.price,
            status: DEFAULT_STATUS.to_string(),
            customer_id: shipment.customer_id,
            created_at: Utc::now(),
        };
        self.shipments
            .write()
            .await
            .insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_shipment(&self, id: ShipmentId) -> Result<Option<Shipment>> {
        Ok(self.shipments.read().await.get(&id).cloned())
    }
}
