use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CustomerId, ShipmentId};

use crate::Result;

/// Status assigned by the store to every new shipment.
pub const DEFAULT_STATUS: &str = "created";

/// A persisted shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub id: ShipmentId,
    pub route: String,
    pub price: f64,
    pub status: String,
    pub customer_id: CustomerId,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields of a shipment about to be inserted.
///
/// `id`, `status` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShipment {
    pub route: String,
    pub price: f64,
    pub customer_id: CustomerId,
}

/// Persistence capability for shipments.
///
/// Implementations own the `shipments` table exclusively. All
/// implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait ShipmentStore: Send + Sync {
    /// Inserts a shipment and returns the stored row.
    async fn insert_shipment(&self, shipment: NewShipment) -> Result<Shipment>;

    /// Retrieves a shipment by id.
    ///
    /// Returns None if no row matches.
    async fn get_shipment(&self, id: ShipmentId) -> Result<Option<Shipment>>;
}
