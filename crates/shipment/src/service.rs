//! Shipment domain logic.

use common::{Idn, ShipmentId};

use crate::client::CustomerClient;
use crate::error::{Result, ShipmentError, ValidationError};
use crate::store::{NewShipment, Shipment, ShipmentStore};

/// Input for creating a shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateShipment {
    pub route: String,
    pub price: f64,
    pub idn: String,
}

/// Service for creating and loading shipments.
///
/// Creating a shipment is a three-step chain: validate the input, resolve
/// the customer through the customer service (creating it if needed), then
/// insert the shipment. Any failing step ends the chain. A customer created
/// in step two stays in place if the insert in step three fails.
pub struct ShipmentService<S: ShipmentStore, C: CustomerClient> {
    store: S,
    customers: C,
}

impl<S: ShipmentStore, C: CustomerClient> ShipmentService<S, C> {
    /// Creates a new shipment service.
    pub fn new(store: S, customers: C) -> Self {
        Self { store, customers }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the customer client.
    pub fn customers(&self) -> &C {
        &self.customers
    }

    /// Creates a shipment for the customer identified by `cmd.idn`.
    #[tracing::instrument(skip(self))]
    pub async fn create_shipment(&self, cmd: CreateShipment) -> Result<Shipment> {
        match self.try_create_shipment(cmd).await {
            Ok(shipment) => {
                metrics::counter!("shipments_created_total").increment(1);
                tracing::info!(id = %shipment.id, customer_id = %shipment.customer_id, "shipment created");
                Ok(shipment)
            }
            Err(err) => {
                metrics::counter!("shipments_failed_total").increment(1);
                Err(err)
            }
        }
    }

    async fn try_create_shipment(&self, cmd: CreateShipment) -> Result<Shipment> {
        // 1. Validate
        let idn = Idn::parse(&cmd.idn)?;
        validate_price(cmd.price)?;

        // 2. Resolve customer
        let customer_id = self.customers.upsert_customer(&idn).await?;

        // 3. Persist
        self.store
            .insert_shipment(NewShipment {
                route: cmd.route,
                price: cmd.price,
                customer_id,
            })
            .await
    }

    /// Loads a shipment by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_shipment(&self, id: ShipmentId) -> Result<Shipment> {
        self.store
            .get_shipment(id)
            .await?
            .ok_or_else(|| ShipmentError::NotFound(id.to_string()))
    }
}

fn validate_price(price: f64) -> std::result::Result<(), ValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Price(price))
    }
}
