//! Shipment create and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::ShipmentId;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::ApiError;
use crate::client::CustomerClient;
use crate::service::{CreateShipment, ShipmentService};
use crate::store::{Shipment, ShipmentStore};

/// Wire format of `created_at` in shipment responses.
const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Shared application state accessible from all handlers.
pub struct AppState<S: ShipmentStore, C: CustomerClient> {
    pub shipment_service: ShipmentService<S, C>,
}

// -- Request types --

// Missing and `null` fields both decode to the zero value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateShipmentRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub route: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub customer: CustomerRequest,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomerRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub idn: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// -- Response types --

#[derive(Serialize)]
pub struct ShipmentCreatedResponse {
    pub id: String,
    pub status: String,
    #[serde(rename = "customerId")]
    pub customer_id: String,
}

#[derive(Serialize)]
pub struct ShipmentResponse {
    pub id: String,
    pub route: String,
    pub price: f64,
    pub status: String,
    #[serde(rename = "customerId")]
    pub customer_id: String,
    pub created_at: String,
}

impl From<Shipment> for ShipmentResponse {
    fn from(shipment: Shipment) -> Self {
        Self {
            id: shipment.id.to_string(),
            route: shipment.route,
            price: shipment.price,
            status: shipment.status,
            customer_id: shipment.customer_id.to_string(),
            created_at: shipment.created_at.format(CREATED_AT_FORMAT).to_string(),
        }
    }
}

// -- Handlers --

/// POST /api/v1/shipments: create a shipment, provisioning the customer.
///
/// Every service failure, validation included, is answered with 500.
#[tracing::instrument(skip(state, body))]
pub async fn create<S: ShipmentStore + 'static, C: CustomerClient + 'static>(
    State(state): State<Arc<AppState<S, C>>>,
    body: Bytes,
) -> Result<(StatusCode, Json<ShipmentCreatedResponse>), ApiError> {
    tracing::info!("CreateShipment called");

    let req: CreateShipmentRequest = serde_json::from_slice(&body).map_err(|err| {
        tracing::error!(error = %err, "failed to decode request");
        ApiError::BadRequest("invalid request body")
    })?;

    let shipment = state
        .shipment_service
        .create_shipment(CreateShipment {
            route: req.route,
            price: req.price,
            idn: req.customer.idn,
        })
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "failed to create shipment");
            ApiError::Internal("failed to create shipment")
        })?;

    let response = ShipmentCreatedResponse {
        id: shipment.id.to_string(),
        status: shipment.status,
        customer_id: shipment.customer_id.to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/shipments/{id}: load a shipment by id.
#[tracing::instrument(skip(state))]
pub async fn get<S: ShipmentStore + 'static, C: CustomerClient + 'static>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(id): Path<String>,
) -> Result<Json<ShipmentResponse>, ApiError> {
    if id.is_empty() {
        return Err(ApiError::BadRequest("shipment id is required"));
    }

    tracing::info!("GetShipment request received");

    // An id that cannot exist is reported like any other missing shipment.
    let shipment_id: ShipmentId = id.parse().map_err(|err: common::InvalidId| {
        tracing::error!(error = %err, "failed to get shipment");
        ApiError::NotFound("shipment not found")
    })?;

    let shipment = state
        .shipment_service
        .get_shipment(shipment_id)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "failed to get shipment");
            ApiError::NotFound("shipment not found")
        })?;

    Ok(Json(shipment.into()))
}

/// GET /api/v1/shipments/: the id segment is missing.
pub async fn missing_id() -> ApiError {
    ApiError::BadRequest("shipment id is required")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use common::CustomerId;

    use super::*;

    #[test]
    fn request_fields_default_when_missing() {
        let req: CreateShipmentRequest = serde_json::from_str(r#"{"route":"A-B"}"#).unwrap();
        assert_eq!(req.route, "A-B");
        assert_eq!(req.price, 0.0);
        assert_eq!(req.customer.idn, "");
    }

    #[test]
    fn request_fields_default_when_null() {
        let req: CreateShipmentRequest = serde_json::from_str(
            r#"{"route":null,"price":null,"customer":{"idn":null}}"#,
        )
        .unwrap();
        assert_eq!(req.route, "");
        assert_eq!(req.price, 0.0);
        assert_eq!(req.customer.idn, "");

        let req: CreateShipmentRequest =
            serde_json::from_str(r#"{"route":"A-B","customer":null}"#).unwrap();
        assert_eq!(req.customer.idn, "");
    }

    #[test]
    fn request_rejects_wrong_types() {
        assert!(serde_json::from_str::<CreateShipmentRequest>(r#"{"price":"free"}"#).is_err());
        assert!(serde_json::from_str::<CreateShipmentRequest>(r#"{"customer":"x"}"#).is_err());
    }

    #[test]
    fn shipment_response_uses_wire_names() {
        let shipment = Shipment {
            id: ShipmentId::new(),
            route: "MSK-SPB".to_string(),
            price: 100.5,
            status: "created".to_string(),
            customer_id: CustomerId::new(),
            created_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        };
        let customer_id = shipment.customer_id.to_string();

        let json = serde_json::to_value(ShipmentResponse::from(shipment)).unwrap();

        assert_eq!(json["customerId"], customer_id);
        assert_eq!(json["created_at"], "2024-03-01T12:30:00Z");
        assert_eq!(json["price"], 100.5);
        assert!(json.get("customer_id").is_none());
    }
}
