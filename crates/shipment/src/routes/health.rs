//! Liveness endpoint for the shipment HTTP server.

use axum::Json;
use serde::Serialize;

const SERVICE_NAME: &str = "shipment-service";

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub service: &'static str,
}

/// GET /health: answers as long as the process can serve HTTP.
///
/// Neither the database nor the customer service is consulted, so a 200
/// here says nothing about whether a create would succeed.
pub async fn check() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        service: SERVICE_NAME,
    })
}
