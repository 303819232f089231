//! Shipment registry service.
//!
//! Exposes a JSON HTTP API for creating and loading shipments. Creating a
//! shipment resolves (or provisions) the customer through the customer
//! service's gRPC API before the shipment row is written.

pub mod client;
pub mod config;
pub mod error;
pub mod grpc_client;
pub mod memory;
pub mod postgres;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use client::{CustomerClient, InMemoryCustomerClient, RemoteCustomer};
pub use error::{Result, ShipmentError, ValidationError};
pub use grpc_client::GrpcCustomerClient;
pub use memory::InMemoryShipmentStore;
pub use postgres::PostgresShipmentStore;
pub use routes::shipments::AppState;
pub use service::{CreateShipment, ShipmentService};
pub use store::{NewShipment, Shipment, ShipmentStore};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, C>(state: Arc<AppState<S, C>>, metrics_handle: PrometheusHandle) -> Router
where
    S: ShipmentStore + 'static,
    C: CustomerClient + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/api/v1/shipments", post(routes::shipments::create::<S, C>))
        .route("/api/v1/shipments/", get(routes::shipments::missing_id))
        .route("/api/v1/shipments/{id}", get(routes::shipments::get::<S, C>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
}

/// Root span for an HTTP request, parented on the caller's `traceparent`.
fn request_span(request: &axum::http::Request<axum::body::Body>) -> tracing::Span {
    let span = tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        trace_id = tracing::field::Empty,
    );
    common::trace_context::accept_from_headers(&span, request.headers());
    span
}

/// Creates the application state from a store and a customer client.
pub fn create_state<S, C>(store: S, customers: C) -> Arc<AppState<S, C>>
where
    S: ShipmentStore,
    C: CustomerClient,
{
    Arc::new(AppState {
        shipment_service: ShipmentService::new(store, customers),
    })
}
