//! Customer registry service.
//!
//! Stores customers keyed by IDN and exposes `UpsertCustomer` / `GetCustomer`
//! over gRPC. Layers, leaf-first:
//! - [`CustomerStore`] with PostgreSQL and in-memory implementations
//! - [`CustomerService`] domain logic
//! - [`CustomerGrpcServer`] endpoint

pub mod config;
pub mod error;
pub mod grpc;
pub mod memory;
pub mod postgres;
pub mod service;
pub mod store;

pub use error::{CustomerError, Result};
pub use grpc::CustomerGrpcServer;
pub use memory::InMemoryCustomerStore;
pub use postgres::PostgresCustomerStore;
pub use service::CustomerService;
pub use store::{Customer, CustomerStore};

use proto::CustomerServiceServer;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;

/// Serves the customer gRPC API and the standard health service on
/// `listener` until `shutdown` resolves.
pub async fn serve<S, F>(
    store: S,
    listener: TcpListener,
    shutdown: F,
) -> std::result::Result<(), tonic::transport::Error>
where
    S: CustomerStore + 'static,
    F: std::future::Future<Output = ()> + Send,
{
    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<CustomerServiceServer<CustomerGrpcServer<S>>>()
        .await;

    let endpoint = CustomerGrpcServer::new(CustomerService::new(store));

    tonic::transport::Server::builder()
        .add_service(health_service)
        .add_service(endpoint.into_server())
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}
