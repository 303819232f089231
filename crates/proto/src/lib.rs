//! Generated types for the `customer.v1` gRPC service.
//!
//! Both sides of the customer RPC boundary depend on this crate: the
//! customer service implements [`customer_service_server::CustomerService`],
//! the shipment service calls it through
//! [`customer_service_client::CustomerServiceClient`].

tonic::include_proto!("customer.v1");

pub use customer_service_client::CustomerServiceClient;
pub use customer_service_server::{CustomerService, CustomerServiceServer};
