//! Shared building blocks for the customer and shipment services.
//!
//! - Identifier value types ([`Idn`], [`CustomerId`], [`ShipmentId`])
//! - Wire timestamp formatting
//! - Process bootstrap helpers: environment lookups, tracing setup, database
//!   connection retry, shutdown signal handling
//! - Trace context propagation between the two services

pub mod db;
pub mod env;
pub mod shutdown;
pub mod telemetry;
pub mod time;
pub mod trace_context;
pub mod types;

pub use types::{CustomerId, Idn, InvalidId, InvalidIdn, ShipmentId};
