//! gRPC implementation of [`CustomerClient`].

use async_trait::async_trait;
use common::{CustomerId, Idn};
use proto::{CustomerResponse, CustomerServiceClient, GetCustomerRequest, UpsertCustomerRequest};
use tonic::transport::{Channel, Endpoint};

use crate::client::{CustomerClient, RemoteCustomer};
use crate::{Result, ShipmentError};

/// Customer client talking to the customer service over gRPC.
#[derive(Debug, Clone)]
pub struct GrpcCustomerClient {
    client: CustomerServiceClient<Channel>,
}

impl GrpcCustomerClient {
    /// Creates a client over an existing channel.
    pub fn new(channel: Channel) -> Self {
        Self {
            client: CustomerServiceClient::new(channel),
        }
    }

    /// Creates a client for `target` without connecting yet.
    ///
    /// `target` may be a bare `host:port`; `http://` is assumed then. The
    /// connection is established on first use, so the customer service does
    /// not have to be up when the shipment service starts.
    pub fn connect_lazy(target: &str) -> std::result::Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(endpoint_uri(target))?.connect_lazy();
        tracing::info!(%target, "customer client configured");
        Ok(Self::new(channel))
    }
}

/// Adds an `http://` scheme to targets given as `host:port`.
pub fn endpoint_uri(target: &str) -> String {
    if target.contains("://") {
        target.to_string()
    } else {
        format!("http://{target}")
    }
}

/// Wraps `message` in a request carrying the current trace context.
fn traced<T>(message: T) -> tonic::Request<T> {
    let mut request = tonic::Request::new(message);
    common::trace_context::inject(request.metadata_mut());
    request
}

fn parse_customer_id(raw: &str) -> Result<CustomerId> {
    raw.parse()
        .map_err(|e: common::InvalidId| ShipmentError::MalformedCustomer(e.to_string()))
}

fn to_remote_customer(response: CustomerResponse) -> Result<RemoteCustomer> {
    let created_at = common::time::parse_rfc3339(&response.created_at).map_err(|e| {
        ShipmentError::MalformedCustomer(format!(
            "invalid created_at {:?}: {e}",
            response.created_at
        ))
    })?;

    Ok(RemoteCustomer {
        id: parse_customer_id(&response.id)?,
        idn: response.idn,
        created_at,
    })
}

#[async_trait]
impl CustomerClient for GrpcCustomerClient {
    #[tracing::instrument(skip(self), fields(rpc = "UpsertCustomer"), err)]
    async fn upsert_customer(&self, idn: &Idn) -> Result<CustomerId> {
        let mut client = self.client.clone();
        let response = client
            .upsert_customer(traced(UpsertCustomerRequest {
                idn: idn.as_str().to_string(),
            }))
            .await?;

        parse_customer_id(&response.into_inner().id)
    }

    #[tracing::instrument(skip(self), fields(rpc = "GetCustomer"), err)]
    async fn get_customer(&self, idn: &Idn) -> Result<RemoteCustomer> {
        let mut client = self.client.clone();
        let response = client
            .get_customer(traced(GetCustomerRequest {
                idn: idn.as_str().to_string(),
            }))
            .await?;

        to_remote_customer(response.into_inner())
    }
}
