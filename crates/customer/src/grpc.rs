//! gRPC endpoint for the customer registry.

use proto::customer_service_server::CustomerService as CustomerRpc;
use proto::{CustomerResponse, CustomerServiceServer, GetCustomerRequest, UpsertCustomerRequest};
use tonic::{Request, Response, Status};

use crate::service::CustomerService;
use crate::store::{Customer, CustomerStore};

/// Adapts [`CustomerService`] to the generated `customer.v1.CustomerService`
/// gRPC trait.
///
/// Domain errors never reach the caller verbatim: they are logged here and
/// replaced with a fixed status code and message.
pub struct CustomerGrpcServer<S: CustomerStore> {
    service: CustomerService<S>,
}

impl<S: CustomerStore + 'static> CustomerGrpcServer<S> {
    /// Creates a new endpoint around a customer service.
    pub fn new(service: CustomerService<S>) -> Self {
        Self { service }
    }

    /// Wraps the endpoint in the generated tonic service.
    pub fn into_server(self) -> CustomerServiceServer<Self> {
        CustomerServiceServer::new(self)
    }
}

fn to_response(customer: Customer) -> CustomerResponse {
    CustomerResponse {
        id: customer.id.to_string(),
        idn: customer.idn,
        created_at: common::time::format_rfc3339(customer.created_at),
    }
}

#[tonic::async_trait]
impl<S: CustomerStore + 'static> CustomerRpc for CustomerGrpcServer<S> {
    #[tracing::instrument(skip_all, fields(rpc = "UpsertCustomer", idn, trace_id))]
    async fn upsert_customer(
        &self,
        request: Request<UpsertCustomerRequest>,
    ) -> Result<Response<CustomerResponse>, Status> {
        let span = tracing::Span::current();
        common::trace_context::accept_from_metadata(&span, request.metadata());
        let idn = request.into_inner().idn;
        span.record("idn", idn.as_str());
        tracing::info!("UpsertCustomer called");

        if idn.is_empty() {
            return Err(Status::invalid_argument("idn is required"));
        }

        let customer = self.service.upsert_customer(&idn).await.map_err(|err| {
            tracing::error!(error = %err, "failed to upsert customer");
            Status::internal("failed to upsert customer")
        })?;

        tracing::info!(id = %customer.id, "customer upserted");
        Ok(Response::new(to_response(customer)))
    }

    #[tracing::instrument(skip_all, fields(rpc = "GetCustomer", idn, trace_id))]
    async fn get_customer(
        &self,
        request: Request<GetCustomerRequest>,
    ) -> Result<Response<CustomerResponse>, Status> {
        let span = tracing::Span::current();
        common::trace_context::accept_from_metadata(&span, request.metadata());
        let idn = request.into_inner().idn;
        span.record("idn", idn.as_str());
        tracing::info!("GetCustomer called");

        if idn.is_empty() {
            return Err(Status::invalid_argument("idn is required"));
        }

        // Every failure, including database errors, is reported as NotFound.
        let customer = self.service.get_customer(&idn).await.map_err(|err| {
            tracing::error!(error = %err, "failed to get customer");
            Status::not_found("customer not found")
        })?;

        Ok(Response::new(to_response(customer)))
    }
}
