//! Integration tests for the customer gRPC server over a loopback socket.

use std::net::SocketAddr;

use customer::InMemoryCustomerStore;
use proto::{CustomerServiceClient, GetCustomerRequest, UpsertCustomerRequest};
use tokio::sync::oneshot;
use tonic::Code;
use tonic::transport::Channel;
use tonic_health::pb::HealthCheckRequest;
use tonic_health::pb::health_check_response::ServingStatus;
use tonic_health::pb::health_client::HealthClient;

struct TestServer {
    addr: SocketAddr,
    store: InMemoryCustomerStore,
    _shutdown: oneshot::Sender<()>,
}

async fn start_server() -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let store = InMemoryCustomerStore::new();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let served = store.clone();
    tokio::spawn(async move {
        customer::serve(served, listener, async {
            let _ = shutdown_rx.await;
        })
        .await
        .unwrap();
    });

    TestServer {
        addr,
        store,
        _shutdown: shutdown_tx,
    }
}

async fn connect(addr: SocketAddr) -> Channel {
    Channel::from_shared(format!("http://{addr}"))
        .unwrap()
        .connect()
        .await
        .unwrap()
}

#[tokio::test]
async fn upsert_and_get_over_the_wire() {
    let server = start_server().await;
    let mut client = CustomerServiceClient::new(connect(server.addr).await);

    let created = client
        .upsert_customer(UpsertCustomerRequest {
            idn: "123456789012".to_string(),
        })
        .await
        .unwrap()
        .into_inner();
    let again = client
        .upsert_customer(UpsertCustomerRequest {
            idn: "123456789012".to_string(),
        })
        .await
        .unwrap()
        .into_inner();
    let loaded = client
        .get_customer(GetCustomerRequest {
            idn: "123456789012".to_string(),
        })
        .await
        .unwrap()
        .into_inner();

    assert_eq!(created.id, again.id);
    assert_eq!(created, loaded);
    assert_eq!(server.store.customer_count().await, 1);
}

#[tokio::test]
async fn error_codes_over_the_wire() {
    let server = start_server().await;
    let mut client = CustomerServiceClient::new(connect(server.addr).await);

    let empty = client
        .upsert_customer(UpsertCustomerRequest { idn: String::new() })
        .await
        .unwrap_err();
    assert_eq!(empty.code(), Code::InvalidArgument);

    let missing = client
        .get_customer(GetCustomerRequest {
            idn: "000000000000".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(missing.code(), Code::NotFound);
    assert_eq!(missing.message(), "customer not found");
}

#[tokio::test]
async fn health_reports_serving() {
    let server = start_server().await;
    let mut health = HealthClient::new(connect(server.addr).await);

    let response = health
        .check(HealthCheckRequest {
            service: "customer.v1.CustomerService".to_string(),
        })
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.status, ServingStatus::Serving as i32);
}
