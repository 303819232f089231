//! Shipment HTTP API wired to a real customer gRPC server on loopback.

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use customer::{CustomerStore, InMemoryCustomerStore};
use shipment::{GrpcCustomerClient, InMemoryShipmentStore};
use tokio::sync::oneshot;
use tower::ServiceExt;

struct CustomerServer {
    addr: SocketAddr,
    store: InMemoryCustomerStore,
    _shutdown: oneshot::Sender<()>,
}

async fn start_customer_server() -> CustomerServer {
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

    CustomerServer {
        addr,
        store,
        _shutdown: shutdown_tx,
    }
}

fn app(target: &str) -> axum::Router {
    let customers = GrpcCustomerClient::connect_lazy(target).unwrap();
    let state = shipment::create_state(InMemoryShipmentStore::new(), customers);
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .build_recorder()
        .handle();
    shipment::create_app(state, metrics_handle)
}

fn post_shipment(route: &str, price: f64, idn: &str) -> Request<Body> {
    let body = serde_json::json!({
        "route": route,
        "price": price,
        "customer": { "idn": idn }
    });
    Request::builder()
        .method("POST")
        .uri("/api/v1/shipments")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn create_provisions_customer_over_grpc() {
    let server = start_customer_server().await;
    let app = app(&server.addr.to_string());

    let response = app
        .clone()
        .oneshot(post_shipment("MSK-SPB", 100.5, "123456789012"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;

    let customer = server
        .store
        .get_customer_by_idn("123456789012")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created["customerId"], customer.id.to_string());

    // A second shipment for the same IDN reuses the customer.
    let response = app
        .oneshot(post_shipment("SPB-MSK", 80.0, "123456789012"))
        .await
        .unwrap();
    let second = json_body(response).await;
    assert_eq!(second["customerId"], created["customerId"]);
    assert_eq!(server.store.customer_count().await, 1);
}

#[tokio::test]
async fn invalid_idn_never_reaches_customer_service() {
    let server = start_customer_server().await;
    let app = app(&format!("http://{}", server.addr));

    let response = app
        .oneshot(post_shipment("X", 1.0, "abc"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(server.store.customer_count().await, 0);
}

#[tokio::test]
async fn unreachable_customer_service_fails_create() {
    // Bind and drop to get a port nobody listens on.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let app = app(&addr.to_string());

    let response = app
        .oneshot(post_shipment("MSK-SPB", 100.5, "123456789012"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "error": "failed to create shipment" })
    );
}
