//! Shipment service entry point.

use shipment::config::Config;
use shipment::{GrpcCustomerClient, PostgresShipmentStore};

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    let telemetry = common::telemetry::init("shipment-service", &config.log_level)
        .expect("failed to initialize tracing");

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Connect to the database and apply migrations
    let pool = common::db::connect_with_retry(
        &config.database_url,
        10,
        config.db_connect_attempts,
        common::db::CONNECT_RETRY_DELAY,
    )
    .await
    .expect("failed to connect to database");
    let store = PostgresShipmentStore::new(pool.clone());
    store
        .run_migrations()
        .await
        .expect("failed to run migrations");

    // 4. Customer service client
    let customers = GrpcCustomerClient::connect_lazy(&config.customer_service_target)
        .expect("invalid customer service target");

    // 5. Build the application
    let state = shipment::create_state(store, customers);
    let app = shipment::create_app(state, metrics_handle);

    // 6. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(common::shutdown::signal())
        .await
        .expect("server error");

    pool.close().await;
    tracing::info!("server shut down gracefully");
    telemetry.shutdown();
}
