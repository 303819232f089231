//! Customer service entry point.

use customer::PostgresCustomerStore;
use customer::config::Config;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    let telemetry = common::telemetry::init("customer-service", &config.log_level)
        .expect("failed to initialize tracing");

    // 2. Install Prometheus metrics recorder with its own scrape listener
    let metrics_addr: std::net::SocketAddr = config
        .metrics_addr()
        .parse()
        .expect("invalid metrics address");
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
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
    let store = PostgresCustomerStore::new(pool);
    store
        .run_migrations()
        .await
        .expect("failed to run migrations");

    // 4. Start server
    let addr = config.grpc_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    tracing::info!(%addr, %metrics_addr, "starting gRPC server");

    customer::serve(store.clone(), listener, common::shutdown::signal())
        .await
        .expect("server error");

    store.pool().close().await;
    tracing::info!("server shut down gracefully");
    telemetry.shutdown();
}
