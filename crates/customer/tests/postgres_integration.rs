//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p customer --test postgres_integration
//! ```

use std::sync::Arc;

use customer::{CustomerService, CustomerStore, PostgresCustomerStore};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresCustomerStore::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresCustomerStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE shipments, customers")
        .execute(&pool)
        .await
        .unwrap();

    PostgresCustomerStore::new(pool)
}

async fn customer_rows(store: &PostgresCustomerStore, idn: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE idn = $1")
        .bind(idn)
        .fetch_one(store.pool())
        .await
        .unwrap()
}

#[tokio::test]
#[serial]
async fn upsert_inserts_new_customer() {
    let store = get_test_store().await;

    let customer = store.upsert_customer("123456789012").await.unwrap();

    assert_eq!(customer.idn, "123456789012");
    assert_eq!(customer_rows(&store, "123456789012").await, 1);
}

#[tokio::test]
#[serial]
async fn upsert_existing_returns_original_row() {
    let store = get_test_store().await;

    let first = store.upsert_customer("123456789012").await.unwrap();
    let second = store.upsert_customer("123456789012").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.created_at, second.created_at);
    assert_eq!(customer_rows(&store, "123456789012").await, 1);
}

#[tokio::test]
#[serial]
async fn concurrent_upserts_return_same_id() {
    let store = get_test_store().await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.upsert_customer("777777777777").await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }

    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(customer_rows(&store, "777777777777").await, 1);
}

#[tokio::test]
#[serial]
async fn get_by_idn_after_upsert() {
    let store = get_test_store().await;

    let created = store.upsert_customer("111122223333").await.unwrap();
    let loaded = store
        .get_customer_by_idn("111122223333")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created, loaded);
}

#[tokio::test]
#[serial]
async fn get_by_unknown_idn_returns_none() {
    let store = get_test_store().await;

    let loaded = store.get_customer_by_idn("000000000000").await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
#[serial]
async fn service_maps_missing_row_to_not_found() {
    let service = CustomerService::new(get_test_store().await);

    let err = service.get_customer("000000000000").await.unwrap_err();
    assert!(matches!(err, customer::CustomerError::NotFound(_)));
}
