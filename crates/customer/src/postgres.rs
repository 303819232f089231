use async_trait::async_trait;
use common::CustomerId;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::Result;
use crate::store::{Customer, CustomerStore};

/// PostgreSQL-backed customer store.
#[derive(Clone)]
pub struct PostgresCustomerStore {
    pool: PgPool,
}

impl PostgresCustomerStore {
    /// Creates a new PostgreSQL customer store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_customer(row: PgRow) -> Result<Customer> {
        Ok(Customer {
            id: CustomerId::from_uuid(row.try_get::<Uuid, _>("id")?),
            idn: row.try_get("idn")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl CustomerStore for PostgresCustomerStore {
    #[tracing::instrument(skip(self), fields(db.operation = "upsert"))]
    async fn upsert_customer(&self, idn: &str) -> Result<Customer> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query(
            r#"
            INSERT INTO customers (idn)
            VALUES ($1)
            ON CONFLICT (idn) DO UPDATE SET idn = EXCLUDED.idn
            RETURNING id, idn, created_at
            "#,
        )
        .bind(idn)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_customer(row)
    }

    #[tracing::instrument(skip(self), fields(db.operation = "select"))]
    async fn get_customer_by_idn(&self, idn: &str) -> Result<Option<Customer>> {
        let row: Option<PgRow> =
            sqlx::query("SELECT id, idn, created_at FROM customers WHERE idn = $1")
                .bind(idn)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Self::row_to_customer).transpose()
    }
}
