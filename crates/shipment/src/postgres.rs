use async_trait::async_trait;
use common::{CustomerId, ShipmentId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::Result;
use crate::store::{NewShipment, Shipment, ShipmentStore};

/// PostgreSQL-backed shipment store.
#[derive(Clone)]
pub struct PostgresShipmentStore {
    pool: PgPool,
}

impl PostgresShipmentStore {
    /// Creates a new PostgreSQL shipment store.
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

    fn row_to_shipment(row: PgRow) -> Result<Shipment> {
        Ok(Shipment {
            id: ShipmentId::from_uuid(row.try_get::<Uuid, _>("id")?),
            route: row.try_get("route")?,
            price: row.try_get("price")?,
            status: row.try_get("status")?,
            customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("customer_id")?),
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ShipmentStore for PostgresShipmentStore {
    #[tracing::instrument(
        skip(self, shipment),
        fields(db.operation = "insert", customer_id = %shipment.customer_id)
    )]
    async fn insert_shipment(&self, shipment: NewShipment) -> Result<Shipment> {
        let row = sqlx::query(
            r#"
            INSERT INTO shipments (route, price, customer_id)
            VALUES ($1, $2, $3)
            RETURNING id, route, price, status, customer_id, created_at
            "#,
        )
        .bind(&shipment.route)
        .bind(shipment.price)
        .bind(shipment.customer_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_shipment(row)
    }

    #[tracing::instrument(skip(self), fields(db.operation = "select"))]
    async fn get_shipment(&self, id: ShipmentId) -> Result<Option<Shipment>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, route, price, status, customer_id, created_at
            FROM shipments
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_shipment).transpose()
    }
}
