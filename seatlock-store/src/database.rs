use async_trait::async_trait;
use seatlock_core::{CoreError, CoreResult, InventorySeat, InventorySource, SeatStatus};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        info!("Connected to inventory database");
        Ok(Self { pool })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SeatRow {
    seat_id: String,
    section_id: String,
    status: String,
}

impl From<SeatRow> for InventorySeat {
    fn from(row: SeatRow) -> Self {
        let baseline_status: SeatStatus = row.status.parse().unwrap_or_else(|e| {
            warn!("Seat {} has {}, treating as available", row.seat_id, e);
            SeatStatus::Available
        });
        InventorySeat {
            seat_id: row.seat_id,
            section_id: row.section_id,
            baseline_status,
        }
    }
}

/// Seat inventory backed by the primary `seats` table.
#[derive(Clone)]
pub struct PostgresInventory {
    db: DbClient,
}

impl PostgresInventory {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InventorySource for PostgresInventory {
    async fn list_seats(&self) -> CoreResult<Vec<InventorySeat>> {
        let rows = sqlx::query_as::<_, SeatRow>(
            "SELECT seat_id, section_id, status FROM seats ORDER BY section_id, seat_id",
        )
        .fetch_all(&self.db.pool)
        .await
        .map_err(|e| CoreError::StoreUnavailable(e.to_string()))?;

        Ok(rows.into_iter().map(InventorySeat::from).collect())
    }
}
