//! Spot repository for database operations

use anyhow::{Result, anyhow};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::error::ParkingError;
use crate::models::{Spot, SpotStatus};
use crate::scan::SpotRegistry;

fn map_spot(row: &PgRow) -> Result<Spot> {
    let status: String = row.get("status");
    Ok(Spot {
        id: row.get("id"),
        name: row.get("name"),
        status: status.parse::<SpotStatus>().map_err(|e| anyhow!(e))?,
        lat: row.get("lat"),
        lng: row.get("lng"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Spot repository
#[derive(Clone)]
pub struct SpotRepository {
    pool: PgPool,
}

impl SpotRepository {
    /// Create a new spot repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Provision a new spot, available by default
    pub async fn create(&self, name: &str) -> Result<Spot> {
        info!("Provisioning spot: {}", name);

        let row = sqlx::query(
            r#"
            INSERT INTO spots (name, status)
            VALUES ($1, 'available')
            RETURNING id, name, status, lat, lng, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        map_spot(&row)
    }

    /// List every spot, name ascending
    pub async fn list_all(&self) -> Result<Vec<Spot>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, status, lat, lng, created_at, updated_at
            FROM spots
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_spot).collect()
    }

    /// List available spots, name ascending
    pub async fn list_available_spots(&self) -> Result<Vec<Spot>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, status, lat, lng, created_at, updated_at
            FROM spots
            WHERE status = 'available'
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_spot).collect()
    }

    /// Find a spot by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Spot>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, status, lat, lng, created_at, updated_at
            FROM spots
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_spot).transpose()
    }

    /// Atomically claim an available spot.
    ///
    /// The conditional update lets exactly one concurrent caller win; every
    /// other caller sees zero affected rows.
    pub async fn reserve_if_available(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE spots
            SET status = 'occupied', updated_at = NOW()
            WHERE id = $1 AND status = 'available'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Return a spot to the available pool
    pub async fn release_spot(&self, id: Uuid) -> Result<()> {
        info!("Releasing spot: {}", id);

        sqlx::query(
            r#"
            UPDATE spots
            SET status = 'available', updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Administrative status override
    pub async fn update_status(&self, id: Uuid, status: SpotStatus) -> Result<Option<Spot>> {
        info!("Updating spot {} status to {}", id, status);

        let row = sqlx::query(
            r#"
            UPDATE spots
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, status, lat, lng, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_spot).transpose()
    }

    /// Set a spot's geocoordinates
    pub async fn update_coordinates(&self, id: Uuid, lat: f64, lng: f64) -> Result<Option<Spot>> {
        let row = sqlx::query(
            r#"
            UPDATE spots
            SET lat = $2, lng = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, status, lat, lng, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(lat)
        .bind(lng)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_spot).transpose()
    }

    /// Remove a spot
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting spot: {}", id);

        let result = sqlx::query(
            r#"
            DELETE FROM spots
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl SpotRegistry for SpotRepository {
    async fn list_available(&self) -> Result<Vec<Spot>, ParkingError> {
        Ok(self.list_available_spots().await?)
    }

    async fn get(&self, spot_id: Uuid) -> Result<Option<Spot>, ParkingError> {
        Ok(self.find_by_id(spot_id).await?)
    }

    async fn try_reserve(&self, spot_id: Uuid) -> Result<bool, ParkingError> {
        Ok(self.reserve_if_available(spot_id).await?)
    }

    async fn release(&self, spot_id: Uuid) -> Result<(), ParkingError> {
        Ok(self.release_spot(spot_id).await?)
    }
}
