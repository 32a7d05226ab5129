//! Lot configuration repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;

use crate::models::config::{DEFAULT_ENTRANCE, DEFAULT_EXIT, DEFAULT_SHOP};
use crate::models::{ParkingConfig, UpdateConfigRequest};
use crate::preference::ConfigStore;

fn map_config(row: &PgRow) -> ParkingConfig {
    ParkingConfig {
        id: row.get("id"),
        entrance_lat: row.get("entrance_lat"),
        entrance_lng: row.get("entrance_lng"),
        exit_lat: row.get("exit_lat"),
        exit_lng: row.get("exit_lng"),
        shop_lat: row.get("shop_lat"),
        shop_lng: row.get("shop_lng"),
        updated_at: row.get("updated_at"),
    }
}

const CONFIG_COLUMNS: &str = "id, entrance_lat, entrance_lng, exit_lat, exit_lng, \
                              shop_lat, shop_lng, updated_at";

/// Lot configuration repository; the table holds at most one row
#[derive(Clone)]
pub struct ParkingConfigRepository {
    pool: PgPool,
}

impl ParkingConfigRepository {
    /// Create a new configuration repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_first(&self) -> Result<Option<ParkingConfig>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM parking_config ORDER BY id LIMIT 1",
            CONFIG_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_config))
    }

    /// Read the configuration, creating it with defaults on first access
    pub async fn get_or_create_config(&self) -> Result<ParkingConfig> {
        if let Some(config) = self.find_first().await? {
            return Ok(config);
        }

        info!("No lot configuration found, creating defaults");

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO parking_config
                (entrance_lat, entrance_lng, exit_lat, exit_lng, shop_lat, shop_lng)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            CONFIG_COLUMNS
        ))
        .bind(DEFAULT_ENTRANCE.0)
        .bind(DEFAULT_ENTRANCE.1)
        .bind(DEFAULT_EXIT.0)
        .bind(DEFAULT_EXIT.1)
        .bind(DEFAULT_SHOP.0)
        .bind(DEFAULT_SHOP.1)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_config(&row))
    }

    /// Update the single configuration row, creating it if missing
    pub async fn update(&self, update: &UpdateConfigRequest) -> Result<ParkingConfig> {
        info!("Updating lot configuration");

        let row = match self.find_first().await? {
            Some(existing) => {
                sqlx::query(&format!(
                    r#"
                    UPDATE parking_config
                    SET entrance_lat = $2, entrance_lng = $3, exit_lat = $4,
                        exit_lng = $5, shop_lat = $6, shop_lng = $7,
                        updated_at = NOW()
                    WHERE id = $1
                    RETURNING {}
                    "#,
                    CONFIG_COLUMNS
                ))
                .bind(existing.id)
                .bind(update.entrance_lat)
                .bind(update.entrance_lng)
                .bind(update.exit_lat)
                .bind(update.exit_lng)
                .bind(update.shop_lat)
                .bind(update.shop_lng)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    r#"
                    INSERT INTO parking_config
                        (entrance_lat, entrance_lng, exit_lat, exit_lng, shop_lat, shop_lng)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING {}
                    "#,
                    CONFIG_COLUMNS
                ))
                .bind(update.entrance_lat)
                .bind(update.entrance_lng)
                .bind(update.exit_lat)
                .bind(update.exit_lng)
                .bind(update.shop_lat)
                .bind(update.shop_lng)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(map_config(&row))
    }
}

impl ConfigStore for ParkingConfigRepository {
    async fn get_or_create(&self) -> Result<ParkingConfig> {
        self.get_or_create_config().await
    }
}
