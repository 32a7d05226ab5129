//! Lot configuration model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::GeoPoint;

/// Reference coordinates used when the config row is first created.
pub const DEFAULT_ENTRANCE: (f64, f64) = (37.7749, -122.4194);
pub const DEFAULT_EXIT: (f64, f64) = (37.775, -122.4195);
pub const DEFAULT_SHOP: (f64, f64) = (37.7751, -122.4196);

/// Lot configuration entity
///
/// Exactly one row exists per deployment. Holds the three reference
/// coordinates used as distance targets for preference-based allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingConfig {
    pub id: Uuid,
    pub entrance_lat: f64,
    pub entrance_lng: f64,
    pub exit_lat: f64,
    pub exit_lng: f64,
    pub shop_lat: f64,
    pub shop_lng: f64,
    pub updated_at: DateTime<Utc>,
}

impl ParkingConfig {
    pub fn entrance(&self) -> GeoPoint {
        GeoPoint {
            lat: self.entrance_lat,
            lng: self.entrance_lng,
        }
    }

    pub fn exit(&self) -> GeoPoint {
        GeoPoint {
            lat: self.exit_lat,
            lng: self.exit_lng,
        }
    }

    pub fn shop(&self) -> GeoPoint {
        GeoPoint {
            lat: self.shop_lat,
            lng: self.shop_lng,
        }
    }
}

/// Request to update the lot configuration
#[derive(Debug, Deserialize)]
pub struct UpdateConfigRequest {
    pub entrance_lat: f64,
    pub entrance_lng: f64,
    pub exit_lat: f64,
    pub exit_lng: f64,
    pub shop_lat: f64,
    pub shop_lng: f64,
}
