//! Spot model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Occupancy status of a parking spot.
///
/// A spot is `Occupied` exactly while one open session references it;
/// every other spot is `Available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    Available,
    Occupied,
}

impl SpotStatus {
    /// Database representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotStatus::Available => "available",
            SpotStatus::Occupied => "occupied",
        }
    }
}

impl FromStr for SpotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(SpotStatus::Available),
            "occupied" => Ok(SpotStatus::Occupied),
            other => Err(format!("Unknown spot status: {}", other)),
        }
    }
}

impl fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spot entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spot {
    pub id: Uuid,
    pub name: String,
    pub status: SpotStatus,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Spot {
    /// Geocoordinates of the spot, when both components are set.
    pub fn coordinates(&self) -> Option<crate::geo::GeoPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(crate::geo::GeoPoint { lat, lng }),
            _ => None,
        }
    }
}

/// Request to provision a new spot
#[derive(Debug, Deserialize)]
pub struct CreateSpotRequest {
    pub name: String,
}

/// Request to override a spot's status
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: SpotStatus,
}

/// Request to set a spot's geocoordinates
#[derive(Debug, Deserialize)]
pub struct UpdateCoordinatesRequest {
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        assert_eq!("available".parse::<SpotStatus>(), Ok(SpotStatus::Available));
        assert_eq!("occupied".parse::<SpotStatus>(), Ok(SpotStatus::Occupied));
        assert!("reserved".parse::<SpotStatus>().is_err());
        assert_eq!(SpotStatus::Available.as_str(), "available");
        assert_eq!(SpotStatus::Occupied.as_str(), "occupied");
    }
}
