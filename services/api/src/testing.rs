//! In-memory store implementations for exercising the core engine in tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chrono::Utc;
use uuid::Uuid;

use crate::error::ParkingError;
use crate::models::config::{DEFAULT_ENTRANCE, DEFAULT_EXIT, DEFAULT_SHOP};
use crate::models::{ParkingConfig, Session, Spot, SpotStatus, User};
use crate::preference::ConfigStore;
use crate::scan::{SessionLedger, SpotRegistry, UserDirectory};

/// Lot configuration store backed by a mutex-guarded option.
#[derive(Clone, Default)]
pub struct MemoryConfigStore {
    inner: Arc<Mutex<ConfigInner>>,
}

#[derive(Default)]
struct ConfigInner {
    config: Option<ParkingConfig>,
    creates: usize,
}

impl MemoryConfigStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// How many times the lazy default row has been created.
    pub fn created_count(&self) -> usize {
        self.inner.lock().unwrap().creates
    }
}

impl ConfigStore for MemoryConfigStore {
    async fn get_or_create(&self) -> anyhow::Result<ParkingConfig> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(config) = &inner.config {
            return Ok(config.clone());
        }

        let config = ParkingConfig {
            id: Uuid::new_v4(),
            entrance_lat: DEFAULT_ENTRANCE.0,
            entrance_lng: DEFAULT_ENTRANCE.1,
            exit_lat: DEFAULT_EXIT.0,
            exit_lng: DEFAULT_EXIT.1,
            shop_lat: DEFAULT_SHOP.0,
            shop_lng: DEFAULT_SHOP.1,
            updated_at: Utc::now(),
        };
        inner.config = Some(config.clone());
        inner.creates += 1;
        Ok(config)
    }
}

/// Spot registry backed by a mutex-guarded map; `try_reserve` is atomic
/// under the lock, matching the conditional-update contract.
#[derive(Clone, Default)]
pub struct MemorySpotRegistry {
    spots: Arc<Mutex<HashMap<Uuid, Spot>>>,
}

impl MemorySpotRegistry {
    pub fn with_spots(spots: Vec<Spot>) -> Self {
        let registry = Self::default();
        for spot in spots {
            registry.spots.lock().unwrap().insert(spot.id, spot);
        }
        registry
    }

    pub fn snapshot(&self) -> Vec<Spot> {
        self.spots.lock().unwrap().values().cloned().collect()
    }
}

impl SpotRegistry for MemorySpotRegistry {
    async fn list_available(&self) -> Result<Vec<Spot>, ParkingError> {
        let mut available: Vec<Spot> = self
            .spots
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.status == SpotStatus::Available)
            .cloned()
            .collect();
        available.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(available)
    }

    async fn get(&self, spot_id: Uuid) -> Result<Option<Spot>, ParkingError> {
        Ok(self.spots.lock().unwrap().get(&spot_id).cloned())
    }

    async fn try_reserve(&self, spot_id: Uuid) -> Result<bool, ParkingError> {
        let mut spots = self.spots.lock().unwrap();
        match spots.get_mut(&spot_id) {
            Some(spot) if spot.status == SpotStatus::Available => {
                spot.status = SpotStatus::Occupied;
                spot.updated_at = Utc::now();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Ok(false),
        }
    }

    async fn release(&self, spot_id: Uuid) -> Result<(), ParkingError> {
        let mut spots = self.spots.lock().unwrap();
        if let Some(spot) = spots.get_mut(&spot_id) {
            spot.status = SpotStatus::Available;
            spot.updated_at = Utc::now();
        }
        Ok(())
    }
}

/// Session ledger backed by a mutex-guarded map.
#[derive(Clone, Default)]
pub struct MemorySessionLedger {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl MemorySessionLedger {
    pub fn snapshot(&self) -> Vec<Session> {
        self.sessions.lock().unwrap().values().cloned().collect()
    }

    /// Open sessions currently referencing the given spot.
    pub fn open_count_for_spot(&self, spot_id: Uuid) -> usize {
        self.sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.spot_id == spot_id && s.is_open())
            .count()
    }
}

impl SessionLedger for MemorySessionLedger {
    async fn find_open_session(&self, user_id: Uuid) -> Result<Option<Session>, ParkingError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .find(|s| s.user_id == user_id && s.is_open())
            .cloned())
    }

    async fn open_session(&self, user_id: Uuid, spot_id: Uuid) -> Result<Session, ParkingError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.values().any(|s| s.user_id == user_id && s.is_open()) {
            return Err(ParkingError::UserAlreadyParked);
        }

        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            spot_id,
            started_at: Utc::now(),
            ended_at: None,
        };
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn close_session(&self, session_id: Uuid) -> Result<Session, ParkingError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ParkingError::Store(anyhow!("session {} not found", session_id)))?;

        if session.ended_at.is_some() {
            return Err(ParkingError::SessionAlreadyClosed);
        }

        session.ended_at = Some(Utc::now());
        Ok(session.clone())
    }
}

/// User directory backed by a mutex-guarded list.
#[derive(Clone, Default)]
pub struct MemoryUserDirectory {
    users: Arc<Mutex<Vec<User>>>,
}

impl MemoryUserDirectory {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }
}

impl UserDirectory for MemoryUserDirectory {
    async fn find_by_scan_token(&self, token: &str) -> Result<Option<User>, ParkingError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.scan_token.as_deref() == Some(token))
            .cloned())
    }
}

/// Build a spot in the default available state.
pub fn make_spot(name: &str, coords: Option<(f64, f64)>) -> Spot {
    Spot {
        id: Uuid::new_v4(),
        name: name.to_string(),
        status: SpotStatus::Available,
        lat: coords.map(|c| c.0),
        lng: coords.map(|c| c.1),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Build a user holding a scan token and an optional stored preference.
pub fn make_user(email: &str, token: &str, preference: Option<(&str, Option<&str>)>) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        scan_token: Some(token.to_string()),
        preference_kind: preference.map(|p| p.0.to_string()),
        preferred_spot: preference.and_then(|p| p.1.map(str::to_string)),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
