//! Application state shared across handlers

use sqlx::PgPool;

use crate::repositories::{
    ParkingConfigRepository, SessionRepository, SpotRepository, UserRepository,
};
use crate::scan::ScanGateway;

/// Scan gateway wired to the PostgreSQL-backed stores
pub type PgScanGateway =
    ScanGateway<UserRepository, SpotRepository, SessionRepository, ParkingConfigRepository>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub spot_repository: SpotRepository,
    pub session_repository: SessionRepository,
    pub config_repository: ParkingConfigRepository,
    pub scan_gateway: PgScanGateway,
}
