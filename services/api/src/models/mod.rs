//! Parking service models

pub mod config;
pub mod session;
pub mod spot;
pub mod user;

// Re-export for convenience
pub use config::{ParkingConfig, UpdateConfigRequest};
pub use session::{CurrentSessionRequest, CurrentSessionResponse, ScanResponse, Session};
pub use spot::{
    CreateSpotRequest, Spot, SpotStatus, UpdateCoordinatesRequest, UpdateStatusRequest,
};
pub use user::{
    CreateUserRequest, ScanRequest, ScanTokenRequest, ScanTokenResponse, UpdatePreferenceRequest,
    User, UserResponse,
};
