//! Repositories for database operations

pub mod config;
pub mod session;
pub mod spot;
pub mod user;

// Re-export for convenience
pub use config::ParkingConfigRepository;
pub use session::SessionRepository;
pub use spot::SpotRepository;
pub use user::UserRepository;
