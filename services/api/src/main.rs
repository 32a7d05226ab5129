use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod allocation;
mod error;
mod geo;
mod models;
mod preference;
mod repositories;
mod routes;
mod scan;
mod state;
#[cfg(test)]
mod testing;
mod validation;

use common::database::{DatabaseConfig, init_pool};

use crate::{
    preference::PreferenceResolver,
    repositories::{ParkingConfigRepository, SessionRepository, SpotRepository, UserRepository},
    scan::ScanGateway,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting parking service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    info!("Parking service initialized successfully");

    // Initialize repositories
    let user_repository = UserRepository::new(pool.clone());
    let spot_repository = SpotRepository::new(pool.clone());
    let session_repository = SessionRepository::new(pool.clone());
    let config_repository = ParkingConfigRepository::new(pool.clone());

    // Wire the scan gateway to the PostgreSQL-backed stores
    let scan_gateway = ScanGateway::new(
        user_repository.clone(),
        spot_repository.clone(),
        session_repository.clone(),
        PreferenceResolver::new(config_repository.clone()),
    );

    let app_state = AppState {
        db_pool: pool,
        user_repository,
        spot_repository,
        session_repository,
        config_repository,
        scan_gateway,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Parking service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
