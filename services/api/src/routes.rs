//! Parking service routes

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        CreateSpotRequest, CreateUserRequest, CurrentSessionRequest, CurrentSessionResponse,
        ScanRequest, ScanResponse, ScanTokenRequest, ScanTokenResponse, UpdateConfigRequest,
        UpdateCoordinatesRequest, UpdatePreferenceRequest, UpdateStatusRequest, UserResponse,
    },
    scan::ScanOutcome,
    state::AppState,
    validation::{is_valid_spot_name, validate_email},
};

/// Create the router for the parking service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/users", post(create_user))
        .route("/users/preference", patch(update_preference))
        .route("/parking/token", post(issue_scan_token))
        .route("/parking/scan", post(scan))
        .route("/parking/session/current", post(current_session))
        .route("/parking/config", get(get_config).put(update_config))
        .route("/spots", get(list_spots).post(create_spot))
        .route("/spots/:id", delete(delete_spot))
        .route("/spots/:id/status", patch(update_spot_status))
        .route("/spots/:id/coordinates", patch(update_spot_coordinates))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "parking-api"
    }))
}

/// Create a new user record
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_email(&payload.email).map_err(ApiError::BadRequest)?;

    let existing = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?;

    if existing.is_some() {
        return Err(ApiError::Conflict("Email already in use".to_string()));
    }

    let user = state
        .user_repository
        .create(&payload.email)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create user: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((axum::http::StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Update or clear the user's placement preference
pub async fn update_preference(
    State(state): State<AppState>,
    Json(payload): Json<UpdatePreferenceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("User not found".to_string()))?;

    let (kind, spot_name, message) = match payload.preferred_spot.as_deref() {
        None => (None, None, "Preferred spot cleared".to_string()),
        Some(value) if is_valid_spot_name(value) => (
            Some("specific"),
            Some(value),
            format!("Preferred spot set to {}", value),
        ),
        Some("entrance") => (
            Some("entrance"),
            None,
            "Preference set to: Closest to entrance".to_string(),
        ),
        Some("exit") => (
            Some("exit"),
            None,
            "Preference set to: Closest to exit".to_string(),
        ),
        Some("shop") => (
            Some("shop"),
            None,
            "Preference set to: Closest to shop".to_string(),
        ),
        Some(_) => {
            return Err(ApiError::BadRequest(
                "Invalid preference. Must be A1-B10, entrance, exit, or shop".to_string(),
            ));
        }
    };

    state
        .user_repository
        .update_preference(user.id, kind, spot_name)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update preference: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({
        "message": message,
        "preferred_spot": payload.preferred_spot,
        "preference_kind": kind,
    })))
}

/// Issue (or rotate) the user's scan token
pub async fn issue_scan_token(
    State(state): State<AppState>,
    Json(payload): Json<ScanTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("User not found".to_string()))?;

    let token = state
        .user_repository
        .issue_scan_token(user.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to issue scan token: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(ScanTokenResponse {
        scan_token: token,
        user_id: user.id,
        email: user.email,
    }))
}

/// Handle a scan event: arrival or departure, inferred from session state
pub async fn scan(
    State(state): State<AppState>,
    Json(payload): Json<ScanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .scan_gateway
        .scan(&payload.token, payload.spot_id)
        .await?;

    let response = match outcome {
        ScanOutcome::Entrance { session, spot } => ScanResponse {
            action: "entrance".to_string(),
            message: "Parking session started".to_string(),
            session,
            allocated_spot: Some(spot),
        },
        ScanOutcome::Exit { session } => ScanResponse {
            action: "exit".to_string(),
            message: "Parking session ended".to_string(),
            session,
            allocated_spot: None,
        },
    };

    Ok(Json(response))
}

/// Look up the user's active session
pub async fn current_session(
    State(state): State<AppState>,
    Json(payload): Json<CurrentSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("User not found".to_string()))?;

    let session = state
        .session_repository
        .find_open_by_user(user.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up session: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(CurrentSessionResponse {
        has_active_session: session.is_some(),
        session,
        scan_token: user.scan_token,
    }))
}

/// List every spot
pub async fn list_spots(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let spots = state.spot_repository.list_all().await.map_err(|e| {
        tracing::error!("Failed to list spots: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(spots))
}

/// Provision a new spot
pub async fn create_spot(
    State(state): State<AppState>,
    Json(payload): Json<CreateSpotRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Spot name is required".to_string()));
    }

    let spot = state
        .spot_repository
        .create(payload.name.trim())
        .await
        .map_err(|e| {
            tracing::error!("Failed to create spot: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((axum::http::StatusCode::CREATED, Json(spot)))
}

/// Administrative status override for a spot
pub async fn update_spot_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let spot = state
        .spot_repository
        .update_status(id, payload.status)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update spot status: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Spot not found".to_string()))?;

    Ok(Json(spot))
}

/// Set a spot's geocoordinates
pub async fn update_spot_coordinates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCoordinatesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let spot = state
        .spot_repository
        .update_coordinates(id, payload.lat, payload.lng)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update spot coordinates: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Spot not found".to_string()))?;

    Ok(Json(spot))
}

/// Remove a spot
pub async fn delete_spot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.spot_repository.delete(id).await.map_err(|e| {
        tracing::error!("Failed to delete spot: {}", e);
        ApiError::InternalServerError
    })?;

    if deleted {
        Ok(Json(json!({"message": "Spot deleted successfully"})))
    } else {
        Err(ApiError::NotFound("Spot not found".to_string()))
    }
}

/// Read the lot configuration, creating defaults on first access
pub async fn get_config(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let config = state
        .config_repository
        .get_or_create_config()
        .await
        .map_err(|e| {
            tracing::error!("Failed to read lot configuration: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(config))
}

/// Update the lot configuration
pub async fn update_config(
    State(state): State<AppState>,
    Json(payload): Json<UpdateConfigRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let config = state
        .config_repository
        .update(&payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update lot configuration: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(config))
}
