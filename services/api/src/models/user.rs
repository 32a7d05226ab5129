//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity
///
/// Credentials live with the external account service; this record carries
/// only what the parking engine needs: the scan token and the stored
/// placement preference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub scan_token: Option<String>,
    pub preference_kind: Option<String>,
    pub preferred_spot: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for user registration
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
}

/// Response for user operations
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub preference_kind: Option<String>,
    pub preferred_spot: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            preference_kind: user.preference_kind,
            preferred_spot: user.preferred_spot,
            created_at: user.created_at,
        }
    }
}

/// Request to update the stored placement preference
///
/// `preferred_spot` is a spot name, one of `entrance` / `exit` / `shop`, or
/// null to clear the preference.
#[derive(Debug, Deserialize)]
pub struct UpdatePreferenceRequest {
    pub email: String,
    pub preferred_spot: Option<String>,
}

/// Request to issue a scan token
#[derive(Debug, Deserialize)]
pub struct ScanTokenRequest {
    pub email: String,
}

/// Response for scan token issuance
#[derive(Debug, Serialize)]
pub struct ScanTokenResponse {
    pub scan_token: String,
    pub user_id: Uuid,
    pub email: String,
}

/// Request for the scan endpoint
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub token: String,
    pub spot_id: Option<Uuid>,
}
