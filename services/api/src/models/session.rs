//! Session model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session entity
///
/// One vehicle's continuous occupancy of one spot. A session is open while
/// `ended_at` is null; for a given user and for a given spot, at most one
/// session is open at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub spot_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Whether the session is still open.
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// Request for the current-session lookup
#[derive(Debug, Deserialize)]
pub struct CurrentSessionRequest {
    pub email: String,
}

/// Response for the current-session lookup
#[derive(Debug, Serialize)]
pub struct CurrentSessionResponse {
    pub has_active_session: bool,
    pub session: Option<Session>,
    pub scan_token: Option<String>,
}

/// Response for the scan endpoint, tagged with the inferred direction
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub action: String,
    pub message: String,
    pub session: Session,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocated_spot: Option<super::spot::Spot>,
}
