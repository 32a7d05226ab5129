//! Session repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::error::ParkingError;
use crate::models::Session;
use crate::scan::SessionLedger;

fn map_session(row: &PgRow) -> Session {
    Session {
        id: row.get("id"),
        user_id: row.get("user_id"),
        spot_id: row.get("spot_id"),
        started_at: row.get("started_at"),
        ended_at: row.get("ended_at"),
    }
}

/// Session repository
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the user's open session, if any
    pub async fn find_open_by_user(&self, user_id: Uuid) -> Result<Option<Session>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, spot_id, started_at, ended_at
            FROM sessions
            WHERE user_id = $1 AND ended_at IS NULL
            ORDER BY started_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_session))
    }

    /// Open a session against a freshly reserved spot.
    ///
    /// The existence check is defensive: the gateway never reaches this
    /// call while the user has an open session.
    pub async fn open(&self, user_id: Uuid, spot_id: Uuid) -> Result<Session, ParkingError> {
        if self.find_open_by_user(user_id).await?.is_some() {
            return Err(ParkingError::UserAlreadyParked);
        }

        let row = sqlx::query(
            r#"
            INSERT INTO sessions (user_id, spot_id)
            VALUES ($1, $2)
            RETURNING id, user_id, spot_id, started_at, ended_at
            "#,
        )
        .bind(user_id)
        .bind(spot_id)
        .fetch_one(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        info!("Opened session for user {} at spot {}", user_id, spot_id);
        Ok(map_session(&row))
    }

    /// Set the session's end timestamp.
    ///
    /// The conditional update makes a double close observable: a second
    /// call affects zero rows and is a caller error.
    pub async fn close(&self, session_id: Uuid) -> Result<Session, ParkingError> {
        let row = sqlx::query(
            r#"
            UPDATE sessions
            SET ended_at = NOW()
            WHERE id = $1 AND ended_at IS NULL
            RETURNING id, user_id, spot_id, started_at, ended_at
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        match row {
            Some(row) => {
                info!("Closed session {}", session_id);
                Ok(map_session(&row))
            }
            None => Err(ParkingError::SessionAlreadyClosed),
        }
    }
}

impl SessionLedger for SessionRepository {
    async fn find_open_session(&self, user_id: Uuid) -> Result<Option<Session>, ParkingError> {
        Ok(self.find_open_by_user(user_id).await?)
    }

    async fn open_session(&self, user_id: Uuid, spot_id: Uuid) -> Result<Session, ParkingError> {
        self.open(user_id, spot_id).await
    }

    async fn close_session(&self, session_id: Uuid) -> Result<Session, ParkingError> {
        self.close(session_id).await
    }
}
