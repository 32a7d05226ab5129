//! User repository for database operations

use anyhow::Result;
use rand::Rng;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::error::ParkingError;
use crate::models::User;
use crate::scan::UserDirectory;

fn map_user(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        scan_token: row.get("scan_token"),
        preference_kind: row.get("preference_kind"),
        preferred_spot: row.get("preferred_spot"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user record
    pub async fn create(&self, email: &str) -> Result<User> {
        info!("Creating new user: {}", email);

        let row = sqlx::query(
            r#"
            INSERT INTO users (email)
            VALUES ($1)
            RETURNING id, email, scan_token, preference_kind, preferred_spot,
                      created_at, updated_at
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_user(&row))
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, scan_token, preference_kind, preferred_spot,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_user))
    }

    /// Find a user by scan token
    pub async fn find_by_token(&self, token: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, scan_token, preference_kind, preferred_spot,
                   created_at, updated_at
            FROM users
            WHERE scan_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_user))
    }

    /// Issue a fresh scan token for the user.
    ///
    /// The token is an opaque credential, reusable across arrival and
    /// departure cycles; issuing again simply rotates it.
    pub async fn issue_scan_token(&self, user_id: Uuid) -> Result<String> {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill(&mut bytes);
        let token: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();

        info!("Issuing scan token for user: {}", user_id);

        sqlx::query(
            r#"
            UPDATE users
            SET scan_token = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(&token)
        .execute(&self.pool)
        .await?;

        Ok(token)
    }

    /// Store the user's placement preference, or clear it
    pub async fn update_preference(
        &self,
        user_id: Uuid,
        kind: Option<&str>,
        preferred_spot: Option<&str>,
    ) -> Result<()> {
        info!("Updating preference for user: {}", user_id);

        sqlx::query(
            r#"
            UPDATE users
            SET preference_kind = $2, preferred_spot = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(preferred_spot)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl UserDirectory for UserRepository {
    async fn find_by_scan_token(&self, token: &str) -> Result<Option<User>, ParkingError> {
        Ok(self.find_by_token(token).await?)
    }
}
