//! Database repository for CRUD operations.
//!
//! Uses prepared statements; ownership checks live in the API layer.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{BirthRecord, SaveBirthdayRequest, Session, User};

/// How long a session token stays valid.
const SESSION_TTL_DAYS: i64 = 30;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// Create a new user. The email must already be normalized to lowercase.
    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(email)
        .bind(password_hash)
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(AppError::EmailTaken(format!(
                    "An account for {} already exists",
                    email
                )));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(User {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
        })
    }

    /// Find a user by email (lowercase).
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row =
            sqlx::query("SELECT id, email, password_hash, created_at FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    // ==================== SESSION OPERATIONS ====================

    /// Create a session for a user and return the new token.
    pub async fn create_session(&self, user_id: &str) -> Result<Session, AppError> {
        let token = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let expires = now + Duration::days(SESSION_TTL_DAYS);

        let session = Session {
            token,
            user_id: user_id.to_string(),
            created_at: now.to_rfc3339(),
            expires_at: expires.to_rfc3339(),
        };

        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(&session.user_id)
        .bind(&session.created_at)
        .bind(&session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(session)
    }

    /// Resolve a session token to its user, ignoring expired sessions.
    pub async fn find_session_user(&self, token: &str) -> Result<Option<User>, AppError> {
        let now = Utc::now().to_rfc3339();

        let row = sqlx::query(
            r#"
            SELECT u.id, u.email, u.password_hash, u.created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = ? AND s.expires_at > ?
            "#,
        )
        .bind(token)
        .bind(&now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Delete a session (logout). Deleting an unknown token is not an error.
    pub async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Remove expired sessions and return how many were dropped.
    pub async fn purge_expired_sessions(&self) -> Result<u64, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(&now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // ==================== BIRTHDAY OPERATIONS ====================

    /// List all birth records ordered by (month, day) of birth date.
    pub async fn list_birthdays(&self) -> Result<Vec<BirthRecord>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, name, dob, tob, pob, notes, latitude, longitude,
                   created_at, updated_at
            FROM birthdays
            ORDER BY substr(dob, 6, 5), created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| birthday_from_row(&row)).collect())
    }

    /// Get a birth record by ID.
    pub async fn get_birthday(&self, id: &str) -> Result<Option<BirthRecord>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, name, dob, tob, pob, notes, latitude, longitude,
                   created_at, updated_at
            FROM birthdays
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(birthday_from_row))
    }

    /// Count the records owned by a user (for the one-record-per-account rule).
    pub async fn count_birthdays_for_owner(&self, owner_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM birthdays WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("n"))
    }

    /// Create a new birth record.
    pub async fn create_birthday(
        &self,
        owner_id: &str,
        request: &SaveBirthdayRequest,
        dob: NaiveDate,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<BirthRecord, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO birthdays
                (id, owner_id, name, dob, tob, pob, notes, latitude, longitude,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(owner_id)
        .bind(&request.name)
        .bind(dob.to_string())
        .bind(&request.tob)
        .bind(&request.pob)
        .bind(&request.notes)
        .bind(latitude)
        .bind(longitude)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(BirthRecord {
            id,
            owner_id: owner_id.to_string(),
            name: request.name.clone(),
            dob,
            tob: request.tob.clone(),
            pob: request.pob.clone(),
            notes: request.notes.clone(),
            latitude,
            longitude,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Fully replace a birth record's user-supplied fields.
    pub async fn replace_birthday(
        &self,
        id: &str,
        request: &SaveBirthdayRequest,
        dob: NaiveDate,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<BirthRecord, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE birthdays
            SET name = ?, dob = ?, tob = ?, pob = ?, notes = ?,
                latitude = ?, longitude = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&request.name)
        .bind(dob.to_string())
        .bind(&request.tob)
        .bind(&request.pob)
        .bind(&request.notes)
        .bind(latitude)
        .bind(longitude)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Birthday {} not found", id)));
        }

        self.get_birthday(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Birthday {} not found", id)))
    }

    /// Delete a birth record. Immediate; no soft delete.
    pub async fn delete_birthday(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM birthdays WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Birthday {} not found", id)));
        }

        Ok(())
    }
}

// Helper functions for row conversion

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

fn birthday_from_row(row: &sqlx::sqlite::SqliteRow) -> BirthRecord {
    let dob_str: String = row.get("dob");

    BirthRecord {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        // Stored as ISO dates on write; the fallback never triggers in practice
        dob: NaiveDate::parse_from_str(&dob_str, "%Y-%m-%d").unwrap_or_default(),
        tob: row.get("tob"),
        pob: row.get("pob"),
        notes: row.get("notes"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
