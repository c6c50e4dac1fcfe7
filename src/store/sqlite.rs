//! SQLite-backed user store

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{NewUser, StoreResult, User, UserId, UserStore, UserUpdate};
use crate::crypto::hash_password;
use crate::error::AuthError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// SQLite-based user store
///
/// The connection mutex serializes every statement, which also gives the
/// rotate compare-and-swap its per-row ordering.
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

impl SqliteUserStore {
    /// Open or create a SQLite database at the given path
    pub fn open(path: &str) -> Result<Self, AuthError> {
        Self::from_connection(Connection::open(path).map_err(internal)?)
    }

    /// Open a private in-memory database (tests, throwaway setups)
    pub fn open_in_memory() -> Result<Self, AuthError> {
        Self::from_connection(Connection::open_in_memory().map_err(internal)?)
    }

    fn from_connection(conn: Connection) -> Result<Self, AuthError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(internal)?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run database migrations
    fn migrate(conn: &Connection) -> Result<(), AuthError> {
        let current_version = Self::get_schema_version(conn)?;

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                current = current_version,
                target = SCHEMA_VERSION,
                "Running database migrations"
            );

            if current_version < 1 {
                Self::migrate_v1(conn)?;
            }

            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .map_err(internal)?;

            tracing::info!("Database migrations complete");
        }

        Ok(())
    }

    /// Get current schema version (0 if no schema exists)
    fn get_schema_version(conn: &Connection) -> Result<i32, AuthError> {
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(internal)?;

        if !table_exists {
            return Ok(0);
        }

        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0).map(|v| v.unwrap_or(0))
        })
        .map_err(internal)
    }

    /// Migration to version 1: initial schema
    fn migrate_v1(conn: &Connection) -> Result<(), AuthError> {
        conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Users table
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                is_email_verified INTEGER NOT NULL DEFAULT 0,
                refresh_token_hash TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(internal)?;

        Ok(())
    }

    fn get(&self, conn: &Connection, id: UserId) -> StoreResult<Option<User>> {
        conn.query_row(
            "SELECT id, name, email, password_hash, is_email_verified, refresh_token_hash, created_at
             FROM users WHERE id = ?1",
            params![id.to_string()],
            row_to_user,
        )
        .optional()
        .map_err(internal)
    }
}

fn internal(e: rusqlite::Error) -> AuthError {
    AuthError::Internal(e.to_string())
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let id = id.parse().map_err(|e: uuid::Error| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_at: String = row.get(6)?;
    Ok(User {
        id,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        is_email_verified: row.get::<_, i32>(4)? != 0,
        refresh_token_hash: row.get(5)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

impl UserStore for SqliteUserStore {
    fn create(&self, new_user: &NewUser) -> StoreResult<User> {
        let normalized = new_user.email.to_lowercase();
        let password_hash =
            hash_password(&new_user.password).map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = User {
            id: UserId::new(),
            name: new_user.name.clone(),
            email: normalized,
            password_hash,
            is_email_verified: false,
            refresh_token_hash: None,
            created_at: Utc::now(),
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (id, name, email, password_hash, is_email_verified, refresh_token_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.is_email_verified as i32,
                user.refresh_token_hash,
                user.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| {
            if let rusqlite::Error::SqliteFailure(ref err, _) = e {
                if err.code == rusqlite::ErrorCode::ConstraintViolation {
                    return AuthError::EmailAlreadyExists;
                }
            }
            internal(e)
        })?;

        Ok(user)
    }

    fn find_one(&self, id: UserId) -> StoreResult<Option<User>> {
        let conn = self.conn.lock().unwrap();
        self.get(&conn, id)
    }

    fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let normalized = email.to_lowercase();
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT id, name, email, password_hash, is_email_verified, refresh_token_hash, created_at
             FROM users WHERE email = ?1",
            params![normalized],
            row_to_user,
        )
        .optional()
        .map_err(internal)
    }

    fn update(&self, id: UserId, update: UserUpdate) -> StoreResult<User> {
        let conn = self.conn.lock().unwrap();

        let mut user = self.get(&conn, id)?.ok_or(AuthError::UserNotFound)?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(verified) = update.is_email_verified {
            user.is_email_verified = verified;
        }
        if let Some(hash) = update.refresh_token_hash {
            user.refresh_token_hash = hash;
        }

        conn.execute(
            "UPDATE users SET name = ?1, is_email_verified = ?2, refresh_token_hash = ?3 WHERE id = ?4",
            params![
                user.name,
                user.is_email_verified as i32,
                user.refresh_token_hash,
                id.to_string(),
            ],
        )
        .map_err(internal)?;

        Ok(user)
    }

    fn rotate_refresh_hash(
        &self,
        id: UserId,
        current: Option<&str>,
        next: Option<&str>,
    ) -> StoreResult<User> {
        let conn = self.conn.lock().unwrap();

        // IS matches NULL, unlike =
        let rows_affected = conn
            .execute(
                "UPDATE users SET refresh_token_hash = ?1 WHERE id = ?2 AND refresh_token_hash IS ?3",
                params![next, id.to_string(), current],
            )
            .map_err(internal)?;

        if rows_affected == 0 {
            return match self.get(&conn, id)? {
                Some(_) => Err(AuthError::InvalidRefreshToken),
                None => Err(AuthError::UserNotFound),
            };
        }

        self.get(&conn, id)?.ok_or(AuthError::UserNotFound)
    }

    fn delete(&self, id: UserId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        let rows_affected = conn
            .execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])
            .map_err(internal)?;

        if rows_affected == 0 {
            return Err(AuthError::UserNotFound);
        }

        Ok(())
    }
}
