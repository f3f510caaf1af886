/// User model and database operations
///
/// Users belong to organisations through the memberships table. Passwords
/// are stored as Argon2id hashes, never in plaintext, and the hash never
/// leaves the server: API responses use [`PublicUser`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     user_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     first_name VARCHAR(255) NOT NULL,
///     last_name VARCHAR(255) NOT NULL,
///     phone VARCHAR(32),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// User account record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id (UUID v4)
    pub user_id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Optional phone number
    pub phone: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Optional phone number
    pub phone: Option<String>,
}

/// The subset of a user exposed in API responses.
///
/// Deliberately excludes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }
}

impl User {
    /// Creates a new user.
    ///
    /// The unique index on `email` is the source of truth for duplicate
    /// detection; callers map the unique-constraint violation to their
    /// duplicate-email response rather than pre-checking existence.
    ///
    /// Takes any executor so callers can run it inside a transaction with
    /// the related organisation and membership inserts.
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists or the database call
    /// fails.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateUser,
    ) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_id, email, password_hash, first_name, last_name, phone,
                      created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.phone)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by id, `None` if absent.
    pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password_hash, first_name, last_name, phone,
                   created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address, `None` if absent.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password_hash, first_name, last_name, phone,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_projection_excludes_hash() {
        let user = User {
            user_id: Uuid::new_v4(),
            email: "john@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            phone: Some("1234567890".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let projected = PublicUser::from(&user);
        let json = serde_json::to_value(&projected).unwrap();

        assert_eq!(json["userId"], user.user_id.to_string());
        assert_eq!(json["firstName"], "John");
        assert_eq!(json["lastName"], "Doe");
        assert_eq!(json["email"], "john@example.com");
        assert_eq!(json["phone"], "1234567890");
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
