/// Membership model: the many-to-many link between users and organisations
///
/// Memberships carry no role or ordering semantics; a row either exists
/// or it does not. The composite primary key makes duplicate membership a
/// constraint violation.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE memberships (
///     org_id UUID NOT NULL REFERENCES organisations(org_id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (org_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Membership record linking a user to an organisation
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Organisation id
    pub org_id: Uuid,

    /// User id
    pub user_id: Uuid,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// Adds a user to an organisation.
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation if the membership already
    /// exists, and a foreign-key violation if either side is missing.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        org_id: Uuid,
        user_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (org_id, user_id)
            VALUES ($1, $2)
            RETURNING org_id, user_id, created_at
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    /// Checks whether a user is a member of an organisation.
    pub async fn exists(pool: &PgPool, org_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM memberships
                WHERE org_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Checks whether two users share at least one organisation.
    pub async fn shares_organisation(
        pool: &PgPool,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let shared: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM memberships a
                JOIN memberships b ON a.org_id = b.org_id
                WHERE a.user_id = $1 AND b.user_id = $2
            )
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_one(pool)
        .await?;

        Ok(shared)
    }
}
