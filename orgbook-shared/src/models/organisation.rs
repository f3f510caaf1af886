/// Organisation model and database operations
///
/// An organisation is a named group of users. One is auto-created for
/// every user at registration (`"<firstName>'s Organisation"`); more can
/// be created explicitly, and users are linked through the memberships
/// table.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organisations (
///     org_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Organisation record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organisation {
    /// Unique organisation id (UUID v4)
    pub org_id: Uuid,

    /// Organisation name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// When the organisation was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new organisation
#[derive(Debug, Clone)]
pub struct CreateOrganisation {
    /// Organisation name
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// The subset of an organisation exposed in API responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationSummary {
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<&Organisation> for OrganisationSummary {
    fn from(org: &Organisation) -> Self {
        Self {
            org_id: org.org_id,
            name: org.name.clone(),
            description: org.description.clone(),
        }
    }
}

impl Organisation {
    /// Creates a new organisation.
    ///
    /// Takes any executor; creation always runs in a transaction with the
    /// insert of the creator's membership.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateOrganisation,
    ) -> Result<Self, sqlx::Error> {
        let org = sqlx::query_as::<_, Organisation>(
            r#"
            INSERT INTO organisations (name, description)
            VALUES ($1, $2)
            RETURNING org_id, name, description, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .fetch_one(executor)
        .await?;

        Ok(org)
    }

    /// Finds an organisation by id, `None` if absent.
    pub async fn find_by_id(pool: &PgPool, org_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let org = sqlx::query_as::<_, Organisation>(
            r#"
            SELECT org_id, name, description, created_at
            FROM organisations
            WHERE org_id = $1
            "#,
        )
        .bind(org_id)
        .fetch_optional(pool)
        .await?;

        Ok(org)
    }

    /// Lists the organisations a user belongs to.
    ///
    /// Membership-scoped: organisations the user is not a member of are
    /// never returned.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<OrganisationSummary>, sqlx::Error> {
        let orgs = sqlx::query_as::<_, OrganisationSummary>(
            r#"
            SELECT o.org_id, o.name, o.description
            FROM organisations o
            JOIN memberships m ON m.org_id = o.org_id
            WHERE m.user_id = $1
            ORDER BY o.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(orgs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_wire_shape() {
        let org = Organisation {
            org_id: Uuid::new_v4(),
            name: "John's Organisation".to_string(),
            description: Some("Default Organisation".to_string()),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(OrganisationSummary::from(&org)).unwrap();

        assert_eq!(json["orgId"], org.org_id.to_string());
        assert_eq!(json["name"], "John's Organisation");
        assert_eq!(json["description"], "Default Organisation");
    }
}
