/// Per-resource access checks
///
/// These run inside protected handlers, after the auth gate has attached
/// an [`AuthContext`](super::middleware::AuthContext). Two rules cover the
/// whole API:
///
/// 1. **Self-or-member**: a user record is visible to its owner and to any
///    user who shares at least one organisation with it.
/// 2. **Membership**: an organisation is visible only to its members.
///
/// Creating an organisation needs no check: the creator is added as a
/// member in the same operation.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::membership::Membership;

/// Error type for access checks
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Authenticated, but not allowed to access the resource
    #[error("Unauthorized access")]
    Denied,

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Allows access to a user record for the user themselves or anyone who
/// shares an organisation with them.
///
/// # Errors
///
/// Returns `PolicyError::Denied` when the requester is neither.
pub async fn require_self_or_shared_org(
    pool: &PgPool,
    requester_id: Uuid,
    target_user_id: Uuid,
) -> Result<(), PolicyError> {
    if requester_id == target_user_id {
        return Ok(());
    }

    let shared = Membership::shares_organisation(pool, requester_id, target_user_id).await?;
    if !shared {
        return Err(PolicyError::Denied);
    }

    Ok(())
}

/// Allows access to an organisation only for its members.
///
/// # Errors
///
/// Returns `PolicyError::Denied` when the user is not a member.
pub async fn require_membership(
    pool: &PgPool,
    org_id: Uuid,
    user_id: Uuid,
) -> Result<(), PolicyError> {
    let is_member = Membership::exists(pool, org_id, user_id).await?;
    if !is_member {
        return Err(PolicyError::Denied);
    }

    Ok(())
}
