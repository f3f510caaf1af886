/// Organisation endpoints
///
/// # Endpoints
///
/// ```text
/// GET  /api/organisations                 # organisations the caller belongs to
/// POST /api/organisations                 # create; caller becomes a member
/// GET  /api/organisations/:org_id         # members only
/// POST /api/organisations/:org_id/users   # add a member; members only
/// ```
///
/// All four sit behind the auth gate. Membership scoping is the contract
/// throughout: listing never returns organisations the caller is not a
/// member of, and lookups by id return 403 for non-members.

use crate::{
    app::AppState,
    error::{is_unique_violation, ApiError, ApiResult},
    routes::{Success, SuccessMessage},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use orgbook_shared::{
    auth::{middleware::AuthContext, policy},
    models::{
        membership::Membership,
        organisation::{CreateOrganisation, Organisation, OrganisationSummary},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Create-organisation request
#[derive(Debug, Deserialize)]
pub struct CreateOrganisationRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Add-member request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: Option<Uuid>,
}

/// Organisation list payload: `{"organisations": [...]}`
#[derive(Debug, Serialize, Deserialize)]
pub struct OrganisationList {
    pub organisations: Vec<OrganisationSummary>,
}

/// Lists the organisations the authenticated user belongs to.
pub async fn list_organisations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Success<OrganisationList>>> {
    // The token outlives the account in test housekeeping; surface that as 404
    User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    let organisations = Organisation::list_for_user(&state.db, auth.user_id).await?;

    Ok(Json(Success::new(
        "User organisations retrieved successfully",
        OrganisationList { organisations },
    )))
}

/// Creates an organisation with the caller as its first member.
///
/// # Errors
///
/// - `400`: missing or empty name
pub async fn create_organisation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateOrganisationRequest>,
) -> ApiResult<(StatusCode, Json<Success<OrganisationSummary>>)> {
    let name = match req.name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ApiError::BadRequest("Client error")),
    };

    // Organisation and creator membership land atomically so no
    // organisation ever exists without at least one member
    let mut tx = state.db.begin().await?;

    let organisation = Organisation::create(
        &mut *tx,
        CreateOrganisation {
            name,
            description: req.description,
        },
    )
    .await?;

    // Implicit membership: no separate authorization step for the creator
    Membership::create(&mut *tx, organisation.org_id, auth.user_id).await?;

    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(Success::new(
            "Organisation created successfully",
            OrganisationSummary::from(&organisation),
        )),
    ))
}

/// Fetches one organisation, members only.
///
/// # Errors
///
/// - `404`: no organisation with that id
/// - `403`: caller is not a member
pub async fn get_organisation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<Json<Success<OrganisationSummary>>> {
    let organisation = Organisation::find_by_id(&state.db, org_id)
        .await?
        .ok_or(ApiError::NotFound("Organisation not found"))?;

    policy::require_membership(&state.db, organisation.org_id, auth.user_id).await?;

    Ok(Json(Success::new(
        "Organisation details retrieved successfully",
        OrganisationSummary::from(&organisation),
    )))
}

/// Adds a user to an organisation.
///
/// Only members may add users. (The system this API descends from exposed
/// this route unauthenticated; that was an oversight, not a contract.)
///
/// # Errors
///
/// - `404`: organisation or target user absent
/// - `403`: caller is not a member of the organisation
/// - `400`: missing userId, or target already a member
pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<SuccessMessage>> {
    let target_user_id = req.user_id.ok_or(ApiError::BadRequest("Client error"))?;

    let organisation = Organisation::find_by_id(&state.db, org_id)
        .await?
        .ok_or(ApiError::NotFound("Organisation not found"))?;

    policy::require_membership(&state.db, organisation.org_id, auth.user_id).await?;

    let target = User::find_by_id(&state.db, target_user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    if Membership::exists(&state.db, organisation.org_id, target.user_id).await? {
        return Err(ApiError::BadRequest(
            "User is already connected to the organisation",
        ));
    }

    Membership::create(&state.db, organisation.org_id, target.user_id)
        .await
        .map_err(|e| {
            // Two concurrent adds can both pass the exists() check; the
            // composite primary key settles it
            if is_unique_violation(&e, "memberships") {
                ApiError::BadRequest("User is already connected to the organisation")
            } else {
                ApiError::from(e)
            }
        })?;

    Ok(Json(SuccessMessage::new(
        "User added to organisation successfully",
    )))
}
