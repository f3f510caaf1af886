/// User lookup endpoint
///
/// # Endpoint
///
/// ```text
/// GET /api/users/:id
/// ```
///
/// Requires the auth gate. A user record is visible to its owner and to
/// anyone sharing at least one organisation with it.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::Success,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use orgbook_shared::{
    auth::{middleware::AuthContext, policy},
    models::user::{PublicUser, User},
};
use uuid::Uuid;

/// Fetches a single user's public projection.
///
/// # Errors
///
/// - `404`: no user with that id
/// - `403`: requester is neither the user nor a co-member of any of their
///   organisations
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Success<PublicUser>>> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    policy::require_self_or_shared_org(&state.db, auth.user_id, user.user_id).await?;

    Ok(Json(Success::new(
        "User details retrieved successfully",
        PublicUser::from(&user),
    )))
}
