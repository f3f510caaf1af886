/// Registration and login endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Create an account plus its default organisation
/// - `POST /auth/login` - Authenticate and get an access token
///
/// Both validate field presence up front and report every missing field in
/// one 422 response. Login failures are deliberately uniform: unknown
/// email, wrong password, and unexpected errors all produce the same 401
/// body so the API cannot be used to probe which emails have accounts.

use crate::{
    app::AppState,
    error::{is_unique_violation, ApiError, ApiResult},
    routes::Success,
};
use axum::{extract::State, http::StatusCode, Json};
use orgbook_shared::{
    auth::{jwt, password},
    models::{
        membership::Membership,
        organisation::{CreateOrganisation, Organisation},
        user::{CreateUser, PublicUser, User},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
///
/// Fields are optional at the deserialization layer so that presence
/// validation can collect every missing field instead of failing on the
/// first; an empty string counts as missing.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        required(message = "First name is required"),
        length(min = 1, message = "First name is required")
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "Last name is required"),
        length(min = 1, message = "Last name is required")
    )]
    pub last_name: Option<String>,

    #[validate(
        required(message = "Email is required"),
        length(min = 1, message = "Email is required")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Password is required"),
        length(min = 1, message = "Password is required")
    )]
    pub password: Option<String>,

    /// Optional phone number
    pub phone: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "Email is required"),
        length(min = 1, message = "Email is required")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Password is required"),
        length(min = 1, message = "Password is required")
    )]
    pub password: Option<String>,
}

/// Token plus public user projection, returned by both auth endpoints
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    /// Signed access token, valid for one hour
    pub access_token: String,

    /// Public projection of the account (never the password hash)
    pub user: PublicUser,
}

/// Register a new user
///
/// Creates the account, hashes the password, auto-creates the default
/// organisation `"<firstName>'s Organisation"` with the new user as its
/// sole member, and issues an access token.
///
/// # Errors
///
/// - `422`: missing fields (all collected) or duplicate email
/// - `400`: any other failure, as a generic "Registration unsuccessful"
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Success<AuthData>>)> {
    req.validate().map_err(|e| ApiError::from_validation(&e))?;

    // Presence is validated above
    let first_name = req.first_name.unwrap_or_default();
    let last_name = req.last_name.unwrap_or_default();
    let email = req.email.unwrap_or_default();
    let plaintext = req.password.unwrap_or_default();

    let password_hash = password::hash_password(&plaintext).map_err(|e| {
        tracing::error!("Password hashing failed during registration: {}", e);
        ApiError::RegistrationFailed
    })?;

    // User, default organisation, and membership land atomically: a
    // failure part-way must not leave a user holding the email with no
    // organisation.
    let mut tx = state.db.begin().await.map_err(|e| {
        tracing::error!("Failed to begin registration transaction: {}", e);
        ApiError::RegistrationFailed
    })?;

    // The unique index on users.email is the source of truth for
    // duplicates; a conflicting insert becomes the 422 field error.
    let user = User::create(
        &mut *tx,
        CreateUser {
            email,
            password_hash,
            first_name: first_name.clone(),
            last_name,
            phone: req.phone,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e, "email") {
            ApiError::duplicate_email()
        } else {
            tracing::error!("User insert failed during registration: {}", e);
            ApiError::RegistrationFailed
        }
    })?;

    let organisation = Organisation::create(
        &mut *tx,
        CreateOrganisation {
            name: format!("{}'s Organisation", first_name),
            description: Some("Default Organisation".to_string()),
        },
    )
    .await
    .map_err(|e| {
        tracing::error!("Default organisation insert failed: {}", e);
        ApiError::RegistrationFailed
    })?;

    Membership::create(&mut *tx, organisation.org_id, user.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Default membership insert failed: {}", e);
            ApiError::RegistrationFailed
        })?;

    tx.commit().await.map_err(|e| {
        tracing::error!("Failed to commit registration transaction: {}", e);
        ApiError::RegistrationFailed
    })?;

    let claims = jwt::Claims::new(user.user_id);
    let access_token = jwt::create_token(&claims, state.jwt_secret()).map_err(|e| {
        tracing::error!("Token creation failed during registration: {}", e);
        ApiError::RegistrationFailed
    })?;

    Ok((
        StatusCode::CREATED,
        Json(Success::new(
            "Registration successful",
            AuthData {
                access_token,
                user: PublicUser::from(&user),
            },
        )),
    ))
}

/// Login
///
/// # Errors
///
/// - `422`: missing email or password (all collected)
/// - `401`: one uniform "Authentication failed" body for unknown email,
///   wrong password, and any unexpected failure
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Success<AuthData>>> {
    req.validate().map_err(|e| ApiError::from_validation(&e))?;

    let email = req.email.unwrap_or_default();
    let plaintext = req.password.unwrap_or_default();

    // Fail closed: every error path below collapses into the same body
    let user = User::find_by_email(&state.db, &email)
        .await
        .map_err(|e| {
            tracing::error!("User lookup failed during login: {}", e);
            ApiError::AuthenticationFailed
        })?
        .ok_or(ApiError::AuthenticationFailed)?;

    let valid = password::verify_password(&plaintext, &user.password_hash)
        .map_err(|_| ApiError::AuthenticationFailed)?;
    if !valid {
        return Err(ApiError::AuthenticationFailed);
    }

    let claims = jwt::Claims::new(user.user_id);
    let access_token =
        jwt::create_token(&claims, state.jwt_secret()).map_err(|_| ApiError::AuthenticationFailed)?;

    Ok(Json(Success::new(
        "Login successful",
        AuthData {
            access_token,
            user: PublicUser::from(&user),
        },
    )))
}
