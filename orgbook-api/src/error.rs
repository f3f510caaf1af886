/// Error handling for the API server
///
/// A single `ApiError` maps every failure to the wire format the API
/// speaks: validation failures become `422 {errors: [{field, message}]}`
/// with one entry per violated field, everything else becomes a
/// status-coded body `{status, message, statusCode}`. Internal details are
/// logged server-side and never included in a response.
///
/// Two deliberate asymmetries, both fail-closed:
/// - `AuthenticationFailed` is one uniform 401 body for unknown email,
///   wrong password, and unexpected login failures, so responses cannot be
///   used to enumerate accounts.
/// - `RegistrationFailed` is one generic 400 for any unexpected failure
///   during the registration sequence.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidationErrors;

use orgbook_shared::auth::{middleware::AuthError, password::PasswordError, policy::PolicyError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Field-level validation failures (422), all collected in one response
    Validation(Vec<FieldError>),

    /// Generic registration failure (400), no field detail leaked
    RegistrationFailed,

    /// Bad credentials or any login failure (401), uniform body
    AuthenticationFailed,

    /// Authorization header absent or empty (401)
    MissingToken,

    /// Bearer token failed verification (401)
    InvalidToken,

    /// Authenticated but lacks access to the resource (403)
    Forbidden,

    /// Entity absent (404)
    NotFound(&'static str),

    /// Malformed create request or duplicate membership (400)
    BadRequest(&'static str),

    /// Unexpected store/crypto failure (500); details are logged only
    Internal(String),
}

/// A single field-level validation error
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldError {
    /// Field that failed validation (wire name, camelCase)
    pub field: String,

    /// Error message
    pub message: String,
}

/// Status-coded error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Status label (e.g. "Bad request", "Unauthorized")
    pub status: String,

    /// Human-readable message
    pub message: String,

    /// HTTP status code, repeated in the body
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// Validation error body: `{errors: [{field, message}, ...]}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationBody {
    pub errors: Vec<FieldError>,
}

impl ApiError {
    /// Flattens `validator` output into field-level errors, every violated
    /// field in one list.
    ///
    /// Struct fields are snake_case in Rust but camelCase on the wire, so
    /// the field names are converted to match the request body.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: snake_to_camel(field),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        // field_errors() iterates a HashMap; keep the response stable
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::Validation(details)
    }

    /// The duplicate-email response: 422 with a single field-level error,
    /// produced when the unique index on `users.email` rejects an insert.
    pub fn duplicate_email() -> Self {
        ApiError::Validation(vec![FieldError {
            field: "email".to_string(),
            message: "Email already exists".to_string(),
        }])
    }
}

fn snake_to_camel(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = false;
    for c in s.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Returns true when a sqlx error is a unique-constraint violation whose
/// constraint name contains the given fragment.
pub fn is_unique_violation(err: &sqlx::Error, constraint_fragment: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .constraint()
            .map(|c| c.contains(constraint_fragment))
            .unwrap_or(false),
        _ => false,
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::RegistrationFailed => write!(f, "Registration unsuccessful"),
            ApiError::AuthenticationFailed => write!(f, "Authentication failed"),
            ApiError::MissingToken => write!(f, "Access token is missing or invalid"),
            ApiError::InvalidToken => write!(f, "Access token is invalid"),
            ApiError::Forbidden => write!(f, "Unauthorized access"),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Validation failures use the {errors: [...]} shape
        if let ApiError::Validation(errors) = self {
            let body = Json(ValidationBody { errors });
            return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
        }

        let (status, label, message) = match self {
            ApiError::Validation(_) => unreachable!(),
            ApiError::RegistrationFailed => (
                StatusCode::BAD_REQUEST,
                "Bad request",
                "Registration unsuccessful".to_string(),
            ),
            ApiError::AuthenticationFailed => (
                StatusCode::UNAUTHORIZED,
                "Bad request",
                "Authentication failed".to_string(),
            ),
            ApiError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Access token is missing or invalid".to_string(),
            ),
            ApiError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Access token is invalid".to_string(),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Forbidden",
                "Unauthorized access".to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not Found", msg.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad Request", msg.to_string()),
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorBody {
            status: label.to_string(),
            message,
            status_code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(format!("Database error: {}", err))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::MissingToken,
            AuthError::InvalidToken => ApiError::InvalidToken,
        }
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Denied => ApiError::Forbidden,
            PolicyError::DatabaseError(e) => ApiError::Internal(format!("Database error: {}", e)),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<orgbook_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: orgbook_shared::auth::jwt::JwtError) -> Self {
        ApiError::Internal(format!("Token operation failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failed_body() {
        let response = ApiError::AuthenticationFailed.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_gate_errors_are_unauthorized() {
        assert_eq!(
            ApiError::MissingToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_validation_uses_errors_shape() {
        let err = ApiError::Validation(vec![FieldError {
            field: "email".to_string(),
            message: "Email is required".to_string(),
        }]);
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_error_body_wire_names() {
        let body = ErrorBody {
            status: "Bad request".to_string(),
            message: "Authentication failed".to_string(),
            status_code: 401,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["status"], "Bad request");
        assert_eq!(json["message"], "Authentication failed");
        assert_eq!(json["statusCode"], 401);
    }

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("first_name"), "firstName");
        assert_eq!(snake_to_camel("email"), "email");
        assert_eq!(snake_to_camel("last_name"), "lastName");
    }

    #[test]
    fn test_duplicate_email_detail() {
        match ApiError::duplicate_email() {
            ApiError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "email");
                assert_eq!(errors[0].message, "Email already exists");
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }
}
