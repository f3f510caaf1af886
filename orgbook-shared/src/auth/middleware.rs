/// Request identity for the authentication gate
///
/// The API server's auth gate runs this logic before any protected handler:
/// it pulls the bearer token out of the `Authorization` header, validates
/// it, and turns the claims into an [`AuthContext`] that is inserted into
/// the request extensions. Handlers receive the identity as an explicit
/// typed value via Axum's `Extension` extractor, never as ambient state.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use orgbook_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Authenticated as {}", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, Claims};

/// Authenticated identity attached to a request after the auth gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// The user id asserted by the verified token
    pub user_id: Uuid,
}

impl AuthContext {
    /// Builds the request identity from verified token claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
        }
    }
}

/// Error type for the authentication gate
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authorization header absent, or no token after the Bearer scheme
    #[error("Access token is missing or invalid")]
    MissingToken,

    /// Token failed verification (bad signature, malformed, or expired)
    #[error("Access token is invalid")]
    InvalidToken,
}

/// Extracts the bearer token from a request's headers.
///
/// # Errors
///
/// Returns `AuthError::MissingToken` when the `Authorization` header is
/// absent, does not use the Bearer scheme, or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MissingToken)?;

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}

/// Verifies a request's bearer token and produces its identity.
///
/// This is the whole of the auth gate minus the HTTP plumbing: no request
/// proceeds past the gate without the `AuthContext` this returns.
///
/// # Errors
///
/// - `AuthError::MissingToken` if no usable token is present
/// - `AuthError::InvalidToken` if verification fails for any reason
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;

    let claims = validate_token(token, secret).map_err(|_| AuthError::InvalidToken)?;

    Ok(AuthContext::from_claims(&claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, Claims};
    use axum::http::HeaderValue;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            authenticate(&headers, SECRET),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_empty_token_after_scheme() {
        let headers = headers_with_auth("Bearer ");
        assert!(matches!(
            authenticate(&headers, SECRET),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_wrong_scheme() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert!(matches!(
            authenticate(&headers, SECRET),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let headers = headers_with_auth("Bearer definitely-not-a-jwt");
        assert!(matches!(
            authenticate(&headers, SECRET),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let claims = Claims::with_lifetime(Uuid::new_v4(), Duration::seconds(-3600));
        let token = create_token(&claims, SECRET).unwrap();
        let headers = headers_with_auth(&format!("Bearer {}", token));

        assert!(matches!(
            authenticate(&headers, SECRET),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_valid_token_yields_identity() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id), SECRET).unwrap();
        let headers = headers_with_auth(&format!("Bearer {}", token));

        let auth = authenticate(&headers, SECRET).expect("Should authenticate");
        assert_eq!(auth.user_id, user_id);
    }
}
