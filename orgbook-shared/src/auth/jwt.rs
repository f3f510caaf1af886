/// Access token generation and validation
///
/// Tokens are signed with HS256 (HMAC-SHA256) and carry the authenticated
/// user's id as the subject claim. They are never persisted: each request
/// reconstructs and verifies the token from the `Authorization` header.
///
/// # Claims
///
/// - `sub`: user id
/// - `iss`: always "orgbook"
/// - `iat`: issued-at (Unix timestamp)
/// - `exp`: expiry, always `iat + 3600`
///
/// # Example
///
/// ```
/// use orgbook_shared::auth::jwt::{create_token, validate_token, Claims, TOKEN_LIFETIME_SECONDS};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let claims = Claims::new(user_id);
/// let token = create_token(&claims, "a-secret-key-at-least-32-bytes-long")?;
///
/// let validated = validate_token(&token, "a-secret-key-at-least-32-bytes-long")?;
/// assert_eq!(validated.sub, user_id);
/// assert_eq!(validated.exp - validated.iat, TOKEN_LIFETIME_SECONDS);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token lifetime: exactly one hour from issuance.
pub const TOKEN_LIFETIME_SECONDS: i64 = 3600;

const ISSUER: &str = "orgbook";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature invalid or token malformed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Claims embedded in an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,

    /// Issuer - always "orgbook"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user with the standard one hour lifetime.
    pub fn new(user_id: Uuid) -> Self {
        Self::with_lifetime(user_id, Duration::seconds(TOKEN_LIFETIME_SECONDS))
    }

    /// Creates claims with an explicit lifetime.
    ///
    /// Production code always uses [`Claims::new`]; this exists so tests
    /// can mint already-expired tokens.
    pub fn with_lifetime(user_id: Uuid, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }

    /// Checks if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a compact token string.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims.
///
/// Verifies the signature, the issuer, and the expiry.
///
/// # Errors
///
/// - `JwtError::Expired` if the token's `exp` has passed
/// - `JwtError::ValidationError` for a bad signature, wrong issuer, or
///   malformed token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_lifetime_is_exactly_one_hour() {
        let claims = Claims::new(Uuid::new_v4());

        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECONDS);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();

        let claims = Claims::new(user_id);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.iss, "orgbook");
        assert_eq!(validated.exp - validated.iat, TOKEN_LIFETIME_SECONDS);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4());
        let token = create_token(&claims, SECRET).expect("Should create token");

        let result = validate_token(&token, "a-different-secret-of-sufficient-len");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        // Expired well past the decoder's leeway window
        let claims = Claims::with_lifetime(Uuid::new_v4(), Duration::seconds(-3600));

        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_malformed_token() {
        let result = validate_token("not.a.jwt", SECRET);
        assert!(matches!(result, Err(JwtError::ValidationError(_))));

        let result = validate_token("", SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_wrong_issuer() {
        #[derive(Serialize)]
        struct ForeignClaims {
            sub: Uuid,
            iss: String,
            iat: i64,
            exp: i64,
        }

        let now = Utc::now().timestamp();
        let foreign = ForeignClaims {
            sub: Uuid::new_v4(),
            iss: "someone-else".to_string(),
            iat: now,
            exp: now + 3600,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &foreign,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, SECRET).is_err());
    }
}
