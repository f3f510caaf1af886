/// Authentication and authorization primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Access token generation and validation
/// - [`middleware`]: Request identity extracted by the auth gate
/// - [`policy`]: Per-resource access checks (self-access, membership)
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Tokens**: HS256 signing with a fixed 1 hour lifetime
/// - **Constant-time Comparison**: Verification uses constant-time operations

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;
