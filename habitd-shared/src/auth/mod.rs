/// Authentication utilities
///
/// Credential-handling building blocks for the API server:
///
/// - `jwt`: bearer token creation and validation
/// - `password`: Argon2id password hashing and verification
/// - `middleware`: authentication context and Authorization header parsing

pub mod jwt;
pub mod middleware;
pub mod password;
