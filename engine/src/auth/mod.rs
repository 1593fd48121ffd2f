//! Authentication material
//!
//! - Password hashing (PBKDF2-HMAC-SHA256 via `ring`)
//! - Session token generation and HMAC cookie signing
//! - `SecretString` for values that must never reach a log line

use sdk::errors::AppError;

pub mod password;
pub mod secret;
pub mod token;

pub use password::PasswordHasher;
pub use secret::SecretString;
pub use token::{generate_token, TokenSigner};

/// Errors from the authentication primitives
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("System random number generator unavailable")]
    RandomUnavailable,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Persistence(err.to_string())
    }
}
