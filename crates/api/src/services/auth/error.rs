//! Authentication error types.

use thiserror::Error;

use rosewood_core::EmailError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or password. One variant for both so responses don't
    /// reveal which part was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The bearer token is missing, malformed, or expired.
    #[error("invalid token")]
    InvalidToken,

    /// The email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// The email address failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The password doesn't meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// The password-reset token is unknown or expired.
    #[error("invalid or expired reset token")]
    InvalidResetToken,

    /// No account exists for the email (password-reset flow only).
    #[error("user not found")]
    UserNotFound,

    /// Underlying repository failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Token signing failed.
    #[error("token encoding failed")]
    TokenEncoding,
}
