//! Authentication service.
//!
//! Registration, login, password reset, and JWT issuance/verification.
//! Passwords are hashed with Argon2id; tokens are HS256 JWTs carrying the
//! user's id, email and role.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::{Alphanumeric, SampleString};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use rosewood_core::{Email, UserId, UserRole};

use crate::config::JwtConfig;
use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Reset tokens live for one hour.
const RESET_TOKEN_TTL_SECS: i64 = 3600;

/// Length of a generated reset token.
const RESET_TOKEN_LENGTH: usize = 32;

/// A syntactically valid Argon2id hash of a throwaway password. Login
/// verifies against this when the email is unknown so both failure paths do
/// comparable hashing work.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

/// JWT claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID, stringified per JWT convention.
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    /// Issued at (UTC timestamp).
    pub iat: i64,
    /// Expiration time (UTC timestamp).
    pub exp: i64,
}

impl Claims {
    /// The user ID carried by the token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the subject isn't a valid ID.
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// Fields accepted at registration.
#[derive(Debug)]
pub struct Registration<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: Option<&'a str>,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    jwt: &'a JwtConfig,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, jwt: &'a JwtConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    // =========================================================================
    // Registration & login
    // =========================================================================

    /// Register a new user and issue their first token.
    ///
    /// The user row and their empty cart are created together.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        registration: Registration<'_>,
    ) -> Result<(User, String), AuthError> {
        let email = Email::parse(registration.email)?;
        validate_password(registration.password)?;

        let password_hash = hash_password(registration.password)?;

        let user = self
            .users
            .create(NewUser {
                email: &email,
                password_hash: &password_hash,
                first_name: registration.first_name,
                last_name: registration.last_name,
                phone: registration.phone,
                role: UserRole::Customer,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        let token = self.issue_token(&user)?;

        Ok((user, token))
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self.users.get_by_email(&email).await?;

        let Some(user) = user else {
            // Burn the same hashing work as the known-email path before
            // rejecting, so response timing doesn't reveal which emails exist.
            let _ = verify_password(password, DUMMY_PASSWORD_HASH);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &user.password_hash)?;

        let token = self.issue_token(&user)?;

        Ok((user, token))
    }

    // =========================================================================
    // Password reset
    // =========================================================================

    /// Start a password reset: store a fresh token with a one-hour expiry.
    ///
    /// Returns the token; whether to expose it to the client is the caller's
    /// decision (only outside production).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account has this email.
    pub async fn forgot_password(&self, email: &str) -> Result<String, AuthError> {
        let email = Email::parse(email)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let token = Alphanumeric.sample_string(&mut rand::rng(), RESET_TOKEN_LENGTH);
        let expiry = Utc::now() + Duration::seconds(RESET_TOKEN_TTL_SECS);

        self.users.set_reset_token(user.id, &token, expiry).await?;

        Ok(token)
    }

    /// Complete a password reset: consume the token and store the new hash.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidResetToken` if the token is unknown or expired.
    /// Returns `AuthError::WeakPassword` if the new password doesn't meet requirements.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        validate_password(new_password)?;

        let user = self
            .users
            .get_by_reset_token(token)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        let password_hash = hash_password(new_password)?;
        self.users.update_password(user.id, &password_hash).await?;

        Ok(())
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Issue a signed JWT for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenEncoding` if signing fails.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.jwt.expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.to_string(),
            role: user.role,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt.secret.expose_secret().as_bytes()),
        )
        .map_err(|_| AuthError::TokenEncoding)
    }
}

/// Verify a JWT against the configured secret.
///
/// Free function so extractors can verify without constructing a service.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` if the token is malformed, has a bad
/// signature, or is expired.
pub fn verify_token(token: &str, jwt: &JwtConfig) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(jwt.secret.expose_secret().as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// Public so the CLI's seed and admin-create commands hash the same way.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: SecretString::from("k9Qw3rT8uZx2Vb5nM1pL7sD4fG6hJ0aE"),
            expiry_hours: 1,
        }
    }

    fn test_user() -> User {
        User {
            id: UserId::new(42),
            email: Email::parse("jane@example.com").expect("valid email"),
            password_hash: String::new(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            phone: None,
            role: UserRole::Customer,
            is_verified: true,
            reset_token: None,
            reset_token_expiry: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("long-enough-password").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_dummy_hash_is_parseable() {
        // The unknown-email login path relies on this constant being a valid
        // PHC string; verification must run (and fail), not short-circuit.
        assert!(PasswordHash::new(DUMMY_PASSWORD_HASH).is_ok());
    }

    #[test]
    fn test_token_roundtrip() {
        let jwt = test_jwt_config();
        let user = test_user();

        let service_claims = {
            let now = Utc::now();
            Claims {
                sub: user.id.to_string(),
                email: user.email.to_string(),
                role: user.role,
                iat: now.timestamp(),
                exp: (now + Duration::hours(1)).timestamp(),
            }
        };

        let token = encode(
            &Header::default(),
            &service_claims,
            &EncodingKey::from_secret(jwt.secret.expose_secret().as_bytes()),
        )
        .expect("encode");

        let claims = verify_token(&token, &jwt).expect("verify");
        assert_eq!(claims.user_id().expect("user id"), UserId::new(42));
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.role, UserRole::Customer);
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = test_jwt_config();
        let now = Utc::now();

        let claims = Claims {
            sub: "1".to_string(),
            email: "jane@example.com".to_string(),
            role: UserRole::Customer,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(jwt.secret.expose_secret().as_bytes()),
        )
        .expect("encode");

        assert!(matches!(
            verify_token(&token, &jwt),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let jwt = test_jwt_config();
        let other = JwtConfig {
            secret: SecretString::from("Zx8vB2nM6qW4eR1tY7uI3oP5aS9dF0gH"),
            expiry_hours: 1,
        };

        let now = Utc::now();
        let claims = Claims {
            sub: "1".to_string(),
            email: "jane@example.com".to_string(),
            role: UserRole::Admin,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(other.secret.expose_secret().as_bytes()),
        )
        .expect("encode");

        assert!(matches!(
            verify_token(&token, &jwt),
            Err(AuthError::InvalidToken)
        ));
    }
}
