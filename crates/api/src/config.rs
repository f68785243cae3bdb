//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `JWT_SECRET` - Token signing secret (min 32 chars, not a placeholder)
//!
//! ## Optional
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 8080)
//! - `APP_ENV` - `development` or `production` (default: development)
//! - `JWT_EXPIRY_HOURS` - Token lifetime in hours (default: 168 = 7 days)
//! - `PAYMENT_SECRET_KEY` - Payment gateway secret key; card payments are
//!   rejected when unset
//! - `PAYMENT_API_BASE` - Gateway base URL (default: <https://api.stripe.com>)
//! - `PAYMENT_CURRENCY` - ISO currency code for intents (default: inr)
//! - `CORS_ALLOW_ORIGIN` - Exact origin allowed for CORS; permissive when unset
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Deployment environment.
///
/// Controls whether diagnostic detail (error sources, reset tokens) is
/// included in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Whether this is a production deployment.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// JWT issuance configuration.
#[derive(Clone)]
pub struct JwtConfig {
    /// Token signing secret.
    pub secret: SecretString,
    /// Token lifetime in hours.
    pub expiry_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiry_hours", &self.expiry_hours)
            .finish()
    }
}

/// Payment gateway configuration.
#[derive(Clone)]
pub struct PaymentConfig {
    /// Gateway secret key.
    pub secret_key: SecretString,
    /// Gateway base URL.
    pub api_base: String,
    /// ISO 4217 currency code used for payment intents.
    pub currency: String,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("secret_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("currency", &self.currency)
            .finish()
    }
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// JWT issuance settings
    pub jwt: JwtConfig,
    /// Payment gateway settings; `None` disables card payments
    pub payment: Option<PaymentConfig>,
    /// Exact CORS origin; permissive when unset
    pub cors_allow_origin: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the JWT secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = SecretString::from(get_required_env("DATABASE_URL")?);

        let host: IpAddr = get_env_or_default("API_HOST", "127.0.0.1")
            .parse()
            .map_err(|e| ConfigError::InvalidEnvVar("API_HOST".into(), format!("{e}")))?;

        let port: u16 = get_env_or_default("API_PORT", "8080")
            .parse()
            .map_err(|e| ConfigError::InvalidEnvVar("API_PORT".into(), format!("{e}")))?;

        let environment = match get_env_or_default("APP_ENV", "development").as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        };

        let jwt_secret = get_validated_secret("JWT_SECRET")?;
        let expiry_hours: i64 = get_env_or_default("JWT_EXPIRY_HOURS", "168")
            .parse()
            .map_err(|e| ConfigError::InvalidEnvVar("JWT_EXPIRY_HOURS".into(), format!("{e}")))?;

        let payment = std::env::var("PAYMENT_SECRET_KEY").ok().map(|key| PaymentConfig {
            secret_key: SecretString::from(key),
            api_base: get_env_or_default("PAYMENT_API_BASE", "https://api.stripe.com"),
            currency: get_env_or_default("PAYMENT_CURRENCY", "inr"),
        });

        Ok(Self {
            database_url,
            host,
            port,
            environment,
            jwt: JwtConfig {
                secret: jwt_secret,
                expiry_hours,
            },
            payment,
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN").ok(),
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
        })
    }

    /// The socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a secret is long enough and not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_JWT_SECRET_LENGTH} characters (got {})",
                secret.len()
            ),
        ));
    }

    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret_too_short() {
        let result = validate_secret_strength("short", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_placeholder() {
        let result = validate_secret_strength(
            "changeme-changeme-changeme-changeme",
            "TEST_VAR",
        );
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6f", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_environment_default() {
        assert!(!Environment::default().is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8080,
            environment: Environment::Development,
            jwt: JwtConfig {
                secret: SecretString::from("x".repeat(32)),
                expiry_hours: 168,
            },
            payment: None,
            cors_allow_origin: None,
            sentry_dsn: None,
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }
}
