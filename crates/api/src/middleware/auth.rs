//! Authentication extractors.
//!
//! Handlers declare their auth requirement through extractors: [`RequireAuth`]
//! for any signed-in user, [`RequireAdmin`] for operators. Both read the
//! `Authorization: Bearer <jwt>` header and verify the signature against the
//! configured secret; nothing is looked up in the database on the hot path.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use rosewood_core::{UserId, UserRole};

use crate::error::AppError;
use crate::services::auth;
use crate::state::AppState;

/// The authenticated caller, as carried by their token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub AuthUser);

/// Extractor that additionally requires the [`UserRole::Admin`] role.
///
/// Authorization is a match on the role enum; there is no string comparison
/// anywhere in the gate.
pub struct RequireAdmin(pub AuthUser);

fn authenticate(parts: &Parts, state: &AppState) -> Result<AuthUser, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Malformed authorization header".to_string()))?;

    let claims = auth::verify_token(token, &state.config().jwt)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    let id = claims
        .user_id()
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    Ok(AuthUser {
        id,
        email: claims.email,
        role: claims.role,
    })
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).map(Self)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state)?;

        if !user.role.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(Self(user))
    }
}
