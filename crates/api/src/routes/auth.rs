//! Authentication routes: register, login, password reset.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::user::PublicUser;
use crate::response::ApiResponse;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /api/auth/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for `POST /api/auth/reset-password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Response payload carrying a user and their token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
}

/// POST /api/auth/register
///
/// Duplicate emails are rejected with 400 and no user row is created.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), &state.config().jwt);

    let (user, token) = auth
        .register(Registration {
            email: &req.email,
            password: &req.password,
            first_name: &req.first_name,
            last_name: &req.last_name,
            phone: req.phone.as_deref(),
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), &state.config().jwt);

    let (user, token) = auth.login(&req.email, &req.password).await?;

    Ok(ApiResponse::success(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// POST /api/auth/forgot-password
///
/// The generated token is echoed in the response only outside production;
/// a real deployment delivers it by email.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), &state.config().jwt);

    let token = auth.forgot_password(&req.email).await?;

    let response = if state.config().environment.is_production() {
        ApiResponse {
            status: "success",
            data: None,
            message: Some("Password reset token generated".to_string()),
        }
    } else {
        ApiResponse {
            status: "success",
            data: Some(serde_json::json!({ "resetToken": token })),
            message: Some("Password reset token generated".to_string()),
        }
    };

    Ok(Json(response))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), &state.config().jwt);

    auth.reset_password(&req.token, &req.new_password).await?;

    Ok(ApiResponse::message("Password reset successful"))
}
