//! Profile and address routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use rosewood_core::AddressId;

use crate::db::addresses::{AddressRepository, NewAddress};
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::user::PublicUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `PUT /api/users/profile`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Request body for creating or replacing an address.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub full_name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl AddressRequest {
    fn as_new_address(&self) -> NewAddress<'_> {
        NewAddress {
            full_name: &self.full_name,
            line1: &self.line1,
            line2: self.line2.as_deref(),
            city: &self.city,
            state: &self.state,
            postal_code: &self.postal_code,
            country: &self.country,
            phone: self.phone.as_deref(),
            is_default: self.is_default,
        }
    }
}

/// GET /api/users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let profile = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::success(PublicUser::from(profile)))
}

/// PUT /api/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    let updated = UserRepository::new(state.pool())
        .update_profile(user.id, &req.first_name, &req.last_name, req.phone.as_deref())
        .await?;

    Ok(ApiResponse::success(PublicUser::from(updated)))
}

/// GET /api/users/addresses
pub async fn list_addresses(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let addresses = AddressRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(ApiResponse::success(addresses))
}

/// POST /api/users/addresses
pub async fn create_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<AddressRequest>,
) -> Result<impl IntoResponse> {
    let address = AddressRepository::new(state.pool())
        .create(user.id, req.as_new_address())
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(address)))
}

/// PUT /api/users/addresses/{id}
pub async fn update_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
    Json(req): Json<AddressRequest>,
) -> Result<impl IntoResponse> {
    let address = AddressRepository::new(state.pool())
        .update(id, user.id, req.as_new_address())
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Address not found".to_string())
            }
            other => AppError::Repository(other),
        })?;

    Ok(ApiResponse::success(address))
}

/// DELETE /api/users/addresses/{id}
pub async fn delete_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<impl IntoResponse> {
    AddressRepository::new(state.pool())
        .delete(id, user.id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Address not found".to_string())
            }
            other => AppError::Repository(other),
        })?;

    Ok(ApiResponse::message("Address deleted successfully"))
}
