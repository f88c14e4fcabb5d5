//! Client wrappers for the auth endpoints. These are pass-through calls: no
//! validation, caching or retries, and no session state is touched here.

use crate::{
    app_lib::{ApiClient, ApiError, ApiResponse},
    features::auth::types::{
        AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginCredentials,
        MessageResponse, RegisterData, RegisterResponse, ResetPasswordRequest,
    },
};
use serde_json::Value;
use tracing::instrument;

/// Registers a new account. The password must never be logged.
///
/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip_all)]
pub async fn register(
    api: &ApiClient,
    data: &RegisterData,
) -> Result<ApiResponse<RegisterResponse>, ApiError> {
    api.post("/auth/register", data).await
}

/// Exchanges credentials for a bearer token.
///
/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip_all)]
pub async fn login(
    api: &ApiClient,
    credentials: &LoginCredentials,
) -> Result<ApiResponse<AuthResponse>, ApiError> {
    api.post("/auth/login", credentials).await
}

/// Invalidates the token server side.
///
/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip_all)]
pub async fn logout(api: &ApiClient) -> Result<ApiResponse<Value>, ApiError> {
    api.post_empty("/auth/logout").await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip_all)]
pub async fn forgot_password(
    api: &ApiClient,
    request: &ForgotPasswordRequest,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    api.post("/auth/forgot-password", request).await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip_all)]
pub async fn reset_password(
    api: &ApiClient,
    request: &ResetPasswordRequest,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    api.post("/auth/reset-password", request).await
}

/// Requires an authenticated session.
///
/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip_all)]
pub async fn change_password(
    api: &ApiClient,
    request: &ChangePasswordRequest,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    api.patch("/auth/change-password", request).await
}
