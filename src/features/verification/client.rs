//! Verification endpoints, all keyed by user id.

use super::types::{ConfirmCodeRequest, ConfirmedCode, RemainingAttempts, SentCode};
use crate::app_lib::{api::path_id, ApiClient, ApiError, ApiResponse};
use serde_json::json;
use tracing::instrument;

/// Asks the backend to email a fresh code.
///
/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn send_verification(
    api: &ApiClient,
    user_id: &str,
) -> Result<ApiResponse<SentCode>, ApiError> {
    let user_id = path_id(user_id, "User")?;
    api.post(&format!("/verification/send/{user_id}"), &json!({}))
        .await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api, request))]
pub async fn confirm_verification(
    api: &ApiClient,
    user_id: &str,
    request: &ConfirmCodeRequest,
) -> Result<ApiResponse<ConfirmedCode>, ApiError> {
    let user_id = path_id(user_id, "User")?;
    api.post(&format!("/verification/confirm/{user_id}"), request)
        .await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn remaining_attempts(
    api: &ApiClient,
    user_id: &str,
) -> Result<ApiResponse<RemainingAttempts>, ApiError> {
    let user_id = path_id(user_id, "User")?;
    api.get(&format!("/verification/attempts/{user_id}")).await
}
