//! Driver endpoints. Everything except `get_driver` acts on the signed-in driver.

use super::types::{
    Availability, DriverProfile, DriverRequest, DriverRequestAccepted, DriverStats, TripHistory,
    UpdateDriverProfile,
};
use crate::{
    app_lib::{api::path_id, ApiClient, ApiError, ApiResponse, PageQuery},
    features::auth::types::MessageResponse,
};
use serde::Serialize;
use tracing::instrument;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityUpdate {
    is_available: bool,
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn profile(api: &ApiClient) -> Result<ApiResponse<DriverProfile>, ApiError> {
    api.get("/drivers/profile").await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn get_driver(api: &ApiClient, id: &str) -> Result<ApiResponse<DriverProfile>, ApiError> {
    let id = path_id(id, "Driver")?;
    api.get(&format!("/drivers/{id}")).await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn update_profile(
    api: &ApiClient,
    changes: &UpdateDriverProfile,
) -> Result<ApiResponse<DriverProfile>, ApiError> {
    api.patch("/drivers/profile", changes).await
}

/// Applies for a driver account with the given vehicle.
///
/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn request_driver(
    api: &ApiClient,
    request: &DriverRequest,
) -> Result<ApiResponse<DriverRequestAccepted>, ApiError> {
    api.post("/drivers/request", request).await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn trip_history(api: &ApiClient, page: PageQuery) -> Result<ApiResponse<TripHistory>, ApiError> {
    api.get_with_query("/drivers/trips/history", &page).await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn stats(api: &ApiClient) -> Result<ApiResponse<DriverStats>, ApiError> {
    api.get("/drivers/stats").await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn availability(api: &ApiClient) -> Result<ApiResponse<Availability>, ApiError> {
    api.get("/drivers/availability").await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn update_availability(
    api: &ApiClient,
    is_available: bool,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    api.patch("/drivers/availability", &AvailabilityUpdate { is_available })
        .await
}
