//! Passenger profile, wallet and payment method endpoints.

use super::types::{
    Balance, NewPaymentMethod, PassengerProfile, PassengerStats, PaymentMethodAdded, Recharge,
    RechargeReceipt, UpdatePassengerProfile,
};
use crate::{
    app_lib::{api::path_id, ApiClient, ApiError, ApiResponse, PageQuery},
    features::{auth::types::MessageResponse, drivers::types::TripHistory},
};
use serde_json::Value;
use tracing::instrument;

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn profile(api: &ApiClient) -> Result<ApiResponse<PassengerProfile>, ApiError> {
    api.get("/passengers/profile").await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn get_passenger(api: &ApiClient, id: &str) -> Result<ApiResponse<PassengerProfile>, ApiError> {
    let id = path_id(id, "Passenger")?;
    api.get(&format!("/passengers/{id}")).await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip_all)]
pub async fn update_profile(
    api: &ApiClient,
    changes: &UpdatePassengerProfile,
) -> Result<ApiResponse<PassengerProfile>, ApiError> {
    api.patch("/passengers/profile", changes).await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn trip_history(api: &ApiClient, page: PageQuery) -> Result<ApiResponse<TripHistory>, ApiError> {
    api.get_with_query("/passengers/trips/history", &page).await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn stats(api: &ApiClient) -> Result<ApiResponse<PassengerStats>, ApiError> {
    api.get("/passengers/stats").await
}

/// Payment details are never logged.
///
/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip_all)]
pub async fn add_payment_method(
    api: &ApiClient,
    method: &NewPaymentMethod,
) -> Result<ApiResponse<PaymentMethodAdded>, ApiError> {
    api.post("/passengers/payment-methods", method).await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn payment_methods(api: &ApiClient) -> Result<ApiResponse<Vec<Value>>, ApiError> {
    api.get("/passengers/payment-methods").await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn delete_payment_method(
    api: &ApiClient,
    id: &str,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    let id = path_id(id, "Payment method")?;
    api.delete(&format!("/passengers/payment-methods/{id}"))
        .await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn balance(api: &ApiClient) -> Result<ApiResponse<Balance>, ApiError> {
    api.get("/passengers/balance").await
}

/// # Errors
/// Returns `ApiError::Config` for a non-positive amount, otherwise whatever
/// the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn recharge_balance(
    api: &ApiClient,
    amount: f64,
    payment_method: &str,
) -> Result<ApiResponse<RechargeReceipt>, ApiError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::Config("Recharge amount must be positive.".to_string()));
    }
    let body = Recharge {
        amount,
        payment_method: payment_method.to_string(),
    };
    api.post("/passengers/balance/recharge", &body).await
}
