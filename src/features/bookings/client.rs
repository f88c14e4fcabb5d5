//! Booking endpoints for passengers (reserve, cancel) and drivers (passenger
//! lists, boarding and arrival).

use super::types::{
    Booking, BookingList, BookingPage, BookingStatus, CancelBooking, CreateBooking,
    MyBookingsQuery,
};
use crate::{
    app_lib::{api::path_id, ApiClient, ApiError, ApiResponse, PageQuery},
    features::auth::types::MessageResponse,
};
use tracing::instrument;

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn my_bookings(
    api: &ApiClient,
    status: Option<BookingStatus>,
    page: PageQuery,
) -> Result<ApiResponse<BookingPage>, ApiError> {
    let query = MyBookingsQuery {
        estado: status,
        limit: page.limit,
        offset: page.offset,
    };
    api.get_with_query("/bookings/my-bookings", &query).await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn get_booking(api: &ApiClient, id: &str) -> Result<ApiResponse<Booking>, ApiError> {
    let id = path_id(id, "Booking")?;
    api.get(&format!("/bookings/{id}")).await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn create_booking(
    api: &ApiClient,
    booking: &CreateBooking,
) -> Result<ApiResponse<Booking>, ApiError> {
    api.post("/bookings", booking).await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api, request))]
pub async fn cancel_booking(
    api: &ApiClient,
    id: &str,
    request: &CancelBooking,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    let id = path_id(id, "Booking")?;
    api.patch(&format!("/bookings/{id}/cancel"), request).await
}

/// Bookings on one of the driver's routes.
///
/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn route_passengers(
    api: &ApiClient,
    route_id: &str,
) -> Result<ApiResponse<Vec<Booking>>, ApiError> {
    let route_id = path_id(route_id, "Route")?;
    api.get(&format!("/bookings/route/{route_id}/passengers"))
        .await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn confirm_arrival(api: &ApiClient, id: &str) -> Result<ApiResponse<MessageResponse>, ApiError> {
    let id = path_id(id, "Booking")?;
    api.patch_empty(&format!("/bookings/{id}/confirm-arrival"))
        .await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn start_trip(api: &ApiClient, id: &str) -> Result<ApiResponse<MessageResponse>, ApiError> {
    let id = path_id(id, "Booking")?;
    api.patch_empty(&format!("/bookings/{id}/start-trip"))
        .await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn active_bookings(api: &ApiClient) -> Result<ApiResponse<BookingList>, ApiError> {
    api.get("/bookings/active").await
}

#[cfg(test)]
mod tests {
    use super::{cancel_booking, my_bookings, route_passengers, start_trip};
    use crate::{
        app_lib::{test_support::api_for, ApiError, PageQuery},
        features::bookings::types::{BookingStatus, CancelBooking},
    };
    use anyhow::Result;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn my_bookings_omits_missing_status() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bookings/my-bookings"))
            .and(query_param_is_missing("estado"))
            .and(query_param("limit", "5"))
            .and(query_param("offset", "10"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "bookings": [], "total": 0 } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server)?;
        my_bookings(&api, None, PageQuery { limit: 5, offset: 10 }).await?;
        Ok(())
    }

    #[tokio::test]
    async fn filtered_by_status() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bookings/my-bookings"))
            .and(query_param("estado", "cancelado"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "bookings": [], "total": 0 } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server)?;
        my_bookings(&api, Some(BookingStatus::Cancelled), PageQuery::default()).await?;
        Ok(())
    }

    #[tokio::test]
    async fn cancel_requires_reason_body() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/bookings/b-1/cancel"))
            .and(body_json(json!({ "razon": "Cambio de planes" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "message": "ok" } })))
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server)?;
        cancel_booking(
            &api,
            "b-1",
            &CancelBooking {
                reason: "Cambio de planes".into(),
            },
        )
        .await?;
        Ok(())
    }

    #[tokio::test]
    async fn start_trip_has_no_body() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/bookings/b-1/start-trip"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "message": "ok" } })))
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server)?;
        assert_eq!(start_trip(&api, "b-1").await?.into_data()?.message, "ok");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_route_id_is_rejected() -> Result<()> {
        let server = MockServer::start().await;
        let api = api_for(&server)?;
        let err = route_passengers(&api, "r-1/../admin").await.err();
        assert!(matches!(err, Some(ApiError::Config(_))));
        Ok(())
    }
}
