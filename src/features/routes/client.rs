//! Route endpoints. Searching and reading are open to any signed-in user;
//! creating, updating and cancelling need a driver account.

use super::types::{
    CancelReason, Coordinates, CreateRoute, MatchQuery, MyRoutesQuery, NearbyQuery, Route,
    RouteList, RoutePage, RouteStatus, SearchRoutes, UpdateRoute,
};
use crate::{
    app_lib::{api::path_id, ApiClient, ApiError, ApiResponse, PageQuery},
    features::auth::types::MessageResponse,
};
use tracing::instrument;

/// Default search radius for `/routes/nearby`, in kilometres.
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn search_routes(
    api: &ApiClient,
    params: &SearchRoutes,
) -> Result<ApiResponse<RoutePage>, ApiError> {
    api.get_with_query("/routes/search", params).await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn get_route(api: &ApiClient, id: &str) -> Result<ApiResponse<Route>, ApiError> {
    let id = path_id(id, "Route")?;
    api.get(&format!("/routes/{id}")).await
}

/// Routes published by the signed-in driver, optionally filtered by status.
///
/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn my_routes(
    api: &ApiClient,
    status: Option<RouteStatus>,
    page: PageQuery,
) -> Result<ApiResponse<RoutePage>, ApiError> {
    let query = MyRoutesQuery {
        estado: status,
        limit: page.limit,
        offset: page.offset,
    };
    api.get_with_query("/routes/my-routes", &query).await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip_all)]
pub async fn create_route(api: &ApiClient, route: &CreateRoute) -> Result<ApiResponse<Route>, ApiError> {
    api.post("/routes", route).await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api, changes))]
pub async fn update_route(
    api: &ApiClient,
    id: &str,
    changes: &UpdateRoute,
) -> Result<ApiResponse<Route>, ApiError> {
    let id = path_id(id, "Route")?;
    api.patch(&format!("/routes/{id}"), changes).await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api, reason))]
pub async fn cancel_route(
    api: &ApiClient,
    id: &str,
    reason: Option<&str>,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    let id = path_id(id, "Route")?;
    let body = CancelReason {
        reason: reason.map(str::to_string),
    };
    api.patch(&format!("/routes/{id}/cancel"), &body).await
}

/// Routes departing within `radius_km` of a point; `None` uses the default radius.
///
/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn nearby_routes(
    api: &ApiClient,
    latitude: f64,
    longitude: f64,
    radius_km: Option<f64>,
) -> Result<ApiResponse<RouteList>, ApiError> {
    let query = NearbyQuery {
        latitud: latitude,
        longitud: longitude,
        radio: radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM),
    };
    api.get_with_query("/routes/nearby", &query).await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn match_routes(
    api: &ApiClient,
    origin: Coordinates,
    destination: Coordinates,
) -> Result<ApiResponse<RouteList>, ApiError> {
    let query = MatchQuery {
        origen_latitud: origin.latitude,
        origen_longitud: origin.longitude,
        destino_latitud: destination.latitude,
        destino_longitud: destination.longitude,
    };
    api.get_with_query("/routes/match", &query).await
}
