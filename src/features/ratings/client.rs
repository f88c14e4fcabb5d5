//! Rating endpoints.

use super::types::{AverageRating, CreateRating, Rating, RatingPage, UpdateRating};
use crate::{
    app_lib::{api::path_id, ApiClient, ApiError, ApiResponse, PageQuery},
    features::auth::types::MessageResponse,
};
use tracing::instrument;

/// Highest score a trip can receive.
pub const MAX_SCORE: u8 = 5;

fn check_score(score: u8) -> Result<(), ApiError> {
    if (1..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(ApiError::Config(format!("Rating must be between 1 and {MAX_SCORE}.")))
    }
}

/// # Errors
/// Returns `ApiError::Config` for a score outside 1 to 5, otherwise whatever
/// the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn create_rating(api: &ApiClient, rating: &CreateRating) -> Result<ApiResponse<Rating>, ApiError> {
    check_score(rating.score)?;
    api.post("/ratings", rating).await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn received_ratings(api: &ApiClient, page: PageQuery) -> Result<ApiResponse<RatingPage>, ApiError> {
    api.get_with_query("/ratings/received", &page).await
}

/// # Errors
/// Returns whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn given_ratings(api: &ApiClient, page: PageQuery) -> Result<ApiResponse<RatingPage>, ApiError> {
    api.get_with_query("/ratings/given", &page).await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn average_rating(api: &ApiClient, user_id: &str) -> Result<ApiResponse<AverageRating>, ApiError> {
    let user_id = path_id(user_id, "User")?;
    api.get(&format!("/ratings/average/{user_id}")).await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id or bad score, otherwise whatever
/// the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn update_rating(
    api: &ApiClient,
    id: &str,
    changes: &UpdateRating,
) -> Result<ApiResponse<Rating>, ApiError> {
    let id = path_id(id, "Rating")?;
    if let Some(score) = changes.score {
        check_score(score)?;
    }
    api.patch(&format!("/ratings/{id}"), changes).await
}

/// # Errors
/// Returns `ApiError::Config` for a blank id, otherwise whatever the HTTP client surfaces.
#[instrument(skip(api))]
pub async fn delete_rating(api: &ApiClient, id: &str) -> Result<ApiResponse<MessageResponse>, ApiError> {
    let id = path_id(id, "Rating")?;
    api.delete(&format!("/ratings/{id}")).await
}

#[cfg(test)]
mod tests {
    use super::{average_rating, create_rating, delete_rating, received_ratings};
    use crate::{
        app_lib::{test_support::api_for, ApiError, PageQuery},
        features::ratings::types::{CreateRating, RatingKind},
    };
    use anyhow::Result;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn create_posts_backend_fields() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ratings"))
            .and(body_json(json!({ "viajeId": "t-1", "calificacion": 5, "tipo": "conductor" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {
                    "id": "rt-1",
                    "de": { "id": "u-1" },
                    "para": { "id": "d-1" },
                    "viaje": { "id": "t-1" },
                    "calificacion": 5,
                    "tipo": "conductor"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server)?;
        let rating = create_rating(
            &api,
            &CreateRating {
                trip_id: "t-1".into(),
                score: 5,
                comment: None,
                kind: RatingKind::Driver,
            },
        )
        .await?
        .into_data()?;
        assert_eq!(rating.kind, RatingKind::Driver);
        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_score_is_refused() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let api = api_for(&server)?;
        let err = create_rating(
            &api,
            &CreateRating {
                trip_id: "t-1".into(),
                score: 6,
                comment: None,
                kind: RatingKind::Passenger,
            },
        )
        .await
        .err();
        assert!(matches!(err, Some(ApiError::Config(_))));
        Ok(())
    }

    #[tokio::test]
    async fn received_is_paged() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ratings/received"))
            .and(query_param("limit", "10"))
            .and(query_param("offset", "0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "ratings": [], "total": 0 } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server)?;
        received_ratings(&api, PageQuery::default()).await?;
        Ok(())
    }

    #[tokio::test]
    async fn average_and_delete() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ratings/average/d-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "promedio": 4.5, "total": 12 } })),
            )
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/ratings/rt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "message": "Eliminada" } })))
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server)?;
        let average = average_rating(&api, "d-1").await?.into_data()?;
        assert_eq!(average.total, 12);
        assert!((average.average - 4.5).abs() < f64::EPSILON);
        assert_eq!(delete_rating(&api, "rt-1").await?.into_data()?.message, "Eliminada");
        Ok(())
    }
}
