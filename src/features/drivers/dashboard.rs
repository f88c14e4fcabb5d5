//! Driver home screen: available routes and earnings, fetched together.

use super::{client, types::DriverStats};
use crate::{
    app_lib::{ApiClient, ApiError, PageQuery},
    features::routes::{
        self,
        types::{Route, RouteStatus},
    },
};
use serde::Serialize;
use tracing::instrument;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverHome {
    pub routes: Vec<Route>,
    pub total_routes: u64,
    pub stats: DriverStats,
}

/// Loads both halves of the driver home concurrently. The two reads are
/// independent; the first failure is returned and the other result dropped.
///
/// # Errors
/// Returns the first error either request produces.
#[instrument(skip(api))]
pub async fn load_driver_home(api: &ApiClient) -> Result<DriverHome, ApiError> {
    let (routes, stats) = tokio::try_join!(
        routes::client::my_routes(api, Some(RouteStatus::Available), PageQuery::default()),
        client::stats(api),
    )?;

    let page = routes.data.unwrap_or_default();
    Ok(DriverHome {
        routes: page.routes,
        total_routes: page.total,
        stats: stats.data.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::load_driver_home;
    use crate::app_lib::{test_support::api_for, ApiError};
    use anyhow::Result;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_routes_and_stats_together() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/routes/my-routes"))
            .and(query_param("estado", "disponible"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "routes": [], "total": 4 } }))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/drivers/stats"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "totalTrips": 42, "totalEarnings": 310.5 } }))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server)?;
        let started = std::time::Instant::now();
        let home = load_driver_home(&api).await?;

        assert_eq!(home.total_routes, 4);
        assert_eq!(home.stats.total_trips, 42);
        // both delays overlap
        assert!(started.elapsed() < Duration::from_millis(390));
        Ok(())
    }

    #[tokio::test]
    async fn first_failure_wins() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/routes/my-routes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "routes": [] } })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/drivers/stats"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Forbidden resource" })))
            .mount(&server)
            .await;

        let api = api_for(&server)?;
        match load_driver_home(&api).await {
            Err(ApiError::Http { status, .. }) => assert_eq!(status, 403),
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }
}
