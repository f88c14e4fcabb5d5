//! HTTP client for the WasiGo JSON API. Every outbound request goes through
//! `ApiClient::request`, which joins the configured base URL, encodes query and
//! body, attaches the bearer token and normalizes success and error envelopes.
//! The client holds the token but never logs it; there is no retry, queue or
//! deduplication here.

use super::{
    config::AppConfig,
    errors::ApiError,
    storage::{Storage, TOKEN_KEY},
};
use crate::APP_USER_AGENT;
use reqwest::{header::ACCEPT, Client, Method, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, instrument, warn};
use url::Url;

/// Success envelope returned by the API.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(rename = "statusCode")]
    pub status_code: Option<u16>,
    pub error: Option<String>,
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self {
            data: None,
            message: None,
            status_code: None,
            error: None,
        }
    }
}

impl<T> ApiResponse<T> {
    /// Returns the payload, failing when the server sent none.
    ///
    /// # Errors
    /// Returns `ApiError::Parse` when `data` is absent.
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::Parse("Response did not include data".to_string()))
    }
}

/// Page size list endpoints use when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// `limit`/`offset` paging shared by the list endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    token: RwLock<Option<SecretString>>,
    storage: Arc<dyn Storage>,
}

impl ApiClient {
    /// Builds the client and loads any persisted token.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the underlying HTTP client cannot be built.
    pub fn new(config: &AppConfig, storage: Arc<dyn Storage>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        let token = storage
            .get(TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
            .map(SecretString::from);

        Ok(Self {
            http,
            base_url: config.api_base_url.trim().trim_end_matches('/').to_string(),
            token: RwLock::new(token),
            storage,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Stores the token in memory and persisted storage; `None` clears both.
    ///
    /// # Errors
    /// Returns `ApiError::Storage` when the persisted copy cannot be updated;
    /// the in-memory token is updated regardless.
    pub fn set_token(&self, token: Option<&str>) -> Result<(), ApiError> {
        let token = token.map(str::trim).filter(|token| !token.is_empty());

        *self.token.write().unwrap_or_else(PoisonError::into_inner) =
            token.map(|token| SecretString::from(token.to_string()));

        match token {
            Some(token) => self.storage.set(TOKEN_KEY, token)?,
            None => self.storage.remove(TOKEN_KEY)?,
        }

        Ok(())
    }

    /// Issues one request and decodes the envelope.
    ///
    /// # Errors
    /// Returns `ApiError::Http` for non-success statuses, `ApiError::Network` or
    /// `ApiError::Timeout` when the server cannot be reached, and
    /// `ApiError::Parse` when the body is not a valid envelope.
    #[instrument(skip(self, body, query))]
    pub async fn request<T, B, Q>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&Q>,
    ) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");

        if let Some(query) = query {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(token) = self.token() {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await.map_err(map_request_error)?;

        handle_response(response).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.request::<T, (), ()>(Method::GET, path, None, None)
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request::<T, (), Q>(Method::GET, path, None, Some(query))
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request::<T, B, ()>(Method::POST, path, Some(body), None)
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.request::<T, (), ()>(Method::POST, path, None, None)
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request::<T, B, ()>(Method::PATCH, path, Some(body), None)
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.request::<T, (), ()>(Method::PATCH, path, None, None)
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request::<T, B, ()>(Method::PUT, path, Some(body), None)
            .await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.request::<T, (), ()>(Method::DELETE, path, None, None)
            .await
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let url = build_url_with_base(&self.base_url, path);
        Url::parse(&url).map_err(|err| ApiError::Config(format!("Invalid API URL {url}: {err}")))
    }
}

/// Validates an id before it is placed into a request path.
///
/// # Errors
/// Returns `ApiError::Config` when the id is blank or contains a path separator.
pub fn path_id<'a>(id: &'a str, what: &str) -> Result<&'a str, ApiError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Config(format!("{what} id is required.")));
    }
    if trimmed.contains(['/', '?', '#']) {
        return Err(ApiError::Config(format!("{what} id is malformed.")));
    }
    Ok(trimmed)
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps transport errors into `ApiError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        ApiError::Serialization(format!("Failed to build request: {err}"))
    } else if err.is_decode() {
        ApiError::Parse(format!("Failed to read response: {err}"))
    } else {
        ApiError::Network(err.to_string())
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<ApiResponse<T>, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_request_error)?;

    if status.is_success() {
        decode_envelope(&body)
    } else {
        let err = http_error(status.as_u16(), &body);
        warn!("API request failed ({}): {}", status.as_u16(), err);
        Err(err)
    }
}

fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<ApiResponse<T>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        debug!("empty response body");
        return Ok(ApiResponse::default());
    }

    serde_json::from_slice(body)
        .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
}

fn http_error(status: u16, body: &[u8]) -> ApiError {
    let details: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    let message = error_message(status, &details);

    ApiError::Http {
        status,
        message,
        details,
    }
}

/// Extracts the human readable message from an error envelope.
#[must_use]
pub fn error_message(status: u16, details: &Value) -> String {
    match details.get("message") {
        Some(Value::String(message)) if !message.trim().is_empty() => message.clone(),
        Some(Value::Array(messages)) if !messages.is_empty() => messages
            .iter()
            .map(|message| {
                message
                    .as_str()
                    .map_or_else(|| message.to_string(), str::to_string)
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => format!("Error: {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{build_url_with_base, decode_envelope, error_message, http_error, path_id, ApiResponse};
    use crate::app_lib::ApiError;
    use serde_json::{json, Value};

    #[test]
    fn build_url_joins_base_and_path() {
        assert_eq!(
            build_url_with_base("http://localhost:3000/api/", "/auth/login"),
            "http://localhost:3000/api/auth/login"
        );
        assert_eq!(
            build_url_with_base("http://localhost:3000/api", "routes/search"),
            "http://localhost:3000/api/routes/search"
        );
        assert_eq!(build_url_with_base("  ", "/auth/login"), "/auth/login");
    }

    #[test]
    fn error_message_handles_string_array_and_missing() {
        assert_eq!(
            error_message(401, &json!({ "message": "Credenciales inválidas" })),
            "Credenciales inválidas"
        );
        assert_eq!(
            error_message(
                400,
                &json!({ "message": ["email must be an email", "password too short"] })
            ),
            "email must be an email, password too short"
        );
        assert_eq!(error_message(503, &json!({ "error": "down" })), "Error: 503");
        assert_eq!(error_message(404, &Value::Null), "Error: 404");
    }

    #[test]
    fn http_error_keeps_raw_details() {
        let err = http_error(422, br#"{"message":["bad"],"statusCode":422}"#);
        match err {
            ApiError::Http {
                status,
                message,
                details,
            } => {
                assert_eq!(status, 422);
                assert_eq!(message, "bad");
                assert_eq!(details["statusCode"], json!(422));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn http_error_with_html_body_uses_status_fallback() {
        let err = http_error(502, b"<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), "Error: 502");
        assert!(err.details().is_none());
    }

    #[test]
    fn empty_success_body_is_empty_envelope() {
        let envelope: ApiResponse<Value> = decode_envelope(b"  ").unwrap_or_default();
        assert!(envelope.data.is_none());
        assert!(envelope.message.is_none());
    }

    #[test]
    fn malformed_success_body_is_parse_error() {
        let result: Result<ApiResponse<Value>, _> = decode_envelope(b"not json");
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[test]
    fn path_id_rejects_blank_and_separators() {
        assert_eq!(path_id(" 42 ", "Route").ok(), Some("42"));
        assert!(path_id("", "Route").is_err());
        assert!(path_id("../admin", "Route").is_err());
    }
}
