use super::storage::StorageError;
use serde_json::Value;
use thiserror::Error;

/// Status code reported for failures that never produced an HTTP response.
pub const FALLBACK_STATUS: u16 = 500;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Unable to reach the server: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        details: Value,
    },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("Request cancelled")]
    Cancelled,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// HTTP status of the failure, 500 when the server never answered.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Http { status, .. } => *status,
            _ => FALLBACK_STATUS,
        }
    }

    /// Raw error payload returned by the server, if any.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        match self {
            ApiError::Http { details, .. } if !details.is_null() => Some(details),
            _ => None,
        }
    }

    /// Single line shown to the user: the first validation message when the
    /// server returned a list, otherwise the error text itself.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.details()
            .and_then(|details| details.get("message"))
            .and_then(Value::as_array)
            .and_then(|messages| messages.first())
            .and_then(Value::as_str)
            .map_or_else(|| self.to_string(), str::to_string)
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use serde_json::json;

    #[test]
    fn http_error_reports_status_and_details() {
        let err = ApiError::Http {
            status: 409,
            message: "Email already registered".to_string(),
            details: json!({ "message": "Email already registered", "statusCode": 409 }),
        };

        assert_eq!(err.status_code(), 409);
        assert_eq!(err.to_string(), "Email already registered");
        assert_eq!(
            err.details().and_then(|d| d.get("statusCode")).cloned(),
            Some(json!(409))
        );
    }

    #[test]
    fn non_http_errors_default_to_500() {
        assert_eq!(ApiError::Network("connection refused".into()).status_code(), 500);
        assert_eq!(ApiError::Parse("bad json".into()).status_code(), 500);
        assert_eq!(ApiError::Cancelled.status_code(), 500);
        assert!(ApiError::Cancelled.details().is_none());
    }

    #[test]
    fn user_message_prefers_first_validation_message() {
        let err = ApiError::Http {
            status: 400,
            message: "email must be an email, password is too short".to_string(),
            details: json!({ "message": ["email must be an email", "password is too short"] }),
        };

        assert_eq!(err.user_message(), "email must be an email");
    }

    #[test]
    fn user_message_falls_back_to_display() {
        let err = ApiError::Http {
            status: 502,
            message: "Error: 502".to_string(),
            details: serde_json::Value::Null,
        };

        assert_eq!(err.user_message(), "Error: 502");
        assert_eq!(
            ApiError::Timeout("Request timed out.".into()).user_message(),
            "Timeout: Request timed out."
        );
    }
}
