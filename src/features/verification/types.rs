use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfirmCodeRequest {
    pub code: String,
}

/// Returned by `/verification/send/:userId`. Development backends echo the
/// code back; production ones leave it out.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentCode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in_minutes: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConfirmedCode {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Value,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingAttempts {
    #[serde(default)]
    pub remaining: u32,
}
