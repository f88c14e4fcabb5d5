//! Client configuration with environment defaults and explicit overrides. The
//! environment is read once (`WASIGO_*`) and the CLI layers its flags on top, the
//! same way a static deployment layers runtime values over build-time ones.
//! Configuration values are public; do not store secrets here.

use crate::features::auth::ConcurrencyPolicy;
use std::{env, path::PathBuf, time::Duration};
use tracing::warn;

/// API base used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
/// Default request timeout applied to every HTTP call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub storage_dir: Option<PathBuf>,
    pub timeout: Duration,
    pub policy: ConcurrencyPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_dir: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            policy: ConcurrencyPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Loads defaults and applies `WASIGO_*` environment values.
    #[must_use]
    pub fn from_env() -> Self {
        let overrides = ConfigOverrides {
            api_base_url: read_env("WASIGO_API_URL"),
            storage_dir: read_env("WASIGO_STORAGE_DIR"),
            timeout_secs: read_env("WASIGO_TIMEOUT").and_then(|value| {
                value
                    .parse()
                    .map_err(|_| warn!("Ignoring invalid WASIGO_TIMEOUT: {value}"))
                    .ok()
            }),
            policy: read_env("WASIGO_POLICY").and_then(|value| {
                value
                    .parse()
                    .map_err(|err| warn!("Ignoring WASIGO_POLICY: {err}"))
                    .ok()
            }),
        };

        Self::default().with_overrides(overrides)
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        apply_overrides(&mut self, overrides);
        self
    }
}

/// Optional values layered over a base config; `None` keeps the base value.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub storage_dir: Option<String>,
    pub timeout_secs: Option<u64>,
    pub policy: Option<ConcurrencyPolicy>,
}

fn apply_overrides(config: &mut AppConfig, overrides: ConfigOverrides) {
    if let Some(value) = overrides.api_base_url.as_deref().and_then(normalize_value) {
        config.api_base_url = value;
    }
    if let Some(value) = overrides.storage_dir.as_deref().and_then(normalize_value) {
        config.storage_dir = Some(PathBuf::from(value));
    }
    if let Some(secs) = overrides.timeout_secs.filter(|secs| *secs > 0) {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(policy) = overrides.policy {
        config.policy = policy;
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().as_deref().and_then(normalize_value)
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
