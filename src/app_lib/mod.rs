//! Shared client utilities: the HTTP client, persisted storage, configuration,
//! errors, cancellation and form validation.
//!
//! ## Session flow
//!
//! 1. **Login:** the form validates the institutional email and password
//!    length, then POSTs `/auth/login`. The returned bearer token is stored
//!    under `access_token` and the converted user under `user_data`.
//! 2. **Verification:** unverified accounts request a 6-digit code with
//!    `/verification/send/:userId` and confirm it with
//!    `/verification/confirm/:userId`.
//! 3. **Restore:** on start the session reads both keys back; a corrupt user
//!    snapshot is dropped and the session starts anonymous.
//!
//! Feature clients go through these helpers so that request setup and error
//! normalization live in one place. Callers must not log tokens or passwords.

pub mod api;
pub mod cancel;
pub mod config;
pub mod errors;
pub mod storage;
pub mod validation;

pub use api::{ApiClient, ApiResponse, PageQuery};
pub use cancel::cancellable;
pub use config::{AppConfig, ConfigOverrides};
pub use errors::ApiError;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use validation::ValidationError;

#[cfg(test)]
pub(crate) mod test_support;
