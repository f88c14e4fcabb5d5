//! Ties in-flight calls to the lifetime of whatever started them. When the
//! token is cancelled the pending future is dropped and its late result is never
//! applied.

use super::errors::ApiError;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Races `future` against `cancel`, returning `ApiError::Cancelled` if the
/// token fires first.
///
/// # Errors
/// Returns the future's own error, or `ApiError::Cancelled`.
pub async fn cancellable<F, T>(cancel: &CancellationToken, future: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ApiError::Cancelled),
        result = future => result,
    }
}
