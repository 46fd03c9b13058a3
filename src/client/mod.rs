//! HTTP plumbing shared by the session and task clients.
//!
//! A single [`reqwest::Client`] with an enabled cookie store is built from the
//! configuration and cloned into both clients, so the session cookie set by
//! login rides along on every task call.

mod auth;
mod task;

pub use auth::SessionClient;
pub use task::TaskClient;

use crate::config::ApiConfig;
use crate::errors::{ApiError, ApiResult};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Build the shared HTTP client: cookie store on, fixed request timeout.
///
/// # Errors
///
/// Returns [`ApiError::Network`] if the client cannot be constructed.
pub fn build_http(config: &ApiConfig) -> ApiResult<reqwest::Client> {
    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()
        .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull the server's `message` field out of an error body, if there is one.
pub(crate) async fn error_message(resp: reqwest::Response) -> Option<String> {
    resp.json::<ErrorBody>().await.ok().map(|body| body.message)
}

/// Map a non-success response to the error taxonomy, preferring the
/// server-provided message over `fallback`.
pub(crate) async fn ensure_success(
    resp: reqwest::Response,
    fallback: &str,
) -> ApiResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = error_message(resp)
        .await
        .unwrap_or_else(|| fallback.to_string());
    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthenticated,
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        _ => ApiError::Server(message),
    })
}

/// Log the transport failure and surface only the fixed fallback message.
pub(crate) fn network_error(fallback: &str, err: &reqwest::Error) -> ApiError {
    tracing::error!("{fallback}: {err}");
    ApiError::Network(fallback.to_string())
}

pub(crate) async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<T> {
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}
