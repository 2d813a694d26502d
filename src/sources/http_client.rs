//! HTTP client creation and shared response handling.

use reqwest::{Client, Response};
use std::time::Duration;

use crate::error::AppError;

/// Creates a configured HTTP client with connection pooling and a request
/// timeout.
///
/// # Returns
/// * `Result<Client, reqwest::Error>` - A configured reqwest HTTP client or error
pub fn create_http_client(timeout_seconds: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .build()
}

/// Maps a non-success HTTP status to the matching typed error.
///
/// 404 gets its own variant; the rest split into the client and server
/// families so callers can decide about retrying.
pub async fn check_status(response: Response, url: &str) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string();
    if status.as_u16() == 404 {
        Err(AppError::feed_not_found(url))
    } else if status.is_server_error() {
        Err(AppError::feed_server_error(status.as_u16(), message, url))
    } else {
        Err(AppError::feed_client_error(status.as_u16(), message, url))
    }
}
