// Shared HTTP client construction and reqwest error mapping

use crate::error::{Result, SentimError};
use reqwest::{Client, Response};
use std::time::Duration;

/// Build a client that enforces `timeout` on every request
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("sentim/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SentimError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Turn a transport error into an upstream failure for `service`
pub fn transport_error(service: &'static str, err: reqwest::Error) -> SentimError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("could not connect: {}", err)
    } else if err.is_decode() {
        format!("could not decode response: {}", err)
    } else {
        err.to_string()
    };
    SentimError::upstream(service, message)
}

/// Pass 2xx responses through; everything else becomes an upstream failure
/// carrying the status and a short excerpt of the body.
pub async fn check_status(service: &'static str, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(200).collect();
    Err(SentimError::upstream(
        service,
        format!("HTTP {}: {}", status, excerpt.trim()),
    ))
}

/// Join a base URL and an endpoint path without doubling slashes
pub fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
