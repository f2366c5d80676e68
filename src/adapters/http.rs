//! Shared reqwest plumbing for the console and knowledge clients

use crate::domain::{ExporterError, Result, TransportError};
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use std::time::Duration;

/// Page size used when walking paginated listings
pub const PAGE_LIMIT: u32 = 100;

/// Build an HTTP client with the configured timeout and TLS policy
///
/// # Errors
///
/// Returns a configuration error if the TLS backend cannot be initialized
pub fn build_client(timeout_seconds: u64, tls_verify: bool) -> Result<Client> {
    let mut builder = ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_seconds))
        .connect_timeout(Duration::from_secs(30))
        .user_agent(concat!("dsl-exporter/", env!("CARGO_PKG_VERSION")));

    if !tls_verify {
        tracing::warn!("TLS certificate verification is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|e| ExporterError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// Join a base URL and an absolute path without doubling the slash
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Turn a non-success response into an error, keeping the body for context
///
/// 401 and 403 are reported as authentication failures; everything else is
/// a transport error.
pub async fn check_response(resp: Response, context: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = format!("{context} failed with status {status}: {body}");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(ExporterError::Authentication(message))
        }
        _ => Err(TransportError::from_status(status.as_u16(), message).into()),
    }
}
