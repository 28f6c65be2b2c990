//! Shared HTTP plumbing for the directory service adapters

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::error::ApiError;
use crate::session::Session;

/// Build the reqwest client every adapter shares
pub fn build_http_client(timeout: Duration) -> Result<Client, ApiError> {
    Client::builder()
        .user_agent(concat!("bizdir/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| ApiError::network("http", e.to_string()))
}

/// Attach `Authorization: Bearer` when a session is present
pub fn with_bearer(request: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
    match session {
        Some(session) => request.bearer_auth(session.token()),
        None => request,
    }
}

/// Join a base URL and a path segment without doubling slashes
pub fn join_url(base: &str, segment: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        segment.trim_start_matches('/')
    )
}

/// Send a request and decode a JSON body, mapping failures onto `ApiError`
pub async fn send_json<T: DeserializeOwned>(
    service: &str,
    request: RequestBuilder,
) -> Result<T, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::network(service, e.to_string()))?;

    let status = response.status();
    debug!(service, status = status.as_u16(), "response received");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(match status {
            StatusCode::UNAUTHORIZED => ApiError::unauthorized(service),
            StatusCode::FORBIDDEN => ApiError::forbidden(service),
            _ => ApiError::http(service, status.as_u16(), &body),
        });
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::decode(service, e.to_string()))
}
