//! Network utilities and helpers

use reqwest::Client;
use std::time::Duration;

use crate::core::config::HttpConfig;
use crate::core::models::{AppError, AppResult};

/// Build the shared HTTP client from configuration
pub fn build_http_client(config: &HttpConfig) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(AppError::Network)
}

/// Map a non-200 response to `AppError::Status`
pub fn ensure_ok(service: &str, response: reqwest::Response) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status == reqwest::StatusCode::OK {
        Ok(response)
    } else {
        tracing::debug!("{} returned {} for {}", service, status, response.url());
        Err(AppError::Status {
            service: service.to_string(),
            status: status.as_u16(),
        })
    }
}
