//! HTTP client for the platform REST API
//!
//! Adds bot authentication and waits out rate limits before giving up.

use std::time::Duration;

use reqwest::{header, Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// How often a rate-limited request is retried
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wait used when a 429 carries no usable `retry_after`
const FALLBACK_RETRY_WAIT: Duration = Duration::from_secs(1);

/// REST request errors
#[derive(Debug, Error)]
pub enum RestError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The platform answered with an error status
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },
}

/// Error body returned by the platform
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Body of a 429 response
#[derive(Debug, Deserialize)]
struct RateLimitBody {
    /// Seconds to wait
    retry_after: f64,
}

/// Authenticated REST client
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    authorization: String,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client for a bot token
    pub fn new(token: &str, base_url: &str) -> Result<Self, RestError> {
        let http = Client::builder()
            .user_agent(format!(
                "DiscordBot ({}, {})",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: format!("Bot {token}"),
        })
    }

    /// Send a request, retrying when rate limited
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response, RestError> {
        let url = format!("{}{path}", self.base_url);
        let mut attempt = 0;

        loop {
            let mut builder = self
                .http
                .request(method.clone(), &url)
                .header(header::AUTHORIZATION, &self.authorization);
            if let Some(body) = body {
                builder = builder.json(body);
            }

            let response = builder.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS && attempt < MAX_RATE_LIMIT_RETRIES {
                attempt += 1;
                let wait = response
                    .json::<RateLimitBody>()
                    .await
                    .map_or(FALLBACK_RETRY_WAIT, |limit| retry_wait(limit.retry_after));
                tracing::warn!(
                    method = %method,
                    path = %path,
                    wait_ms = wait.as_millis(),
                    attempt,
                    "Rate limited"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if status.is_success() {
                return Ok(response);
            }

            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.message)
                .unwrap_or_default();
            tracing::debug!(method = %method, path = %path, status = %status, "Request failed");
            return Err(RestError::Status { status, message });
        }
    }

    /// GET a JSON document
    pub async fn get<T>(&self, path: &str) -> Result<T, RestError>
    where
        T: serde::de::DeserializeOwned,
    {
        Ok(self.request(Method::GET, path, None).await?.json().await?)
    }
}

fn retry_wait(retry_after: f64) -> Duration {
    Duration::try_from_secs_f64(retry_after.max(0.0)).unwrap_or(FALLBACK_RETRY_WAIT)
}
