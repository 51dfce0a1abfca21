//! HTTP client implementation
//!
//! The core HTTP client for the SDK with retry logic, rate limit handling
//! and request/response logging.

use crate::config::{AuthConfig, SdkConfig};
use crate::error::{SdkError, SdkResult};
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Longest body prefix written to the debug log.
const LOGGED_BODY_LIMIT: usize = 2048;

/// The HTTP client for making API requests
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: Arc<SdkConfig>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(SdkError::NetworkError)?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Build the full URL for an endpoint
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: B,
    ) -> SdkResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> SdkResult<T> {
        let response = self.execute_with_retry(method, path, body).await?;

        let status = response.status();
        let text = response.text().await.map_err(SdkError::NetworkError)?;

        if self.config.enable_logging {
            debug!("Response {}: {}", status, truncate(&text));
        }

        if status.is_success() {
            serde_json::from_str(&text).map_err(SdkError::SerializationError)
        } else {
            Err(self.handle_error_response(status, &text))
        }
    }

    /// Execute a request with retry logic.
    ///
    /// Only failures that [`SdkError::is_retryable`] accepts are retried. Once
    /// retries are exhausted a 429/5xx response is handed back so its body
    /// becomes the error.
    async fn execute_with_retry<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> SdkResult<Response> {
        let url = self.url(path);
        let body_json = body.as_ref().map(serde_json::to_string).transpose()?;

        let mut attempts = 0;
        let mut backoff = self.config.retry_initial_backoff;

        loop {
            if attempts > 0 {
                info!(
                    "Retrying request (attempt {}/{}), waiting {:?}",
                    attempts, self.config.max_retries, backoff
                );
                tokio::time::sleep(backoff).await;
                backoff = std::cmp::min(backoff * 2, self.config.retry_max_backoff);
            }

            let mut request = self.client.request(method.clone(), &url);
            request = self.add_auth(request);

            if let Some(ref body_str) = body_json {
                request = request.body(body_str.clone());
            }

            if self.config.enable_logging {
                debug!("Request: {} {}", method, url);
                if let Some(ref body_str) = body_json {
                    debug!("Request body: {}", truncate(body_str));
                }
            }

            let retries_left = attempts < self.config.max_retries;
            let err = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if !retries_left {
                        return Ok(response);
                    }
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = response
                            .headers()
                            .get(header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        warn!("Rate limited, retry after {} seconds", retry_after);
                        SdkError::RateLimited { retry_after }
                    } else if status.is_server_error() {
                        warn!("Server error {}, will retry", status);
                        SdkError::ServerError {
                            status: status.as_u16(),
                            message: status.to_string(),
                        }
                    } else {
                        return Ok(response);
                    }
                }
                Err(e) => {
                    error!("Request failed: {}", e);
                    if e.is_timeout() {
                        SdkError::Timeout
                    } else {
                        SdkError::NetworkError(e)
                    }
                }
            };

            if !retries_left || !err.is_retryable() {
                return Err(err);
            }
            if let SdkError::RateLimited { retry_after } = err {
                backoff = std::cmp::min(
                    Duration::from_secs(retry_after),
                    self.config.retry_max_backoff,
                );
            }
            attempts += 1;
        }
    }

    /// Add authentication to a request
    fn add_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth {
            AuthConfig::None => request,
            AuthConfig::BearerToken(token) => {
                request.header(header::AUTHORIZATION, format!("Bearer {}", token))
            }
        }
    }

    fn handle_error_response(&self, status: StatusCode, body: &str) -> SdkError {
        SdkError::from_response(status.as_u16(), body)
    }
}

fn truncate(text: &str) -> &str {
    if text.len() <= LOGGED_BODY_LIMIT {
        return text;
    }
    let mut end = LOGGED_BODY_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
