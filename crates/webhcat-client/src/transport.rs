//! HTTP transport used by the dispatcher.
//!
//! The [`Transport`] trait is the seam between failover logic and the HTTP
//! stack. [`ReqwestTransport`] is the production implementation: a reqwest
//! client wrapped in middleware that retries connection-level failures on
//! the same host. HTTP statuses are never retried here; a 503 travels back
//! to the dispatcher, which decides whether to fail over.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::ApiError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Method, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
    policies::ExponentialBackoff, RetryTransientMiddleware, Retryable, RetryableStrategy,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Query parameters of a request.
pub type QueryParams = BTreeMap<String, String>;

/// Form-encoded request body.
pub type FormBody = BTreeMap<String, String>;

/// A fully resolved outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL, base URL included
    pub url: String,
    /// Query parameters, identity included
    pub query: QueryParams,
    /// Optional form-encoded body
    pub form: Option<FormBody>,
}

/// Sends one request and decodes the JSON response.
///
/// Implementations must report non-2xx responses as
/// [`ClientError::Status`] so the dispatcher can recognise a busy host.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<Value>;
}

/// reqwest-backed transport.
pub struct ReqwestTransport {
    http: ClientWithMiddleware,
}

impl ReqwestTransport {
    /// Build the HTTP stack from the client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("webhcat-client")),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout);

        for (host, addr) in &config.dns_overrides {
            builder = builder.resolve(host, *addr);
        }
        if config.no_proxy {
            builder = builder.no_proxy();
        }

        let reqwest_client = builder.build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(config.retry_initial_delay, config.retry_max_delay)
            .build_with_max_retries(config.connect_retries);

        let http = ClientBuilder::new(reqwest_client)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                ConnectRetryStrategy,
            ))
            .build();

        Ok(Self { http })
    }

    /// Convert a failed response into a status error.
    fn status_to_error(
        status: StatusCode,
        body: Option<&[u8]>,
        retry_after: Option<Duration>,
    ) -> ClientError {
        let api_error: Option<ApiError> = body.and_then(|b| serde_json::from_slice(b).ok());

        let message = api_error
            .as_ref()
            .and_then(|e| e.error.clone())
            .or_else(|| {
                body.map(|b| String::from_utf8_lossy(b).to_string())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| status.to_string());

        ClientError::Status {
            status: status.as_u16(),
            error_code: api_error.and_then(|e| e.error_code),
            message,
            retry_after,
        }
    }

    /// Parse the Retry-After header value into a Duration.
    ///
    /// Accepts delta-seconds ("120") and HTTP-dates
    /// ("Fri, 31 Dec 2024 23:59:59 GMT"). Dates in the past yield zero.
    fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
        let header_value = headers.get("retry-after")?.to_str().ok()?;

        if let Ok(seconds) = header_value.parse::<u64>() {
            return Some(Duration::from_secs(seconds));
        }

        if let Ok(date) = httpdate::parse_http_date(header_value) {
            let now = std::time::SystemTime::now();
            return Some(date.duration_since(now).unwrap_or(Duration::ZERO));
        }

        None
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<Value> {
        let HttpRequest {
            method,
            url,
            query,
            form,
        } = request;
        let start = Instant::now();

        tracing::debug!(method = %method, url = %url, "Sending request");

        let mut builder = self.http.request(method.clone(), &url).query(&query);
        if let Some(ref form) = form {
            builder = builder.form(form);
        }

        let response = builder.send().await?;
        let status = response.status();
        let duration = start.elapsed();

        tracing::debug!(
            method = %method,
            url = %url,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Received response"
        );

        if status.is_success() {
            let body = response.bytes().await?;
            serde_json::from_slice(&body).map_err(|e| {
                ClientError::InvalidResponse(format!(
                    "Failed to parse response: {} (body: {})",
                    e,
                    String::from_utf8_lossy(&body)
                ))
            })
        } else {
            let retry_after = Self::parse_retry_after(response.headers());
            let body = response.bytes().await.ok();
            let error = Self::status_to_error(status, body.as_deref(), retry_after);

            tracing::warn!(
                method = %method,
                url = %url,
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                error = %error,
                "Request failed"
            );

            Err(error)
        }
    }
}

/// Retries connection failures and timeouts only.
///
/// Every HTTP response, 5xx included, is handed back untouched: host
/// failover on 503 belongs to the dispatcher, and other statuses must
/// reach the caller verbatim.
struct ConnectRetryStrategy;

impl RetryableStrategy for ConnectRetryStrategy {
    fn handle(&self, res: &reqwest_middleware::Result<reqwest::Response>) -> Option<Retryable> {
        match res {
            Ok(_) => None,
            Err(error) => {
                if error.is_timeout() || error.is_connect() {
                    Some(Retryable::Transient)
                } else {
                    Some(Retryable::Fatal)
                }
            }
        }
    }
}
