//! JSON client for the remote data service
//!
//! Wraps [`HttpClient`] with base-URL handling, bearer authentication, a
//! per-request timeout and status-code classification.

use std::sync::Arc;
use std::time::Duration;

use agencydesk_domain::ApiConfig;
use reqwest::{Method, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tracing::{debug, instrument};

use super::auth::AccessTokenProvider;
use super::errors::ApiError;
use crate::http::{HttpClient, RetryPolicy};

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL without trailing slash, e.g. `http://localhost:3001`
    pub base_url: String,
    /// Upper bound for one request, retries included
    pub timeout: Duration,
    pub max_attempts: usize,
    pub backoff: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_seconds),
            max_attempts: config.max_attempts,
            backoff: Duration::from_millis(config.backoff_millis),
        }
    }
}

/// Which bearer token a request carries
enum Bearer<'a> {
    /// Whatever the provider holds, possibly none
    Session,
    /// A specific token, e.g. one restored from the local cache
    Explicit(&'a str),
}

pub struct ApiClient {
    http_client: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    config: ApiClientConfig,
}

impl ApiClient {
    pub fn new(
        config: ApiClientConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .retry_policy(RetryPolicy {
                max_attempts: config.max_attempts,
                base_backoff: config.backoff,
            })
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        Ok(Self { http_client, auth, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.execute::<(), R>(Method::GET, path, None, Bearer::Session).await
    }

    /// GET authenticated with `token` instead of the session token.
    #[instrument(skip(self, token), fields(path = %path))]
    pub async fn get_with_token<R: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<R, ApiError> {
        self.execute::<(), R>(Method::GET, path, None, Bearer::Explicit(token)).await
    }

    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.execute(Method::POST, path, Some(body), Bearer::Session).await
    }

    /// POST authenticated with `token` instead of the session token.
    #[instrument(skip(self, body, token), fields(path = %path))]
    pub async fn post_with_token<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: &str,
    ) -> Result<R, ApiError> {
        self.execute(Method::POST, path, Some(body), Bearer::Explicit(token)).await
    }

    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.execute(Method::PUT, path, Some(body), Bearer::Session).await
    }

    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute::<(), IgnoredAny>(Method::DELETE, path, None, Bearer::Session).await?;
        Ok(())
    }

    async fn execute<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        bearer: Bearer<'_>,
    ) -> Result<R, ApiError> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(%method, url = %url, "API request");

        let token = match bearer {
            Bearer::Session => self.auth.access_token().await?,
            Bearer::Explicit(token) => Some(token.to_string()),
        };

        let mut request = self.http_client.request(method.clone(), &url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let timeout = self.config.timeout;
        let response = match tokio::time::timeout(timeout, self.http_client.send(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(ApiError::from(err)),
            Err(_) => return Err(ApiError::Timeout(timeout)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &url, &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response: {e}")))?;

        // No-content responses decode as JSON null so `()` and `Option<T>`
        // callers work unchanged.
        if status == StatusCode::NO_CONTENT
            || status == StatusCode::RESET_CONTENT
            || bytes.is_empty()
        {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Decode(format!("{url} returned no content ({})", status.as_u16()))
            });
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Decode(format!("Failed to parse response from {url}: {e}")))
    }
}
