use std::time::Duration;

use agencydesk_domain::{AgencyError, ApiConfig};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// When to try a request again and how long to wait first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, initial try included. Never below one.
    pub max_attempts: usize,
    /// Delay before the first retry. Doubles on each further retry.
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_backoff: Duration::from_millis(200) }
    }
}

impl RetryPolicy {
    fn attempts(&self) -> usize {
        self.max_attempts.max(1)
    }

    /// Delay before retry number `retry` (1-based), capped at 256x the base.
    pub fn delay_for(&self, retry: usize) -> Duration {
        let shift = retry.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    /// The service is overloaded or failed on its side.
    fn retries_status(status: StatusCode) -> bool {
        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
    }

    /// The request never got a response.
    fn retries_error(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect() || err.is_request()
    }
}

/// Shared reqwest client that retries transient failures.
///
/// Responses other than 5xx and 429 are returned to the caller as-is; status
/// classification happens in [`crate::api`].
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    policy: RetryPolicy,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client for the remote data service described by `[api]`.
    pub fn from_config(config: &ApiConfig) -> Result<Self, AgencyError> {
        Self::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .retry_policy(RetryPolicy {
                max_attempts: config.max_attempts,
                base_backoff: Duration::from_millis(config.backoff_millis),
            })
            .build()
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send `builder`, retrying per the policy. Request bodies must be
    /// buffered so the builder can be cloned for each attempt.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, AgencyError> {
        let attempts = self.policy.attempts();
        let mut attempt = 1;

        loop {
            let request = builder
                .try_clone()
                .ok_or_else(|| {
                    AgencyError::Internal("streaming request bodies cannot be retried".into())
                })?
                .build()
                .map_err(|err| AgencyError::from(InfraError::from(err)))?;
            let (method, url) = (request.method().clone(), request.url().clone());
            let last = attempt >= attempts;

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "HTTP response");
                    if last || !RetryPolicy::retries_status(status) {
                        return Ok(response);
                    }
                    warn!(attempt, %method, %url, %status, "Retrying after server error");
                }
                Err(err) => {
                    if last || !RetryPolicy::retries_error(&err) {
                        debug!(attempt, %method, %url, error = %err, "HTTP request failed");
                        return Err(InfraError::from(err).into());
                    }
                    warn!(attempt, %method, %url, error = %err, "Retrying after transport error");
                }
            }

            let delay = self.policy.delay_for(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    policy: RetryPolicy,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), policy: RetryPolicy::default(), user_agent: None }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, AgencyError> {
        let agent = self
            .user_agent
            .unwrap_or_else(|| format!("agencydesk/{}", env!("CARGO_PKG_VERSION")));
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(agent)
            .no_proxy()
            .build()
            .map_err(|err| AgencyError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, policy: self.policy })
    }
}
