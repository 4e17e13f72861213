//! Remote data service client
//!
//! HTTP-based implementation of the gateway ports. Every request carries the
//! session's bearer token, goes through the retrying
//! [`HttpClient`](crate::http::HttpClient) and has non-success statuses classified into
//! [`ApiError`] before reaching the store as an `AgencyError`.
//!
//! Status mapping: 401/403 auth, 404 not found, 409 conflict, 429 and 5xx
//! network (retryable), any other 4xx validation.

pub mod auth;
pub mod client;
pub mod errors;
pub mod rest;

pub use auth::{AccessTokenProvider, SessionTokens};
pub use client::{ApiClient, ApiClientConfig};
pub use errors::{ApiError, ApiErrorCategory};
pub use rest::RestDataService;
