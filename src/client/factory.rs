//! Instance factory for the public and authenticated API clients.
//!
//! Both factories produce a [`Client`] with the same pipeline machinery
//! and the same default interceptors; the authenticated variant adds a
//! request interceptor that injects a bearer token. Instances are explicit
//! values: construct them once at the composition root and pass them to
//! call sites.

use std::sync::Arc;

use crate::client::config::{Credentials, RequestBody, RequestConfig};
use crate::client::http_client::Client;

/// Fallback message when a failure carries nothing readable.
const GENERIC_ERROR_MESSAGE: &str =
    "An unexpected error occurred while communicating with the server.";

/// A bearer token supplied at construction: either a fixed string or a
/// zero-argument getter consulted on every request.
#[derive(Clone)]
pub enum TokenSource {
    /// A fixed token string.
    Fixed(String),
    /// A getter invoked per request; returning `None` or an empty string
    /// leaves the request without an `Authorization` header.
    Getter(Arc<dyn Fn() -> Option<String> + Send + Sync>),
}

impl TokenSource {
    /// Wraps a getter closure.
    pub fn from_fn<F>(getter: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        Self::Getter(Arc::new(getter))
    }

    /// Resolves the current token, filtering out empty values.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        let token = match self {
            Self::Fixed(token) => Some(token.clone()),
            Self::Getter(getter) => getter(),
        };
        token.filter(|token| !token.is_empty())
    }
}

impl From<String> for TokenSource {
    fn from(token: String) -> Self {
        Self::Fixed(token)
    }
}

impl From<&str> for TokenSource {
    fn from(token: &str) -> Self {
        Self::Fixed(token.to_string())
    }
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(_) => f.write_str("TokenSource::Fixed(..)"),
            Self::Getter(_) => f.write_str("TokenSource::Getter(..)"),
        }
    }
}

/// Creates the unauthenticated client: shared base address, JSON `Accept`
/// default and cookie inclusion enabled.
///
/// One trailing slash is stripped from `base_url`, matching the
/// normalization the composition root applies to its configured base
/// address.
#[must_use]
pub fn create_public_api(base_url: impl Into<String>) -> Client {
    let client = Client::new(base_defaults(&base_url.into()));
    register_common_interceptors(&client);
    client
}

/// Creates the authenticated client: everything the public client has,
/// plus a request interceptor that sets `Authorization: Bearer <token>`
/// when the source yields a non-empty token.
#[must_use]
pub fn create_authenticated_api(base_url: impl Into<String>, token: impl Into<TokenSource>) -> Client {
    let client = Client::new(base_defaults(&base_url.into()));
    let source = token.into();

    client.interceptors.request.use_fn(move |config| {
        match source.token() {
            Some(token) => Ok(config.header("Authorization", format!("Bearer {token}"))),
            None => Ok(config),
        }
    });

    register_common_interceptors(&client);
    client
}

fn base_defaults(base_url: &str) -> RequestConfig {
    let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
    RequestConfig::new("")
        .base_url(base_url)
        .header("Accept", "application/json")
        .credentials(Credentials::Include)
}

/// Registers the default interceptors shared by both factory variants:
/// a request step that ensures `Accept`/`Content-Type` headers, and a
/// response-error step that normalizes every failure to a best-effort
/// readable message.
fn register_common_interceptors(client: &Client) {
    client.interceptors.request.use_fn(|mut config| {
        if matches!(config.body, Some(RequestBody::Json(_)))
            && !config.headers.contains("Content-Type")
        {
            config.headers.insert("Content-Type", "application/json");
        }
        if !config.headers.contains("Accept") {
            config.headers.insert("Accept", "application/json");
        }
        Ok(config)
    });

    client.interceptors.response.use_pair(Ok, |error| {
        let message = error
            .response()
            .and_then(|response| response.error_message())
            .map_or_else(
                || {
                    if error.message().is_empty() {
                        GENERIC_ERROR_MESSAGE.to_string()
                    } else {
                        error.message().to_string()
                    }
                },
                ToString::to_string,
            );
        Err(error.with_message(message))
    });
}
