//! Request configuration types.
//!
//! This module provides [`RequestConfig`], the per-call description of an
//! outgoing request, along with the [`HttpMethod`] and [`RequestBody`]
//! supporting types and the merge rule that folds an instance's defaults
//! into a call-site config.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::client::headers::Headers;

/// HTTP methods supported by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partially updating resources.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
    /// HTTP HEAD method for metadata-only retrieval.
    Head,
    /// HTTP OPTIONS method for capability discovery.
    Options,
}

impl HttpMethod {
    /// Returns the canonical uppercase method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing request body.
///
/// `Text`, `Bytes` and `Form` payloads are sent as supplied; `Json` values
/// are serialized at dispatch time and receive a `Content-Type:
/// application/json` header unless the caller already set a content type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
    /// A raw string body, sent verbatim.
    Text(String),
    /// A binary body, sent verbatim.
    Bytes(Vec<u8>),
    /// A `application/x-www-form-urlencoded` payload.
    Form(Vec<(String, String)>),
    /// A JSON value, serialized at dispatch time.
    Json(Value),
}

impl RequestBody {
    /// Builds a JSON body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns the underlying serialization error if `value` cannot be
    /// represented as JSON.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Json)
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Cookie-inclusion policy for a client or an individual request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Credentials {
    /// Do not persist or send cookies.
    #[default]
    Omit,
    /// Persist cookies across requests and send them with each call.
    Include,
}

/// Configuration for a single request.
///
/// A `RequestConfig` is merged with the owning client's defaults before
/// each dispatch; see [`merge_configs`]. Configs are created fresh per call
/// and are never retained by the client.
///
/// # Example
///
/// ```rust
/// use courier_http::{HttpMethod, RequestConfig};
/// use serde_json::json;
///
/// let config = RequestConfig::new("/api/items")
///     .method(HttpMethod::Get)
///     .header("X-Trace", "abc123")
///     .param("limit", json!(50));
///
/// assert_eq!(config.url, "/api/items");
/// assert_eq!(config.headers.get("x-trace"), Some("abc123"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestConfig {
    /// The HTTP method; `GET` is assumed when absent at dispatch.
    pub method: Option<HttpMethod>,
    /// The request URL, relative to `base_url` or absolute. Must be
    /// non-empty by dispatch time.
    pub url: String,
    /// The base address prepended to relative URLs.
    pub base_url: Option<String>,
    /// Request headers.
    pub headers: Headers,
    /// Query parameters, serialized in insertion order.
    pub params: Vec<(String, Value)>,
    /// The request body, if any.
    pub body: Option<RequestBody>,
    /// Externally supplied cancellation signal, propagated to the
    /// transport call unmodified.
    pub signal: Option<CancellationToken>,
    /// Cookie-inclusion policy.
    pub credentials: Option<Credentials>,
}

impl RequestConfig {
    /// Creates a config targeting `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the HTTP method.
    #[must_use]
    pub const fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the base address.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Adds a header, replacing any existing one with the same name
    /// (compared case-insensitively).
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Adds a query parameter, replacing any existing one with the exact
    /// same key.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if let Some(entry) = self.params.iter_mut().find(|(existing, _)| *existing == key) {
            entry.1 = value;
        } else {
            self.params.push((key, value));
        }
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attaches a cancellation signal.
    #[must_use]
    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Sets the cookie-inclusion policy.
    #[must_use]
    pub const fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

/// Merges an instance's default config with a per-call config.
///
/// Headers are the union of both sets with the call-site values winning on
/// case-insensitive collision (the call site's casing is preserved). Every
/// other field is taken from `overrides` when present, otherwise from
/// `defaults`.
#[must_use]
pub fn merge_configs(defaults: &RequestConfig, overrides: RequestConfig) -> RequestConfig {
    let mut headers = defaults.headers.clone();
    headers.merge(&overrides.headers);

    RequestConfig {
        method: overrides.method.or(defaults.method),
        url: if overrides.url.is_empty() {
            defaults.url.clone()
        } else {
            overrides.url
        },
        base_url: overrides.base_url.or_else(|| defaults.base_url.clone()),
        headers,
        params: if overrides.params.is_empty() {
            defaults.params.clone()
        } else {
            overrides.params
        },
        body: overrides.body.or_else(|| defaults.body.clone()),
        signal: overrides.signal.or_else(|| defaults.signal.clone()),
        credentials: overrides.credentials.or(defaults.credentials),
    }
}
