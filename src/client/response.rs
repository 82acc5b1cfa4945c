//! HTTP response types and body classification.
//!
//! This module provides the [`Response`] type returned from every
//! successful dispatch, together with the content-type driven body parsing
//! strategies. The classification is a pure decision table over the
//! `Content-Type` string so it can be tested in isolation from any network
//! call.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::config::{HttpMethod, RequestConfig};

/// How a response body should be parsed, derived from its content type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyFormat {
    /// A JSON content type; parse as JSON, yielding `Null` on failure.
    Json,
    /// Any `text/*` content type; return the raw text.
    Text,
    /// Anything else; attempt a JSON parse, yielding `Null` on failure.
    Other,
}

/// Classifies a `Content-Type` header value into a parsing strategy.
#[must_use]
pub fn classify_content_type(content_type: &str) -> BodyFormat {
    let lowered = content_type.to_ascii_lowercase();
    if lowered.contains("application/json") {
        BodyFormat::Json
    } else if lowered.starts_with("text/") {
        BodyFormat::Text
    } else {
        BodyFormat::Other
    }
}

/// Parses a response body according to its classified format.
///
/// Parse failures never raise; the JSON strategies fall back to `Null`.
#[must_use]
pub fn parse_body(format: BodyFormat, text: &str) -> Value {
    match format {
        BodyFormat::Json | BodyFormat::Other => {
            serde_json::from_str(text).unwrap_or(Value::Null)
        }
        BodyFormat::Text => Value::String(text.to_string()),
    }
}

/// Metadata about the transport call that produced a response, kept for
/// debugging.
#[derive(Clone, Debug, Default)]
pub struct RequestMeta {
    /// The fully resolved URL the call was sent to.
    pub url: String,
    /// The method the call was sent with.
    pub method: Option<HttpMethod>,
}

/// A parsed HTTP response.
///
/// `data` holds the parsed body: a JSON value for JSON content types, a
/// string for `text/*` content types, and `Null` when parsing failed or
/// the body was empty.
#[derive(Clone, Debug)]
pub struct Response {
    /// The parsed response body.
    pub data: Value,
    /// The HTTP status code.
    pub status: u16,
    /// The status reason phrase, when known.
    pub status_text: String,
    /// Response headers with lowercased names; repeated headers accumulate
    /// their values in arrival order.
    pub headers: HashMap<String, Vec<String>>,
    /// The resolved config that produced this response.
    pub config: RequestConfig,
    /// Transport-call metadata for debugging.
    pub request: RequestMeta,
}

impl Response {
    /// Creates a response from its status, headers and parsed body.
    ///
    /// The originating config and request metadata are defaulted; this is
    /// the constructor to use for synthetic responses, such as fallback
    /// values substituted by error-recovery interceptors.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, Vec<String>>, data: Value) -> Self {
        Self {
            data,
            status,
            status_text: canonical_reason(status),
            headers,
            config: RequestConfig::default(),
            request: RequestMeta::default(),
        }
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Returns the body's `message` field when it is a string.
    ///
    /// Error responses from cooperating servers carry their human-readable
    /// explanation here.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.data.get("message").and_then(Value::as_str)
    }

    /// Deserializes the parsed body into a typed value.
    ///
    /// # Errors
    ///
    /// Returns the underlying deserialization error if the body does not
    /// match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }

    /// Returns the first value of a header, compared by lowercased name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Looks up the canonical reason phrase for a status code.
fn canonical_reason(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or_default()
        .to_string()
}
