//! The client instance orchestrating the request pipeline.
//!
//! A [`Client`] owns its default config, its two interceptor-chain pairs
//! and one underlying [`reqwest::Client`]. Each [`Client::request`] call:
//!
//! 1. merges the defaults with the per-call config,
//! 2. runs the merged config through the request interceptor chain,
//! 3. resolves the target URL and appends query parameters,
//! 4. performs the network call,
//! 5. classifies the outcome and runs the matching response pipeline.
//!
//! Failures from the request chain, the transport and non-2xx statuses all
//! enter the response-error pipeline, which may recover them into a
//! successful [`Response`]. Configuration errors (an empty URL after
//! merging) are surfaced directly and never offered for recovery.

use std::collections::HashMap;

use crate::client::config::{
    merge_configs, Credentials, HttpMethod, RequestBody, RequestConfig,
};
use crate::client::errors::ClientError;
use crate::client::interceptor::{RequestInterceptors, ResponseInterceptors};
use crate::client::response::{classify_content_type, parse_body, RequestMeta, Response};
use crate::client::url::{append_params, combine_url};

/// The request- and response-side interceptor chains of a client.
#[derive(Default)]
pub struct Interceptors {
    /// Interceptors applied to the outgoing config before dispatch.
    pub request: RequestInterceptors,
    /// Interceptors applied to the response, or to a failure.
    pub response: ResponseInterceptors,
}

/// An HTTP client instance with axios-style dispatch semantics.
///
/// A `Client` is constructed once and lives for the session; configs and
/// responses are created fresh per call. The only state shared between
/// concurrent calls is the interceptor lists (snapshotted per run) and the
/// immutable defaults.
///
/// # Thread Safety
///
/// `Client` is `Send + Sync`, safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use courier_http::{Client, RequestConfig};
/// use serde_json::json;
///
/// let client = Client::new(RequestConfig::new("").base_url("https://api.example.com"));
/// client.interceptors.request.use_fn(|config| Ok(config.header("X-Trace", "abc")));
///
/// let response = client.get("/ping").await?;
/// assert_eq!(response.data["ok"], json!(true));
/// ```
pub struct Client {
    /// The internal reqwest HTTP client.
    http: reqwest::Client,
    /// Default config merged into every call.
    defaults: RequestConfig,
    /// The interceptor chains of this instance.
    pub interceptors: Interceptors,
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl Client {
    /// Creates a client with the given default config.
    ///
    /// The underlying transport is built once; a cookie store is enabled
    /// when the defaults ask for [`Credentials::Include`].
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This
    /// should only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(defaults: RequestConfig) -> Self {
        let include_cookies = defaults.credentials == Some(Credentials::Include);
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .cookie_store(include_cookies)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            defaults,
            interceptors: Interceptors::default(),
        }
    }

    /// Returns the default config merged into every call.
    #[must_use]
    pub const fn defaults(&self) -> &RequestConfig {
        &self.defaults
    }

    /// Dispatches a request described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when the merged config has no
    /// URL, and otherwise whatever error survives the response-error
    /// interceptor chain: [`ClientError::Transport`] for network-level
    /// failures, [`ClientError::Status`] for non-2xx responses, or any
    /// error raised inside an interceptor.
    pub async fn request(&self, config: RequestConfig) -> Result<Response, ClientError> {
        let merged = merge_configs(&self.defaults, config);
        match self.dispatch(merged).await {
            Ok(response) => self.interceptors.response.handle_success(response),
            Err(error @ ClientError::Configuration { .. }) => Err(error),
            Err(error) => self.interceptors.response.handle_error(error),
        }
    }

    /// Sends a GET request to `url`.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get(&self, url: impl Into<String>) -> Result<Response, ClientError> {
        self.get_with(url, RequestConfig::default()).await
    }

    /// Sends a GET request to `url` with per-call options.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get_with(
        &self,
        url: impl Into<String>,
        config: RequestConfig,
    ) -> Result<Response, ClientError> {
        self.bodyless(HttpMethod::Get, url, config).await
    }

    /// Sends a DELETE request to `url`.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn delete(&self, url: impl Into<String>) -> Result<Response, ClientError> {
        self.delete_with(url, RequestConfig::default()).await
    }

    /// Sends a DELETE request to `url` with per-call options.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn delete_with(
        &self,
        url: impl Into<String>,
        config: RequestConfig,
    ) -> Result<Response, ClientError> {
        self.bodyless(HttpMethod::Delete, url, config).await
    }

    /// Sends a HEAD request to `url`.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn head(&self, url: impl Into<String>) -> Result<Response, ClientError> {
        self.bodyless(HttpMethod::Head, url, RequestConfig::default())
            .await
    }

    /// Sends an OPTIONS request to `url`.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn options(&self, url: impl Into<String>) -> Result<Response, ClientError> {
        self.bodyless(HttpMethod::Options, url, RequestConfig::default())
            .await
    }

    /// Sends a POST request with a body.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn post(
        &self,
        url: impl Into<String>,
        data: impl Into<RequestBody>,
    ) -> Result<Response, ClientError> {
        self.post_with(url, data, RequestConfig::default()).await
    }

    /// Sends a POST request with a body and per-call options.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn post_with(
        &self,
        url: impl Into<String>,
        data: impl Into<RequestBody>,
        config: RequestConfig,
    ) -> Result<Response, ClientError> {
        self.bodied(HttpMethod::Post, url, data, config).await
    }

    /// Sends a PUT request with a body.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn put(
        &self,
        url: impl Into<String>,
        data: impl Into<RequestBody>,
    ) -> Result<Response, ClientError> {
        self.bodied(HttpMethod::Put, url, data, RequestConfig::default())
            .await
    }

    /// Sends a PATCH request with a body.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn patch(
        &self,
        url: impl Into<String>,
        data: impl Into<RequestBody>,
    ) -> Result<Response, ClientError> {
        self.bodied(HttpMethod::Patch, url, data, RequestConfig::default())
            .await
    }

    async fn bodyless(
        &self,
        method: HttpMethod,
        url: impl Into<String>,
        mut config: RequestConfig,
    ) -> Result<Response, ClientError> {
        config.method = Some(method);
        config.url = url.into();
        self.request(config).await
    }

    async fn bodied(
        &self,
        method: HttpMethod,
        url: impl Into<String>,
        data: impl Into<RequestBody>,
        mut config: RequestConfig,
    ) -> Result<Response, ClientError> {
        config.method = Some(method);
        config.url = url.into();
        config.body = Some(data.into());
        self.request(config).await
    }

    /// Runs the request chain, resolves the URL, performs the transport
    /// call and classifies the outcome.
    async fn dispatch(&self, merged: RequestConfig) -> Result<Response, ClientError> {
        let prepared = self.interceptors.request.run(merged)?;

        if prepared.url.is_empty() {
            return Err(ClientError::configuration("Request URL is required."));
        }

        let method = prepared.method.unwrap_or(HttpMethod::Get);
        let base_url = prepared.base_url.as_deref().unwrap_or_default();
        let full_url = append_params(&combine_url(base_url, &prepared.url), &prepared.params);

        tracing::debug!(method = %method, url = %full_url, "dispatching request");

        let builder = self.build_call(method, &full_url, &prepared);
        let raw = self.send(builder, &prepared).await?;

        let status = raw.status().as_u16();
        let status_text = raw
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string();
        let headers = parse_response_headers(raw.headers());
        let content_type = headers
            .get("content-type")
            .and_then(|values| values.first())
            .cloned()
            .unwrap_or_default();

        let text = raw.text().await.map_err(|error| {
            tracing::warn!(url = %full_url, "failed to read response body: {error}");
            ClientError::Transport {
                message: error.to_string(),
                config: Some(Box::new(prepared.clone())),
            }
        })?;
        let data = parse_body(classify_content_type(&content_type), &text);

        let response = Response {
            data,
            status,
            status_text,
            headers,
            request: RequestMeta {
                url: full_url,
                method: Some(method),
            },
            config: prepared,
        };

        if response.is_ok() {
            Ok(response)
        } else {
            Err(ClientError::from_response(response))
        }
    }

    /// Builds the transport-level call from the prepared config.
    fn build_call(
        &self,
        method: HttpMethod,
        full_url: &str,
        prepared: &RequestConfig,
    ) -> reqwest::RequestBuilder {
        let mut builder = match method {
            HttpMethod::Get => self.http.get(full_url),
            HttpMethod::Post => self.http.post(full_url),
            HttpMethod::Put => self.http.put(full_url),
            HttpMethod::Patch => self.http.patch(full_url),
            HttpMethod::Delete => self.http.delete(full_url),
            HttpMethod::Head => self.http.head(full_url),
            HttpMethod::Options => self.http.request(reqwest::Method::OPTIONS, full_url),
        };

        // Headers copied case-preserved from the prepared config.
        for (name, value) in prepared.headers.iter() {
            builder = builder.header(name, value);
        }

        match &prepared.body {
            Some(RequestBody::Text(text)) => builder = builder.body(text.clone()),
            Some(RequestBody::Bytes(bytes)) => builder = builder.body(bytes.clone()),
            Some(RequestBody::Form(pairs)) => builder = builder.form(pairs),
            Some(RequestBody::Json(value)) => {
                builder = builder.body(value.to_string());
                if !prepared.headers.contains("Content-Type") {
                    builder = builder.header("Content-Type", "application/json");
                }
            }
            None => {}
        }

        builder
    }

    /// Sends the call, racing the cancellation signal when one is
    /// attached.
    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        prepared: &RequestConfig,
    ) -> Result<reqwest::Response, ClientError> {
        let transport_error = |message: String| ClientError::Transport {
            message,
            config: Some(Box::new(prepared.clone())),
        };

        if let Some(signal) = &prepared.signal {
            tokio::select! {
                () = signal.cancelled() => {
                    tracing::warn!(url = %prepared.url, "request aborted by cancellation signal");
                    Err(transport_error("Request aborted.".to_string()))
                }
                result = builder.send() => result.map_err(|error| {
                    tracing::warn!(url = %prepared.url, "transport failure: {error}");
                    transport_error(error.to_string())
                }),
            }
        } else {
            builder.send().await.map_err(|error| {
                tracing::warn!(url = %prepared.url, "transport failure: {error}");
                transport_error(error.to_string())
            })
        }
    }
}

/// Parses transport response headers into a lowercase-keyed map; repeated
/// headers accumulate their values in arrival order.
fn parse_response_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, Vec<String>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_lowercase();
        let value = value.to_str().unwrap_or_default().to_string();
        result.entry(key).or_default().push(value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::config::Credentials;
    use serde_json::Value;

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }

    #[test]
    fn test_client_keeps_defaults() {
        let defaults = RequestConfig::new("")
            .base_url("https://api.example.com")
            .header("Accept", "application/json")
            .credentials(Credentials::Include);
        let client = Client::new(defaults);

        assert_eq!(
            client.defaults().base_url.as_deref(),
            Some("https://api.example.com")
        );
        assert_eq!(
            client.defaults().headers.get("accept"),
            Some("application/json")
        );
    }

    #[test]
    fn test_new_client_has_empty_chains() {
        let client = Client::new(RequestConfig::default());
        assert!(client.interceptors.request.is_empty());
        assert!(client.interceptors.response.is_empty());
    }

    #[tokio::test]
    async fn test_empty_url_fails_with_configuration_error() {
        let client = Client::new(RequestConfig::default());
        let error = client.request(RequestConfig::default()).await.unwrap_err();

        assert!(matches!(error, ClientError::Configuration { .. }));
        assert_eq!(error.message(), "Request URL is required.");
    }

    #[tokio::test]
    async fn test_configuration_error_bypasses_recovery_chain() {
        let client = Client::new(RequestConfig::default());
        client
            .interceptors
            .response
            .use_rejected(|_| Ok(Response::new(200, HashMap::new(), Value::Null)));

        // The recovery interceptor would resolve any transport failure,
        // but a missing URL must still surface directly.
        let error = client.request(RequestConfig::default()).await.unwrap_err();
        assert!(matches!(error, ClientError::Configuration { .. }));
    }

    #[test]
    fn test_parse_response_headers_accumulates_repeats() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.append("Set-Cookie", "a=1".parse().unwrap());
        headers.append("Set-Cookie", "b=2".parse().unwrap());
        headers.insert("Content-Type", "application/json".parse().unwrap());

        let parsed = parse_response_headers(&headers);
        assert_eq!(
            parsed.get("set-cookie"),
            Some(&vec!["a=1".to_string(), "b=2".to_string()])
        );
        assert_eq!(
            parsed.get("content-type"),
            Some(&vec!["application/json".to_string()])
        );
    }
}
