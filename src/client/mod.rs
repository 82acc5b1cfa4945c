//! The HTTP client runtime.
//!
//! This module tree implements the full request pipeline:
//!
//! - [`Client`]: the instance orchestrating merge, interceptors, dispatch
//!   and outcome classification
//! - [`RequestConfig`] / [`merge_configs`]: per-call configuration and the
//!   defaults-merging rule
//! - [`RequestInterceptors`] / [`ResponseInterceptors`]: the ordered
//!   transformation and recovery chains
//! - [`Response`]: the parsed response with content-type driven body
//!   handling
//! - [`ClientError`]: the unified failure taxonomy
//! - [`create_public_api`] / [`create_authenticated_api`]: the instance
//!   factory
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_http::create_authenticated_api;
//!
//! let api = create_authenticated_api("https://api.example.com", "token");
//! let me = api.get("/me").await?;
//! println!("{}", me.data);
//! ```

pub mod config;
mod errors;
mod factory;
pub mod headers;
mod http_client;
pub mod interceptor;
mod response;
pub mod url;

pub use config::{merge_configs, Credentials, HttpMethod, RequestBody, RequestConfig};
pub use errors::ClientError;
pub use factory::{create_authenticated_api, create_public_api, TokenSource};
pub use headers::Headers;
pub use http_client::{Client, Interceptors};
pub use interceptor::{InterceptorHandle, RequestInterceptors, ResponseInterceptors};
pub use response::{classify_content_type, parse_body, BodyFormat, RequestMeta, Response};
