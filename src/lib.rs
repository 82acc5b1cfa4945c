//! # courier-http
//!
//! An axios-style HTTP client runtime built on reqwest: configurable base
//! URL resolution, ordered request/response interceptor chains,
//! case-insensitive header merging and a uniform error taxonomy.
//!
//! ## Overview
//!
//! This crate provides:
//! - A [`Client`] instance holding its own defaults and interceptor chains
//! - Shorthand verb methods (`get`/`post`/`put`/`patch`/`delete` plus
//!   `head`/`options`) delegating to a single [`Client::request`] pipeline
//! - Request interceptors: ordered `(config) -> config` transformations
//!   with per-step error recovery
//! - Response interceptors: an ordered success pipeline and a
//!   short-circuiting error-recovery pipeline over one interceptor list
//! - Content-type driven body parsing (JSON, text, JSON-or-null fallback)
//! - An instance factory producing a cookie-based public client and a
//!   bearer-token authenticated client sharing the same machinery
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier_http::{create_public_api, RequestConfig};
//! use serde_json::json;
//!
//! let api = create_public_api("https://api.example.com");
//!
//! // Register an interceptor; registration order is execution order.
//! api.interceptors.request.use_fn(|config| Ok(config.header("X-Trace", "abc")));
//!
//! let ping = api.get("/ping").await?;
//! assert_eq!(ping.data["ok"], json!(true));
//!
//! let session = api.post("/login", json!({"email": "a@b.com", "password": "x"})).await?;
//! println!("logged in: {}", session.status);
//! ```
//!
//! ## Error handling
//!
//! Every failure path produces a [`ClientError`] with a readable message:
//! configuration errors surface directly, while transport failures and
//! non-2xx statuses flow through the response-error interceptor chain,
//! which may recover them into a successful [`Response`] or rewrite their
//! message.
//!
//! ## Design Principles
//!
//! - **No global state**: clients are explicit values constructed once at
//!   the composition root and passed to call sites
//! - **Ordered, append-only chains**: interceptors execute strictly in
//!   registration order, snapshotted at the start of each pipeline run
//! - **Per-call isolation**: configs and responses are created fresh per
//!   request; nothing is retained by the instance
//! - **Async-first**: designed for use with the Tokio runtime
//! - **Thread-safe**: [`Client`] is `Send + Sync`

pub mod client;

// Re-export the public surface at the crate root for convenience
pub use client::{
    classify_content_type, create_authenticated_api, create_public_api, merge_configs,
    parse_body, BodyFormat, Client, ClientError, Credentials, Headers, HttpMethod,
    InterceptorHandle, Interceptors, RequestBody, RequestConfig, RequestInterceptors,
    RequestMeta, Response, ResponseInterceptors, TokenSource,
};
