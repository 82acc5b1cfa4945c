//! End-to-end tests for the client runtime against a mock transport.
//!
//! These tests verify URL resolution, interceptor ordering, error
//! recovery, and the verb shorthand surface using a local wiremock server.

use std::time::Duration;

use courier_http::{
    create_authenticated_api, create_public_api, Client, ClientError, RequestConfig, Response,
    TokenSource,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a bare client pointed at the mock server, with no default
/// interceptors registered.
fn bare_client(server: &MockServer) -> Client {
    Client::new(RequestConfig::new("").base_url(server.uri()))
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[tokio::test]
async fn test_get_ping_resolves_with_parsed_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = bare_client(&server);
    let response = client.get("/ping").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.data["ok"], json!(true));
    assert_eq!(response.request.url, format!("{}/ping", server.uri()));
}

#[tokio::test]
async fn test_post_login_failure_rejects_with_body_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials."})),
        )
        .mount(&server)
        .await;

    let api = create_public_api(server.uri());
    let error = api
        .post("/login", json!({"email": "a@b.com", "password": "x"}))
        .await
        .unwrap_err();

    assert_eq!(error.message(), "Invalid credentials.");
    assert_eq!(error.response().unwrap().status, 401);
}

#[tokio::test]
async fn test_authenticated_client_sends_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let api = create_authenticated_api(server.uri(), TokenSource::from_fn(|| Some("abc".to_string())));
    let response = api.get("/me").await.unwrap();

    assert_eq!(response.data["id"], json!(1));
}

// ============================================================================
// Error recovery
// ============================================================================

#[tokio::test]
async fn test_error_recovery_resolves_with_fallback_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = bare_client(&server);
    client.interceptors.response.use_rejected(|_| {
        Ok(Response::new(
            200,
            std::collections::HashMap::new(),
            json!({"fallback": true}),
        ))
    });

    // The underlying call failed, but the caller sees a success.
    let response = client.get("/flaky").await.unwrap();
    assert_eq!(response.data["fallback"], json!(true));
}

#[tokio::test]
async fn test_unrecovered_error_carries_generic_status_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = bare_client(&server);
    let error = client.get("/broken").await.unwrap_err();

    assert_eq!(error.message(), "Request failed with status code 500");
    assert!(matches!(error, ClientError::Status { .. }));
}

#[tokio::test]
async fn test_transport_failure_reaches_error_chain() {
    // No server listening on this port.
    let client = Client::new(RequestConfig::new("").base_url("http://127.0.0.1:1"));
    client.interceptors.response.use_rejected(|error| {
        assert!(error.response().is_none());
        Err(error.with_message("normalized transport failure"))
    });

    let error = client.get("/anything").await.unwrap_err();
    assert_eq!(error.message(), "normalized transport failure");
}

// ============================================================================
// Interceptor ordering and registration
// ============================================================================

#[tokio::test]
async fn test_request_interceptors_run_in_registration_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ordered"))
        .and(header("X-Order", "ab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = bare_client(&server);
    client
        .interceptors
        .request
        .use_fn(|config| Ok(config.header("X-Order", "a")));
    client.interceptors.request.use_fn(|config| {
        let seen = config.headers.get("X-Order").unwrap_or_default().to_string();
        Ok(config.header("X-Order", format!("{seen}b")))
    });

    client.get("/ordered").await.unwrap();
}

#[tokio::test]
async fn test_interceptor_registered_later_applies_to_subsequent_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/first"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/second"))
        .and(header("X-Late", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = bare_client(&server);
    client.get("/first").await.unwrap();

    client
        .interceptors
        .request
        .use_fn(|config| Ok(config.header("X-Late", "yes")));
    client.get("/second").await.unwrap();
}

#[tokio::test]
async fn test_response_success_interceptor_transforms_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wrapped"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 21})))
        .mount(&server)
        .await;

    let client = bare_client(&server);
    client.interceptors.response.use_fn(|mut response| {
        let value = response.data["value"].as_i64().unwrap_or_default();
        response.data["value"] = json!(value * 2);
        Ok(response)
    });

    let response = client.get("/wrapped").await.unwrap();
    assert_eq!(response.data["value"], json!(42));
}

// ============================================================================
// URL resolution and params
// ============================================================================

#[tokio::test]
async fn test_params_are_serialized_onto_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "hello world"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = bare_client(&server);
    let config = RequestConfig::default()
        .param("q", json!("hello world"))
        .param("limit", json!(50));
    client.get_with("/search", config).await.unwrap();
}

#[tokio::test]
async fn test_absolute_request_url_ignores_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"direct": true})))
        .mount(&server)
        .await;

    // The base points nowhere; the absolute per-call URL must win.
    let client = Client::new(RequestConfig::new("").base_url("http://127.0.0.1:1"));
    let response = client
        .get(format!("{}/direct", server.uri()))
        .await
        .unwrap();

    assert_eq!(response.data["direct"], json!(true));
}

#[tokio::test]
async fn test_empty_url_is_a_configuration_error() {
    let server = MockServer::start().await;
    let client = bare_client(&server);

    let error = client.request(RequestConfig::default()).await.unwrap_err();
    assert!(matches!(error, ClientError::Configuration { .. }));
    assert_eq!(error.message(), "Request URL is required.");
}

// ============================================================================
// Bodies and content types
// ============================================================================

#[tokio::test]
async fn test_json_body_sets_content_type_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"name": "widget"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let client = bare_client(&server);
    let response = client.post("/items", json!({"name": "widget"})).await.unwrap();

    assert_eq!(response.status, 201);
    assert_eq!(response.data["id"], json!(7));
}

#[tokio::test]
async fn test_text_response_is_returned_as_raw_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("just text")
                .insert_header("Content-Type", "text/plain"),
        )
        .mount(&server)
        .await;

    let client = bare_client(&server);
    let response = client.get("/plain").await.unwrap();

    assert_eq!(response.data, Value::String("just text".to_string()));
}

#[tokio::test]
async fn test_unparseable_body_with_unknown_content_type_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/binary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0u8, 159, 146, 150])
                .insert_header("Content-Type", "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let client = bare_client(&server);
    let response = client.get("/binary").await.unwrap();

    assert_eq!(response.data, Value::Null);
}

#[tokio::test]
async fn test_delete_and_head_shorthands() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/items/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/items/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = bare_client(&server);

    let deleted = client.delete("/items/7").await.unwrap();
    assert_eq!(deleted.status, 204);
    assert_eq!(deleted.data, Value::Null);

    let head = client.head("/items/7").await.unwrap();
    assert_eq!(head.status, 200);
}

#[tokio::test]
async fn test_put_and_patch_shorthands_carry_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/items/7"))
        .and(body_json(json!({"name": "replaced"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/items/7"))
        .and(body_json(json!({"name": "patched"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = bare_client(&server);
    client.put("/items/7", json!({"name": "replaced"})).await.unwrap();
    client.patch("/items/7", json!({"name": "patched"})).await.unwrap();
}

// ============================================================================
// Idempotence and cancellation
// ============================================================================

#[tokio::test]
async fn test_identical_requests_produce_structurally_equal_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stable"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"n": 1}))
                .insert_header("X-Fixed", "constant"),
        )
        .mount(&server)
        .await;

    let client = bare_client(&server);
    let first = client.get("/stable").await.unwrap();
    let second = client.get("/stable").await.unwrap();

    assert_eq!(first.data, second.data);
    assert_eq!(first.status, second.status);
    assert_eq!(first.header("X-Fixed"), second.header("X-Fixed"));
}

#[tokio::test]
async fn test_cancellation_signal_aborts_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let client = bare_client(&server);
    let signal = CancellationToken::new();

    let cancel = signal.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let config = RequestConfig::default().signal(signal);
    let error = client.get_with("/slow", config).await.unwrap_err();

    assert!(matches!(error, ClientError::Transport { .. }));
    assert_eq!(error.message(), "Request aborted.");
}
