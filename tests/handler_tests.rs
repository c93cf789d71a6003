//! End-to-end tests of the HTTP facade driven through the router with a stub
//! adapter, covering authentication, outcome normalization and the health
//! endpoints.

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rust_bgc_api::adapter::BackgroundCheckAdapter;
use rust_bgc_api::config::Config;
use rust_bgc_api::errors::ProviderError;
use rust_bgc_api::handlers::{self, AppState};
use rust_bgc_api::models::{CheckData, CheckResponse};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Adapter stub with scripted outcomes.
struct StubAdapter {
    create_outcome: Result<CheckResponse, ProviderError>,
    get_outcome: Result<CheckResponse, ProviderError>,
    webhook_status: StatusCode,
    healthy: bool,
}

impl Default for StubAdapter {
    fn default() -> Self {
        Self {
            create_outcome: Ok(CheckResponse::default()),
            get_outcome: Ok(CheckResponse::default()),
            webhook_status: StatusCode::OK,
            healthy: true,
        }
    }
}

#[async_trait]
impl BackgroundCheckAdapter for StubAdapter {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn create_check(&self, _data: &CheckData) -> Result<CheckResponse, ProviderError> {
        self.create_outcome.clone()
    }

    async fn get_check(&self, _data: &CheckData) -> Result<CheckResponse, ProviderError> {
        self.get_outcome.clone()
    }

    async fn register_webhook_event(&self, _headers: &HeaderMap, _body: Bytes) -> StatusCode {
        self.webhook_status
    }

    async fn external_service_is_healthy(&self) -> bool {
        self.healthy
    }
}

fn test_config() -> Config {
    Config {
        port: 3000,
        request_password: "secret".to_string(),
        environment: "test".to_string(),
        sentry_dsn: None,
        provider_base_url: "https://provider.example.com".to_string(),
        provider_api_key: "test_key".to_string(),
        provider_webhook_secret: None,
    }
}

fn test_app(adapter: StubAdapter) -> Router {
    let state = Arc::new(AppState {
        config: test_config(),
        adapter: Arc::new(adapter),
    });

    Router::new()
        .route("/create_check", post(handlers::create_check))
        .route("/get_check", post(handlers::get_check))
        .route("/webhook", post(handlers::webhook))
        .route("/healthz", get(handlers::healthz))
        .route("/external_health", get(handlers::external_health))
        .with_state(state)
}

fn auth_header() -> String {
    BASE64.encode("secret")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, body)
}

fn check_request(uri: &str, authorization: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", authorization)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_create_check_success_returns_normalized_response() {
    let app = test_app(StubAdapter {
        create_outcome: Ok(CheckResponse {
            status: Some("CREATED".to_string()),
            external_id: Some("E1".to_string()),
            metadata: None,
            error_details: None,
        }),
        ..Default::default()
    });

    let body = r#"{"first_name":"Jane","email":"j@x.com","external_id":"E1"}"#;
    let (status, json_body) = send(app, check_request("/create_check", &auth_header(), body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_body,
        json!({
            "status": "CREATED",
            "external_id": "E1",
            "metadata": null,
            "error_details": null
        })
    );
}

#[tokio::test]
async fn test_create_check_rejects_wrong_secret() {
    let app = test_app(StubAdapter::default());

    let wrong = BASE64.encode("not-the-secret");
    let body = r#"{"first_name":"Jane","external_id":"E1"}"#;
    let (status, json_body) = send(app, check_request("/create_check", &wrong, body)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json_body["status"], "FAILED");
    assert_eq!(
        json_body["error_details"][0]["code"],
        "SATELLITE_UNAUTHORIZED_ERROR"
    );
}

#[tokio::test]
async fn test_create_check_rejects_missing_authorization_header() {
    let app = test_app(StubAdapter::default());

    let request = Request::builder()
        .method("POST")
        .uri("/create_check")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, json_body) = send(app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        json_body["error_details"][0]["code"],
        "SATELLITE_UNAUTHORIZED_ERROR"
    );
}

#[tokio::test]
async fn test_get_check_not_found_maps_to_404() {
    let app = test_app(StubAdapter {
        get_outcome: Err(ProviderError::NotFound("check missing".to_string())),
        ..Default::default()
    });

    let body = r#"{"external_id":"E1"}"#;
    let (status, json_body) = send(app, check_request("/get_check", &auth_header(), body)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body["status"], "FAILED");
    assert_eq!(json_body["external_id"], "E1");
    assert_eq!(
        json_body["error_details"],
        json!([{"code": "PROVIDER_NOT_FOUND_ERROR", "message": "check missing"}])
    );
}

#[tokio::test]
async fn test_create_check_maps_every_provider_failure_category() {
    let cases = vec![
        (
            ProviderError::BadRequest("detail".into()),
            StatusCode::BAD_REQUEST,
            "PROVIDER_BAD_REQUEST_ERROR",
        ),
        (
            ProviderError::Timeout("detail".into()),
            StatusCode::REQUEST_TIMEOUT,
            "PROVIDER_TIMEOUT_ERROR",
        ),
        (
            ProviderError::Unauthorized("detail".into()),
            StatusCode::UNAUTHORIZED,
            "PROVIDER_UNAUTHORIZED_ERROR",
        ),
        (
            ProviderError::Forbidden("detail".into()),
            StatusCode::FORBIDDEN,
            "PROVIDER_FORBIDDEN_ERROR",
        ),
        (
            ProviderError::NotFound("detail".into()),
            StatusCode::NOT_FOUND,
            "PROVIDER_NOT_FOUND_ERROR",
        ),
        (
            ProviderError::UnprocessableEntity("detail".into()),
            StatusCode::UNPROCESSABLE_ENTITY,
            "PROVIDER_UNPROCESSABLE_ENTITY_ERROR",
        ),
        (
            ProviderError::ServiceUnavailable("detail".into()),
            StatusCode::SERVICE_UNAVAILABLE,
            "PROVIDER_SERVICE_UNAVAILABLE_ERROR",
        ),
    ];

    for (error, expected_status, expected_code) in cases {
        let app = test_app(StubAdapter {
            create_outcome: Err(error),
            ..Default::default()
        });

        let body = r#"{"email":"j@x.com","external_id":"E1"}"#;
        let (status, json_body) =
            send(app, check_request("/create_check", &auth_header(), body)).await;

        assert_eq!(status, expected_status, "code {}", expected_code);
        assert_eq!(json_body["status"], "FAILED");
        let details = json_body["error_details"].as_array().unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0]["code"], expected_code);
        assert_eq!(details[0]["message"], "detail");
    }
}

#[tokio::test]
async fn test_malformed_body_is_a_clean_400() {
    let app = test_app(StubAdapter::default());

    let (status, json_body) = send(
        app,
        check_request("/create_check", &auth_header(), "{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_authentication_runs_before_body_parsing() {
    let app = test_app(StubAdapter::default());

    let wrong = BASE64.encode("not-the-secret");
    let (status, json_body) = send(app, check_request("/create_check", &wrong, "{not json")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        json_body["error_details"][0]["code"],
        "SATELLITE_UNAUTHORIZED_ERROR"
    );
}

#[tokio::test]
async fn test_webhook_echoes_adapter_status() {
    let app = test_app(StubAdapter::default());

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"external_id":"E1","status":"COMPLETED"}"#))
        .unwrap();
    let (status, json_body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body, json!({"success": true}));
}

#[tokio::test]
async fn test_webhook_echoes_adapter_rejection() {
    let app = test_app(StubAdapter {
        webhook_status: StatusCode::SERVICE_UNAVAILABLE,
        ..Default::default()
    });

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .body(Body::empty())
        .unwrap();
    let (status, json_body) = send(app, request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body, json!({"success": false}));
}

#[tokio::test]
async fn test_healthz_is_always_200() {
    // Liveness must not depend on the adapter or the upstream provider.
    let app = test_app(StubAdapter {
        healthy: false,
        create_outcome: Err(ProviderError::ServiceUnavailable("down".into())),
        ..Default::default()
    });

    let request = Request::builder()
        .method("GET")
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();
    let (status, json_body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body, json!({}));
}

#[tokio::test]
async fn test_external_health_reflects_probe_outcome() {
    for (healthy, expected) in [(true, StatusCode::OK), (false, StatusCode::SERVICE_UNAVAILABLE)] {
        let app = test_app(StubAdapter {
            healthy,
            ..Default::default()
        });

        let request = Request::builder()
            .method("GET")
            .uri("/external_health")
            .body(Body::empty())
            .unwrap();
        let (status, json_body) = send(app, request).await;

        assert_eq!(status, expected);
        assert_eq!(json_body, json!({}));
    }
}
