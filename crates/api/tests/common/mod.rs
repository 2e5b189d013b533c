//! Shared test harness: a scripted provider, router construction, and
//! request/response helpers.
//!
//! `build_test_app` mirrors the production router construction so tests
//! exercise the same middleware stack (CORS, request ID, timeout, tracing,
//! panic recovery) that production uses.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;

use logoloco_api::auth::jwt::{create_token, JwtConfig};
use logoloco_api::config::ServerConfig;
use logoloco_api::router::build_app_router;
use logoloco_api::state::AppState;
use logoloco_eachlabs::normalize::{normalize_status, normalize_submission};
use logoloco_eachlabs::{ImageProvider, ProviderError, ProviderStatusResult, ProviderSubmission};

pub const TEST_JWT_SECRET: &str = "test-secret";

// ---------------------------------------------------------------------------
// Scripted provider
// ---------------------------------------------------------------------------

/// An [`ImageProvider`] that replays scripted responses in order.
#[derive(Default)]
pub struct MockProvider {
    submit_results: Mutex<VecDeque<Result<ProviderSubmission, ProviderError>>>,
    status_results: Mutex<VecDeque<Result<ProviderStatusResult, ProviderError>>>,
}

impl MockProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script a successful submit from a raw provider payload; the payload
    /// goes through the same normalization as a live response.
    pub fn push_submit_ok(&self, raw: Value) {
        self.submit_results
            .lock()
            .unwrap()
            .push_back(Ok(normalize_submission(raw)));
    }

    pub fn push_submit_err(&self, err: ProviderError) {
        self.submit_results.lock().unwrap().push_back(Err(err));
    }

    pub fn push_status_ok(&self, raw: Value) {
        self.status_results
            .lock()
            .unwrap()
            .push_back(Ok(normalize_status(raw)));
    }

    pub fn push_status_err(&self, err: ProviderError) {
        self.status_results.lock().unwrap().push_back(Err(err));
    }
}

#[async_trait]
impl ImageProvider for MockProvider {
    async fn submit(
        &self,
        _provider_model_id: &str,
        _prompt: &str,
        _output_count: i32,
    ) -> Result<ProviderSubmission, ProviderError> {
        self.submit_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Unreachable("no scripted response".into())))
    }

    async fn fetch_status(
        &self,
        _prediction_id: &str,
    ) -> Result<ProviderStatusResult, ProviderError> {
        self.status_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Unreachable("no scripted response".into())))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        signup_bonus_credits: 1,
        history_retention_days: 90,
        admin_emails: vec!["admin@example.com".to_string()],
        polar_webhook_secret: None,
        eachlabs_api_url: "http://127.0.0.1:9".to_string(),
        eachlabs_api_key: "test-key".to_string(),
        eachlabs_timeout_ms: 1000,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(pool: PgPool, provider: Arc<MockProvider>, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        provider,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// A signed bearer token for the given identity.
pub fn bearer_token(user_id: &str, email: &str) -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
    };
    create_token(user_id, email, 3600, &config).unwrap()
}

/// Build a request with an optional bearer token and JSON body.
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}
