#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use mockview_api::auth::jwt::{generate_access_token, JwtConfig};
use mockview_api::config::ServerConfig;
use mockview_api::router::build_app_router;
use mockview_api::services::Services;
use mockview_api::state::AppState;
use mockview_core::generator::{GenerateError, TextGenerator};
use mockview_core::interview::{Interview, InterviewUpdate, NewInterview};
use mockview_core::store::{InterviewStore, StoreError};
use mockview_core::types::InterviewId;
use mockview_db::MemoryInterviewStore;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// A model reply wrapped in a markdown fence, as the AI service tends to send.
pub const GOROUTINE_REPLY: &str =
    "```json\n[{\"question\":\"What is a goroutine?\",\"answer\":\"...\"}]\n```";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        question_count: 5,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

// ---------------------------------------------------------------------------
// Collaborator doubles
// ---------------------------------------------------------------------------

/// In-memory store that counts writes and can be switched to fail.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryInterviewStore,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    pub fail_writes: AtomicBool,
    pub unhealthy: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn reset_counts(&self) {
        self.creates.store(0, Ordering::SeqCst);
        self.updates.store(0, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl InterviewStore for CountingStore {
    async fn create(&self, input: NewInterview) -> Result<InterviewId, StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;
        self.inner.create(input).await
    }

    async fn update(&self, key: &str, update: InterviewUpdate) -> Result<(), StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;
        self.inner.update(key, update).await
    }

    async fn get(&self, key: &str) -> Result<Option<Interview>, StoreError> {
        self.inner.get(key).await
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Interview>, StoreError> {
        self.inner.list_by_owner(user_id).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store unreachable".into()));
        }
        Ok(())
    }
}

/// Generator that replays queued replies, then repeats a default one.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GenerateError>>>,
    default_reply: String,
    pub calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(default_reply: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply: default_reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn push(&self, reply: Result<String, GenerateError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => Ok(self.default_reply.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Build the full application router with all middleware layers, using the
/// given collaborators.
///
/// Uses the same `build_app_router` as `main.rs` so integration tests
/// exercise the production middleware stack.
pub fn build_test_app(store: Arc<CountingStore>, generator: Arc<ScriptedGenerator>) -> Router {
    let config = test_config();
    let services = Services {
        store,
        generator,
        analytics: None,
    };
    let router_config = config.clone();
    build_app_router(AppState::new(config, services), &router_config)
}

/// Mint a bearer token for `user_id` with the test secret.
pub fn token_for(user_id: &str) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_auth(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_auth(app, Method::POST, uri, body, None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_auth(app, Method::POST, uri, body, Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_auth(app, Method::PUT, uri, body, Some(token)).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
