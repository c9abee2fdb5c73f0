#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aide::openapi::OpenApi;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Extension, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use relay::middleware::ApiKey;
use relay::routes;
use relay::types::Environment;
use relay::upstream::{UpstreamClient, UpstreamConfig};

/// Bearer token the test router is configured with
pub const TEST_API_KEY: &str = "test-api-key";

type Script = Arc<Mutex<VecDeque<(u16, Value)>>>;

/// One request observed by the scripted upstream
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct ScriptState {
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    verification: Script,
    trace: Script,
    fallback: Option<(u16, Value)>,
}

/// In-process stand-in for the upstream verification API.
///
/// Serves scripted `(status, body)` responses per endpoint kind and records
/// every request it sees, so tests can assert exact call counts and payloads.
pub struct ScriptedUpstream {
    pub base_url: String,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ScriptedUpstream {
    /// Same script for both endpoint kinds
    pub async fn with_script(script: Vec<(u16, Value)>) -> Self {
        Self::start(script.clone(), script, None).await
    }

    /// Independent scripts for the verification and trace endpoints
    pub async fn split(verification: Vec<(u16, Value)>, trace: Vec<(u16, Value)>) -> Self {
        Self::start(verification, trace, None).await
    }

    /// Answers every request with the same response
    pub async fn always(status: u16, body: Value) -> Self {
        Self::start(Vec::new(), Vec::new(), Some((status, body))).await
    }

    async fn start(
        verification: Vec<(u16, Value)>,
        trace: Vec<(u16, Value)>,
        fallback: Option<(u16, Value)>,
    ) -> Self {
        let state = ScriptState {
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            verification: Arc::new(Mutex::new(verification.into())),
            trace: Arc::new(Mutex::new(trace.into())),
            fallback,
        };

        let calls = state.calls.clone();
        let requests = state.requests.clone();

        let router = Router::new().fallback(respond).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind scripted upstream");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve scripted upstream");
        });

        Self {
            base_url: format!("http://{addr}"),
            calls,
            requests,
        }
    }

    /// Total number of requests observed
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request observed, in order
    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn respond(
    State(state): State<ScriptState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> impl IntoResponse {
    state.calls.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        body: serde_json::from_slice(&body).ok(),
    });

    let queue = if uri.path().starts_with("/trace") {
        &state.trace
    } else {
        &state.verification
    };
    let next = queue
        .lock()
        .unwrap()
        .pop_front()
        .or_else(|| state.fallback.clone());
    let (status, body) =
        next.unwrap_or((500, serde_json::json!({ "error": "script exhausted" })));

    (
        StatusCode::from_u16(status).expect("scripted status"),
        axum::Json(body),
    )
}

/// Client configuration pointed at a scripted upstream, with intervals
/// shrunk so poll loops finish quickly
pub fn test_config(base_url: &str) -> UpstreamConfig {
    UpstreamConfig {
        base_url: base_url.to_string(),
        verification_path: "verify".to_string(),
        trace_path: "trace".to_string(),
        client_cert_path: None,
        client_key_path: None,
        accept_invalid_upstream_certs: false,
        poll_interval: Duration::from_millis(20),
        submit_grace: Duration::from_millis(10),
        max_poll_attempts: 10,
    }
}

pub fn test_client(base_url: &str) -> UpstreamClient {
    UpstreamClient::new(test_config(base_url)).expect("build upstream client")
}

/// Full application router wired to the given upstream client
pub fn app_router(upstream: Arc<UpstreamClient>) -> Router {
    let mut openapi = OpenApi::default();
    routes::handler()
        .finish_api(&mut openapi)
        .layer(Extension(openapi))
        .layer(Extension(Environment::Development))
        .layer(Extension(ApiKey::new(TEST_API_KEY.to_string())))
        .layer(Extension(upstream))
}

/// POSTs a JSON payload through the router and returns status + parsed body
pub async fn post_json(
    router: &Router,
    path: &str,
    token: Option<&str>,
    payload: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .uri(path)
        .method("POST")
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(payload.to_string()))
        .expect("build request");

    let response = router.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// GETs a path through the router and returns status + parsed body
pub async fn get_json(router: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(path)
        .method("GET")
        .body(Body::empty())
        .expect("build request");

    let response = router.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
