//! In-process stand-in for the three provider APIs.

use axum::{
    extract::State,
    http::StatusCode,
    response::{ IntoResponse, Response },
    routing::post,
    Json,
    Router,
};
use serde_json::{ json, Value };
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{ Arc, Mutex };
use std::time::Duration;

use crate::llm::{ LlmConfig, ProviderSettings };

#[derive(Clone, Default)]
struct MockState {
    bodies: Arc<Mutex<HashMap<&'static str, Vec<Value>>>>,
    reply: Arc<Mutex<Option<(u16, String)>>>,
    delay: Arc<Mutex<Duration>>,
}

pub struct MockUpstream {
    addr: SocketAddr,
    state: MockState,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/anthropic", post(anthropic))
            .route("/openai", post(openai))
            .route("/deepseek", post(deepseek))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self, route: &str) -> String {
        format!("http://{}/{}", self.addr, route)
    }

    /// Answer every later call with `status` and `body` instead of a canned reply.
    pub fn reply_with(&self, status: u16, body: &str) {
        *self.state.reply.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn delay_by(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = delay;
    }

    pub fn hits(&self, route: &str) -> usize {
        self.state.bodies.lock().unwrap().get(route).map_or(0, Vec::len)
    }

    pub fn total_hits(&self) -> usize {
        self.state.bodies.lock().unwrap().values().map(Vec::len).sum()
    }

    pub fn last_body(&self, route: &str) -> Option<Value> {
        self.state.bodies.lock().unwrap().get(route).and_then(|b| b.last().cloned())
    }
}

pub fn mock_config(upstream: &MockUpstream) -> LlmConfig {
    LlmConfig {
        anthropic: ProviderSettings::new(Some("ant-key".into()), Some(upstream.url("anthropic"))),
        openai: ProviderSettings::new(Some("oai-key".into()), Some(upstream.url("openai"))),
        deepseek: ProviderSettings::new(Some("ds-key".into()), Some(upstream.url("deepseek"))),
        timeout: Duration::from_secs(5),
    }
}

async fn respond(state: MockState, route: &'static str, body: Value, canned: Value) -> Response {
    state.bodies.lock().unwrap().entry(route).or_default().push(body);

    let delay = *state.delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let reply = state.reply.lock().unwrap().clone();
    match reply {
        Some((status, text)) => {
            let status = StatusCode::from_u16(status).unwrap();
            (status, text).into_response()
        }
        None => Json(canned).into_response(),
    }
}

async fn anthropic(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let canned = json!({
        "id": "msg_mock",
        "type": "message",
        "content": [{"type": "text", "text": "claude says hi"}]
    });
    respond(state, "anthropic", body, canned).await
}

async fn openai(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let canned = json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": "codex says hi"}}]
    });
    respond(state, "openai", body, canned).await
}

async fn deepseek(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let canned = json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": "deepseek says hi"}}]
    });
    respond(state, "deepseek", body, canned).await
}
