use log::{ error, info, warn };
use reqwest::Client as HttpClient;
use std::error::Error as StdError;

use crate::error::GatewayError;
use crate::llm::chat::{ new_provider, ChatProvider };
use crate::llm::{ ChatModel, LlmConfig };
use crate::models::chat::{ ChatMessage, ChatRequest, ChatResponse };
use crate::rate_limit::RateLimiter;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an AI assistant that helps people plan digital projects.";

/// Receives chat turns, applies the per-client limit and forwards them to the
/// selected provider.
pub struct Gateway {
    http: HttpClient,
    config: LlmConfig,
    limiter: RateLimiter,
}

impl Gateway {
    pub fn new(config: LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            limiter: RateLimiter::new(),
        })
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Handle a raw `POST /api/chat` body. The limiter is consulted before the
    /// body is even parsed, so malformed requests still use up a slot.
    pub async fn handle(&self, body: &[u8], client_key: &str) -> Result<ChatResponse, GatewayError> {
        if !self.limiter.admit(client_key) {
            warn!("Rate limit exceeded for {}", client_key);
            return Err(GatewayError::RateLimited);
        }

        let request: ChatRequest = serde_json
            ::from_slice(body)
            .map_err(|e| GatewayError::BadRequest(format!("Invalid JSON body: {}", e)))?;
        let messages = validate_messages(request.messages)?;

        let system = request.context
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);

        let requested = request.model.filter(|m| !m.is_empty());
        let model = ChatModel::resolve(requested.as_deref());
        let provider = new_provider(model, &self.config);
        info!(
            "Chat request from {} ({} messages) routed to {}",
            client_key,
            messages.len(),
            provider.name()
        );

        let message = self.dispatch(provider.as_ref(), system, &messages).await?;

        Ok(ChatResponse {
            message,
            model: requested.unwrap_or_else(|| ChatModel::DEFAULT.to_string()),
        })
    }

    async fn dispatch(
        &self,
        provider: &dyn ChatProvider,
        system: &str,
        messages: &[ChatMessage]
    ) -> Result<String, GatewayError> {
        let wire = provider.build_request(system, messages).map_err(|e| {
            error!("{} request could not be built: {}", provider.name(), e);
            GatewayError::from(e)
        })?;

        let resp = self.http
            .post(&wire.url)
            .headers(wire.headers)
            .json(&wire.body)
            .send().await
            .map_err(|e| self.transport_error(provider.name(), e))?;

        let status = resp.status();
        let raw = resp.text().await.map_err(|e| self.transport_error(provider.name(), e))?;

        if !status.is_success() {
            error!("{} API error ({}): {}", provider.name(), status, raw);
            return Err(GatewayError::Upstream {
                provider: provider.name(),
                status: status.as_u16(),
                body: raw,
            });
        }

        provider.parse_response(&raw).map_err(|e| {
            error!("{}", e);
            GatewayError::from(e)
        })
    }

    fn transport_error(&self, provider: &'static str, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            error!("{} timed out after {:?}", provider, self.config.timeout);
            return GatewayError::UpstreamTimeout {
                provider,
                after: self.config.timeout,
            };
        }
        error!("{} request failed: {}", provider, e);
        GatewayError::Transport {
            provider,
            reason: e.to_string(),
        }
    }
}

fn validate_messages(raw: Option<serde_json::Value>) -> Result<Vec<ChatMessage>, GatewayError> {
    match raw {
        Some(value @ serde_json::Value::Array(_)) => {
            serde_json
                ::from_value(value)
                .map_err(|e| GatewayError::BadRequest(format!("Invalid message: {}", e)))
        }
        _ => Err(GatewayError::BadRequest("Messages are required".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{ mock_config, MockUpstream };
    use serde_json::json;
    use std::time::Duration;

    fn conversation(model: Option<&str>) -> Vec<u8> {
        let mut body = json!({
            "messages": [
                {"role": "user", "content": "A"},
                {"role": "assistant", "content": "B"},
                {"role": "user", "content": "C"}
            ]
        });
        if let Some(m) = model {
            body["model"] = json!(m);
        }
        serde_json::to_vec(&body).unwrap()
    }

    #[tokio::test]
    async fn absent_model_uses_claude_and_echoes_claude() {
        let upstream = MockUpstream::start().await;
        let gateway = Gateway::new(mock_config(&upstream)).unwrap();

        let resp = gateway.handle(&conversation(None), "1.1.1.1").await.unwrap();
        assert_eq!(resp.model, "claude");
        assert_eq!(resp.message, "claude says hi");
        assert_eq!(upstream.hits("anthropic"), 1);
    }

    #[tokio::test]
    async fn unknown_model_uses_claude_but_echoes_requested_tag() {
        let upstream = MockUpstream::start().await;
        let gateway = Gateway::new(mock_config(&upstream)).unwrap();

        let resp = gateway.handle(&conversation(Some("gpt-5-turbo")), "1.1.1.1").await.unwrap();
        assert_eq!(resp.model, "gpt-5-turbo");
        assert_eq!(resp.message, "claude says hi");
        assert_eq!(upstream.hits("anthropic"), 1);
    }

    #[tokio::test]
    async fn uppercase_tag_goes_to_claude_and_is_echoed() {
        let upstream = MockUpstream::start().await;
        let gateway = Gateway::new(mock_config(&upstream)).unwrap();

        let resp = gateway.handle(&conversation(Some("CODEX")), "1.1.1.2").await.unwrap();
        assert_eq!(resp.model, "CODEX");
        assert_eq!(resp.message, "claude says hi");
        assert_eq!(upstream.hits("anthropic"), 1);
        assert_eq!(upstream.hits("openai"), 0);
    }

    #[tokio::test]
    async fn order_and_roles_survive_for_every_provider() {
        let upstream = MockUpstream::start().await;
        let gateway = Gateway::new(mock_config(&upstream)).unwrap();

        for model in ["claude", "codex", "deepseek"] {
            let resp = gateway.handle(&conversation(Some(model)), "2.2.2.2").await.unwrap();
            assert_eq!(resp.model, model);
        }

        let turns = json!([
            {"role": "user", "content": "A"},
            {"role": "assistant", "content": "B"},
            {"role": "user", "content": "C"}
        ]);

        let claude = upstream.last_body("anthropic").unwrap();
        assert_eq!(claude["messages"], turns);
        assert_eq!(claude["system"], DEFAULT_SYSTEM_PROMPT);

        for route in ["openai", "deepseek"] {
            let body = upstream.last_body(route).unwrap();
            let msgs = body["messages"].as_array().unwrap();
            assert_eq!(msgs[0], json!({"role": "system", "content": DEFAULT_SYSTEM_PROMPT}));
            assert_eq!(json!(msgs[1..]), turns);
            assert_eq!(body["max_tokens"], 2048);
        }
    }

    #[tokio::test]
    async fn context_replaces_default_instruction() {
        let upstream = MockUpstream::start().await;
        let gateway = Gateway::new(mock_config(&upstream)).unwrap();

        let body = json!({
            "messages": [{"role": "user", "content": "hi"}],
            "model": "codex",
            "context": "Project: school website"
        });
        gateway.handle(&serde_json::to_vec(&body).unwrap(), "k").await.unwrap();
        let sent = upstream.last_body("openai").unwrap();
        assert_eq!(sent["messages"][0]["content"], "Project: school website");

        let empty_ctx = json!({
            "messages": [{"role": "user", "content": "hi"}],
            "model": "codex",
            "context": ""
        });
        gateway.handle(&serde_json::to_vec(&empty_ctx).unwrap(), "k").await.unwrap();
        let sent = upstream.last_body("openai").unwrap();
        assert_eq!(sent["messages"][0]["content"], DEFAULT_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn upstream_failure_is_reported_not_retried() {
        let upstream = MockUpstream::start().await;
        upstream.reply_with(500, r#"{"error":"overloaded"}"#);
        let gateway = Gateway::new(mock_config(&upstream)).unwrap();

        let err = gateway.handle(&conversation(Some("deepseek")), "3.3.3.3").await.unwrap_err();
        match &err {
            GatewayError::Upstream { status, body, .. } => {
                assert_eq!(*status, 500);
                assert_eq!(body, r#"{"error":"overloaded"}"#);
            }
            other => panic!("expected Upstream, got {:?}", other),
        }
        assert_eq!(err.kind(), "upstream-error");
        assert_eq!(upstream.hits("deepseek"), 1);
    }

    #[tokio::test]
    async fn malformed_messages_are_rejected_after_consuming_a_slot() {
        let upstream = MockUpstream::start().await;
        let gateway = Gateway::new(mock_config(&upstream)).unwrap();

        let missing = gateway.handle(br#"{"model":"claude"}"#, "4.4.4.4").await.unwrap_err();
        assert!(matches!(missing, GatewayError::BadRequest(_)));
        let not_a_list = gateway
            .handle(br#"{"messages":"hello"}"#, "4.4.4.4").await
            .unwrap_err();
        assert!(matches!(not_a_list, GatewayError::BadRequest(_)));

        assert_eq!(gateway.limiter().record("4.4.4.4").unwrap().count, 2);
        assert_eq!(upstream.total_hits(), 0);
    }

    #[tokio::test]
    async fn roles_outside_user_and_assistant_are_rejected_for_every_provider() {
        let upstream = MockUpstream::start().await;
        let gateway = Gateway::new(mock_config(&upstream)).unwrap();

        for model in ["claude", "codex", "deepseek"] {
            let body = json!({
                "messages": [{"role": "system", "content": "be terse"}],
                "model": model
            });
            let err = gateway.handle(&serde_json::to_vec(&body).unwrap(), "4.4.4.5").await.unwrap_err();
            assert!(matches!(err, GatewayError::BadRequest(_)), "{} accepted a system turn", model);
        }
        assert_eq!(upstream.total_hits(), 0);
    }

    #[tokio::test]
    async fn rate_limited_requests_never_reach_upstream() {
        let upstream = MockUpstream::start().await;
        let gateway = Gateway::new(mock_config(&upstream)).unwrap();

        for _ in 0..crate::rate_limit::RATE_LIMIT {
            gateway.handle(&conversation(None), "5.5.5.5").await.unwrap();
        }
        let err = gateway.handle(&conversation(None), "5.5.5.5").await.unwrap_err();
        assert!(matches!(err, GatewayError::RateLimited));
        assert_eq!(upstream.hits("anthropic"), 20);
    }

    #[tokio::test]
    async fn missing_credential_fails_only_that_request() {
        let upstream = MockUpstream::start().await;
        let mut config = mock_config(&upstream);
        config.openai.api_key = None;
        let gateway = Gateway::new(config).unwrap();

        let err = gateway.handle(&conversation(Some("codex")), "6.6.6.6").await.unwrap_err();
        assert_eq!(err.kind(), "configuration-error");
        assert_eq!(upstream.total_hits(), 0);

        let ok = gateway.handle(&conversation(Some("claude")), "6.6.6.6").await.unwrap();
        assert_eq!(ok.message, "claude says hi");
    }

    #[tokio::test]
    async fn unexpected_body_keeps_raw_text() {
        let upstream = MockUpstream::start().await;
        upstream.reply_with(200, r#"{"choices":[]}"#);
        let gateway = Gateway::new(mock_config(&upstream)).unwrap();

        let err = gateway.handle(&conversation(Some("codex")), "7.7.7.7").await.unwrap_err();
        match err {
            GatewayError::UnexpectedBody { raw, .. } => assert_eq!(raw, r#"{"choices":[]}"#),
            other => panic!("expected UnexpectedBody, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let upstream = MockUpstream::start().await;
        upstream.delay_by(Duration::from_millis(500));
        let mut config = mock_config(&upstream);
        config.timeout = Duration::from_millis(50);
        let gateway = Gateway::new(config).unwrap();

        let err = gateway.handle(&conversation(None), "8.8.8.8").await.unwrap_err();
        assert_eq!(err.kind(), "upstream-timeout");
    }
}
