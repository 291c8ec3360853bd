pub mod anthropic;
pub mod deepseek;
pub mod openai;

use reqwest::header::HeaderMap;
use std::sync::Arc;
use super::{ ChatModel, LlmConfig, ProviderError };
use crate::models::chat::ChatMessage;
use self::anthropic::AnthropicChatClient;
use self::openai::ChatCompletionsClient;

/// Token ceiling sent to every provider.
pub const MAX_TOKENS: u32 = 2048;

/// A fully built upstream call, ready to hand to the HTTP client.
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

/// One upstream chat API. Adapters hold no per-request state.
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn build_request(
        &self,
        system: &str,
        messages: &[ChatMessage]
    ) -> Result<WireRequest, ProviderError>;

    fn parse_response(&self, raw: &str) -> Result<String, ProviderError>;
}

pub fn new_provider(model: ChatModel, config: &LlmConfig) -> Arc<dyn ChatProvider> {
    match model {
        ChatModel::Claude => Arc::new(AnthropicChatClient::from_settings(&config.anthropic)),
        ChatModel::Codex => Arc::new(ChatCompletionsClient::openai(&config.openai)),
        ChatModel::DeepSeek => Arc::new(deepseek::client(&config.deepseek)),
    }
}
