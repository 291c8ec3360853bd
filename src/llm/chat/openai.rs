use reqwest::header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION };
use serde::{ Deserialize, Serialize };

use super::{ ChatProvider, WireRequest, MAX_TOKENS };
use crate::llm::{ ProviderError, ProviderSettings };
use crate::models::chat::ChatMessage;

pub const DEFAULT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const MODEL: &str = "gpt-4o-mini";

/// Client for any `/chat/completions` style API: the system prompt travels as
/// the first message and the reply sits at `choices[0].message.content`.
pub struct ChatCompletionsClient {
    name: &'static str,
    key_var: &'static str,
    api_key: Option<String>,
    url: String,
    model: &'static str,
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl ChatCompletionsClient {
    pub fn new(
        name: &'static str,
        key_var: &'static str,
        api_key: Option<String>,
        url: String,
        model: &'static str
    ) -> Self {
        Self { name, key_var, api_key, url, model }
    }

    pub fn openai(settings: &ProviderSettings) -> Self {
        Self::new(
            "OpenAI",
            "OPENAI_API_KEY",
            settings.api_key.clone(),
            settings.base_url.clone().unwrap_or_else(|| DEFAULT_URL.to_string()),
            MODEL
        )
    }

    pub fn model(&self) -> &str {
        self.model
    }
}

impl ChatProvider for ChatCompletionsClient {
    fn name(&self) -> &'static str {
        self.name
    }

    fn build_request(
        &self,
        system: &str,
        messages: &[ChatMessage]
    ) -> Result<WireRequest, ProviderError> {
        let api_key = self.api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential(self.key_var))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                ProviderError::InvalidHeader {
                    provider: self.name,
                    reason: e.to_string(),
                }
            })?
        );

        let mut wire_messages = Vec::with_capacity(messages.len() + 1);
        wire_messages.push(CompletionMessage { role: "system", content: system });
        wire_messages.extend(
            messages.iter().map(|m| CompletionMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
        );

        let req = CompletionRequest {
            model: self.model,
            messages: wire_messages,
            max_tokens: MAX_TOKENS,
        };
        let body = serde_json::to_value(&req).map_err(|source| ProviderError::Serialize {
            provider: self.name,
            source,
        })?;

        Ok(WireRequest { url: self.url.clone(), headers, body })
    }

    fn parse_response(&self, raw: &str) -> Result<String, ProviderError> {
        let unexpected = || ProviderError::UnexpectedBody {
            provider: self.name,
            raw: raw.to_string(),
        };
        let resp: CompletionResponse = serde_json::from_str(raw).map_err(|_| unexpected())?;
        resp.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(unexpected)
    }
}
