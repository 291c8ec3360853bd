use reqwest::header::{ HeaderMap, HeaderValue, CONTENT_TYPE };
use serde::{ Deserialize, Serialize };

use super::{ ChatProvider, WireRequest, MAX_TOKENS };
use crate::llm::{ ProviderError, ProviderSettings };
use crate::models::chat::{ ChatMessage, ChatRole };

pub const DEFAULT_URL: &str = "https://api.anthropic.com/v1/messages";
pub const MODEL: &str = "claude-opus-4-20250514";
pub const API_VERSION: &str = "2023-06-01";

pub struct AnthropicChatClient {
    api_key: Option<String>,
    url: String,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'static str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

impl AnthropicChatClient {
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_key,
            url: base_url.unwrap_or_else(|| DEFAULT_URL.to_string()),
        }
    }

    pub fn from_settings(settings: &ProviderSettings) -> Self {
        Self::new(settings.api_key.clone(), settings.base_url.clone())
    }
}

impl ChatProvider for AnthropicChatClient {
    fn name(&self) -> &'static str {
        "Anthropic"
    }

    fn build_request(
        &self,
        system: &str,
        messages: &[ChatMessage]
    ) -> Result<WireRequest, ProviderError> {
        let api_key = self.api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential("ANTHROPIC_API_KEY"))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).map_err(|e| ProviderError::InvalidHeader {
                provider: self.name(),
                reason: e.to_string(),
            })?
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));

        let req = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: messages
                .iter()
                .map(|m| AnthropicMessage {
                    role: match m.role {
                        ChatRole::Assistant => "assistant",
                        ChatRole::User => "user",
                    },
                    content: &m.content,
                })
                .collect(),
        };
        let body = serde_json::to_value(&req).map_err(|source| ProviderError::Serialize {
            provider: self.name(),
            source,
        })?;

        Ok(WireRequest { url: self.url.clone(), headers, body })
    }

    fn parse_response(&self, raw: &str) -> Result<String, ProviderError> {
        let unexpected = || ProviderError::UnexpectedBody {
            provider: self.name(),
            raw: raw.to_string(),
        };
        let resp: AnthropicResponse = serde_json::from_str(raw).map_err(|_| unexpected())?;
        resp.content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(unexpected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::chat::test_support::three_turns;
    use serde_json::json;

    fn client() -> AnthropicChatClient {
        AnthropicChatClient::new(Some("sk-ant-test".into()), None)
    }

    #[test]
    fn request_places_system_at_top_level() {
        let wire = client().build_request("Be brief.", &three_turns()).unwrap();
        assert_eq!(wire.url, DEFAULT_URL);
        assert_eq!(wire.headers["x-api-key"], "sk-ant-test");
        assert_eq!(wire.headers["anthropic-version"], API_VERSION);
        assert_eq!(
            wire.body,
            json!({
                "model": MODEL,
                "max_tokens": 2048,
                "system": "Be brief.",
                "messages": [
                    {"role": "user", "content": "A"},
                    {"role": "assistant", "content": "B"},
                    {"role": "user", "content": "C"}
                ]
            })
        );
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = AnthropicChatClient::new(None, None)
            .build_request("sys", &three_turns())
            .unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential("ANTHROPIC_API_KEY")));
    }

    #[test]
    fn parses_first_content_block() {
        let raw = r#"{"id":"msg_1","content":[{"type":"text","text":"Looks feasible."},{"type":"text","text":"ignored"}]}"#;
        assert_eq!(client().parse_response(raw).unwrap(), "Looks feasible.");
    }

    #[test]
    fn empty_content_keeps_raw_body() {
        let raw = r#"{"content":[]}"#;
        match client().parse_response(raw) {
            Err(ProviderError::UnexpectedBody { raw: kept, .. }) => assert_eq!(kept, raw),
            other => panic!("expected UnexpectedBody, got {:?}", other),
        }
    }
}
