use super::openai::ChatCompletionsClient;
use crate::llm::ProviderSettings;

pub const DEFAULT_URL: &str = "https://api.deepseek.com/chat/completions";
pub const MODEL: &str = "deepseek-chat";

/// DeepSeek speaks the OpenAI chat completions dialect on its own endpoint.
pub fn client(settings: &ProviderSettings) -> ChatCompletionsClient {
    ChatCompletionsClient::new(
        "DeepSeek",
        "DEEPSEEK_API_KEY",
        settings.api_key.clone(),
        settings.base_url.clone().unwrap_or_else(|| DEFAULT_URL.to_string()),
        MODEL
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::chat::ChatProvider;
    use crate::llm::chat::test_support::three_turns;
    use serde_json::json;

    #[test]
    fn uses_deepseek_endpoint_and_model() {
        let deepseek = client(&ProviderSettings::new(Some("ds-key".into()), None));
        assert_eq!(deepseek.model(), MODEL);

        let wire = deepseek.build_request("ctx", &three_turns()).unwrap();
        assert_eq!(wire.url, DEFAULT_URL);
        assert_eq!(wire.headers[reqwest::header::AUTHORIZATION], "Bearer ds-key");
        assert_eq!(wire.body["model"], "deepseek-chat");
        assert_eq!(
            wire.body["messages"],
            json!([
                {"role": "system", "content": "ctx"},
                {"role": "user", "content": "A"},
                {"role": "assistant", "content": "B"},
                {"role": "user", "content": "C"}
            ])
        );
    }

    #[test]
    fn parses_same_path_as_openai() {
        let deepseek = client(&ProviderSettings::new(Some("k".into()), None));
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Ship it."}}]}"#;
        assert_eq!(deepseek.parse_response(raw).unwrap(), "Ship it.");
    }
}
