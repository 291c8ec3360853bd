pub mod chat;

use crate::cli::Args;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Provider tags a client may put in `model`. Tags are matched exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatModel {
    Claude,
    Codex,
    DeepSeek,
}

impl ChatModel {
    pub const DEFAULT: ChatModel = ChatModel::Claude;

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatModel::Claude => "claude",
            ChatModel::Codex => "codex",
            ChatModel::DeepSeek => "deepseek",
        }
    }

    /// Unknown or absent tags fall back to the default provider. A case
    /// variant such as `CODEX` counts as unknown.
    pub fn resolve(requested: Option<&str>) -> ChatModel {
        requested.and_then(|m| m.parse().ok()).unwrap_or(Self::DEFAULT)
    }
}

impl fmt::Display for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
#[error("Invalid chat model: '{0}'")]
pub struct ParseChatModelError(String);

impl FromStr for ChatModel {
    type Err = ParseChatModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude" => Ok(ChatModel::Claude),
            "codex" => Ok(ChatModel::Codex),
            "deepseek" => Ok(ChatModel::DeepSeek),
            _ => Err(ParseChatModelError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} not configured")]
    MissingCredential(&'static str),
    #[error("Invalid header value for {provider}: {reason}")]
    InvalidHeader {
        provider: &'static str,
        reason: String,
    },
    #[error("Unexpected {provider} response body: {raw}")]
    UnexpectedBody {
        provider: &'static str,
        raw: String,
    },
    #[error("Failed to encode {provider} request: {source}")]
    Serialize {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl ProviderSettings {
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.filter(|u| !u.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub anthropic: ProviderSettings,
    pub openai: ProviderSettings,
    pub deepseek: ProviderSettings,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            anthropic: ProviderSettings::default(),
            openai: ProviderSettings::default(),
            deepseek: ProviderSettings::default(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl LlmConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            anthropic: ProviderSettings::new(
                args.anthropic_api_key.clone(),
                args.anthropic_base_url.clone()
            ),
            openai: ProviderSettings::new(
                args.openai_api_key.clone(),
                args.openai_base_url.clone()
            ),
            deepseek: ProviderSettings::new(
                args.deepseek_api_key.clone(),
                args.deepseek_base_url.clone()
            ),
            timeout: Duration::from_secs(args.upstream_timeout_secs),
        }
    }
}
