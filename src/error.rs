use axum::{ http::StatusCode, response::{ IntoResponse, Response }, Json };
use std::time::Duration;
use thiserror::Error;

use crate::llm::ProviderError;
use crate::models::chat::ErrorBody;

/// Every way a chat turn can be refused. None of these stop the process.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("bad-request: {0}")]
    BadRequest(String),

    #[error("rate-limited: Too many requests. Try again in a minute.")]
    RateLimited,

    /// Provider answered with a failure status. `body` is kept for the logs.
    #[error("upstream-error: {provider} API error ({status})")]
    Upstream {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("upstream-error: {provider} returned an unexpected response body")]
    UnexpectedBody {
        provider: &'static str,
        raw: String,
    },

    #[error("upstream-error: {provider} request failed: {reason}")]
    Transport {
        provider: &'static str,
        reason: String,
    },

    #[error("upstream-timeout: {provider} did not answer within {after:?}")]
    UpstreamTimeout {
        provider: &'static str,
        after: Duration,
    },

    #[error("configuration-error: {0}")]
    Configuration(String),
}

impl GatewayError {
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::BadRequest(_) => "bad-request",
            GatewayError::RateLimited => "rate-limited",
            GatewayError::Upstream { .. }
            | GatewayError::UnexpectedBody { .. }
            | GatewayError::Transport { .. } => "upstream-error",
            GatewayError::UpstreamTimeout { .. } => "upstream-timeout",
            GatewayError::Configuration(_) => "configuration-error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Upstream { .. }
            | GatewayError::UnexpectedBody { .. }
            | GatewayError::Transport { .. }
            | GatewayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProviderError> for GatewayError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UnexpectedBody { provider, raw } => {
                GatewayError::UnexpectedBody { provider, raw }
            }
            other => GatewayError::Configuration(other.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_kind() {
        assert_eq!(GatewayError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(GatewayError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        let upstream = GatewayError::Upstream { provider: "OpenAI", status: 503, body: "down".into() };
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.kind(), "upstream-error");
        let timeout = GatewayError::UpstreamTimeout {
            provider: "DeepSeek",
            after: Duration::from_secs(5),
        };
        assert_eq!(timeout.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn missing_credential_becomes_configuration_error() {
        let err: GatewayError = ProviderError::MissingCredential("DEEPSEEK_API_KEY").into();
        assert_eq!(err.kind(), "configuration-error");
        assert_eq!(err.to_string(), "configuration-error: DEEPSEEK_API_KEY not configured");
    }

    #[test]
    fn upstream_message_does_not_leak_body() {
        let err = GatewayError::Upstream {
            provider: "Anthropic",
            status: 500,
            body: "{\"secret\":\"trace\"}".into(),
        };
        assert_eq!(err.to_string(), "upstream-error: Anthropic API error (500)");
    }
}
