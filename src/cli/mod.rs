use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub server_addr: String,

    /// Shared password for the login gate. Login is refused while unset.
    #[arg(long, env = "APP_PASSWORD")]
    pub app_password: Option<String>,

    /// Mark the auth cookie `Secure` (enable behind HTTPS).
    #[arg(long, env = "SECURE_COOKIES", default_value = "false")]
    pub secure_cookies: bool,

    // --- Upstream Provider Args ---
    /// API key for the Anthropic Messages API (model `claude`)
    #[arg(long, env = "ANTHROPIC_API_KEY")]
    pub anthropic_api_key: Option<String>,

    /// Override for the Anthropic endpoint (e.g., a local mock)
    #[arg(long, env = "ANTHROPIC_BASE_URL")]
    pub anthropic_base_url: Option<String>,

    /// API key for the OpenAI chat completions API (model `codex`)
    #[arg(long, env = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,

    /// Override for the OpenAI endpoint
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// API key for the DeepSeek chat completions API (model `deepseek`)
    #[arg(long, env = "DEEPSEEK_API_KEY")]
    pub deepseek_api_key: Option<String>,

    /// Override for the DeepSeek endpoint
    #[arg(long, env = "DEEPSEEK_BASE_URL")]
    pub deepseek_base_url: Option<String>,

    /// Seconds to wait for an upstream provider before giving up on the call.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "60")]
    pub upstream_timeout_secs: u64,

    // --- TLS Args ---
    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,
}
