pub mod blueprint;
pub mod cli;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod models;
pub mod rate_limit;
pub mod server;

#[cfg(test)]
pub(crate) mod test_util;

use cli::Args;
use log::info;
use server::Server;
use std::error::Error;

fn is_set(value: &Option<String>) -> &'static str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => "set",
        _ => "unset",
    }
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("App Password: {}", is_set(&args.app_password));
    info!("Secure Cookies: {}", args.secure_cookies);
    info!("Anthropic API Key: {}", is_set(&args.anthropic_api_key));
    info!("OpenAI API Key: {}", is_set(&args.openai_api_key));
    info!("DeepSeek API Key: {}", is_set(&args.deepseek_api_key));
    info!("Upstream Timeout: {}s", args.upstream_timeout_secs);
    info!(
        "Rate Limit: {} requests per {}s per client",
        rate_limit::RATE_LIMIT,
        rate_limit::RATE_WINDOW.as_secs()
    );
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, args);
    server.run().await?;

    Ok(())
}
