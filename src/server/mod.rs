pub mod api;
pub mod auth;

use crate::cli::Args;
use crate::gateway::Gateway;
use crate::llm::LlmConfig;
use crate::rate_limit::RATE_WINDOW;
use api::AppState;
use auth::AuthConfig;
use log::{ debug, info, warn };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

pub struct Server {
    addr: String,
    args: Args,
}

impl Server {
    pub fn new(addr: String, args: Args) -> Self {
        Self { addr, args }
    }

    fn state(&self) -> Result<AppState, Box<dyn Error + Send + Sync>> {
        let password = self.args.app_password.clone().filter(|p| !p.is_empty());
        if password.is_none() {
            warn!("APP_PASSWORD is not set. Every login attempt will be refused.");
        }
        let gateway = Gateway::new(LlmConfig::from_args(&self.args))?;

        Ok(AppState {
            gateway: Arc::new(gateway),
            auth: Arc::new(AuthConfig {
                password,
                secure_cookies: self.args.secure_cookies,
            }),
        })
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr.parse::<SocketAddr>()?;
        let state = self.state()?;

        let gateway = state.gateway.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(RATE_WINDOW);
            loop {
                ticker.tick().await;
                let dropped = gateway.limiter().sweep_expired(Instant::now());
                if dropped > 0 {
                    debug!("Dropped {} expired rate-limit records", dropped);
                }
            }
        });

        let app = api::router(state);

        if self.args.enable_tls {
            let (cert_path, key_path) = match (&self.args.tls_cert_path, &self.args.tls_key_path) {
                (Some(cert), Some(key)) => (cert, key),
                _ => {
                    return Err(
                        "Both --tls-cert-path and --tls-key-path must be provided to enable TLS.".into()
                    );
                }
            };
            info!(
                "TLS enabled. Loading certificate from '{}' and key from '{}'",
                cert_path,
                key_path
            );
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                cert_path,
                key_path
            ).await?;

            info!("HTTPS server listening on: https://{}", addr);
            axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
        } else {
            let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e)
            })?;
            info!("HTTP server listening on: http://{}", addr);
            axum::serve(listener, app.into_make_service()).await?;
        }

        Ok(())
    }
}
