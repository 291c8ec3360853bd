use axum::{
    body::Bytes,
    extract::{ Path, State },
    http::{ header::{ CONTENT_DISPOSITION, CONTENT_TYPE }, HeaderMap, StatusCode },
    middleware,
    response::{ IntoResponse, Response },
    routing::{ get, post },
    Json,
    Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{ Any, CorsLayer };

use super::auth::{ self, AuthConfig, LOGIN_API_PATH, LOGIN_PATH };
use crate::blueprint::{
    blueprint_filename,
    catalog,
    generate_ai_context,
    generate_blueprint_markdown,
    generate_export_json,
};
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::models::blueprint::{ ExportData, Project };
use crate::models::chat::{ ChatResponse, ErrorBody };
use crate::rate_limit::ANONYMOUS_KEY;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub auth: Arc<AuthConfig>,
}

#[derive(Serialize)]
struct ContextResponse {
    context: String,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route(LOGIN_PATH, get(auth::login_page))
        .route(LOGIN_API_PATH, post(auth::login_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/context", post(context_handler))
        .route("/api/export/json", post(export_json_handler))
        .route("/api/export/markdown", post(export_markdown_handler))
        .route("/api/templates", get(templates_handler))
        .route("/api/templates/{id}", get(template_handler))
        .route("/api/quick-actions", get(quick_actions_handler))
        .route("/api/models", get(models_handler))
        .layer(middleware::from_fn(auth::require_auth))
        .layer(cors)
        .with_state(state)
}

/// Rate-limit key for a request. The forwarded-for header is taken as-is;
/// without it every caller shares one bucket.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(ANONYMOUS_KEY)
        .to_string()
}

async fn chat_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes
) -> Result<Json<ChatResponse>, GatewayError> {
    let key = client_key(&headers);
    state.gateway.handle(&body, &key).await.map(Json)
}

async fn context_handler(Json(project): Json<Project>) -> Json<ContextResponse> {
    Json(ContextResponse {
        context: generate_ai_context(&project.title, &project.summary, &project.nodes),
    })
}

async fn export_json_handler(Json(project): Json<Project>) -> Json<ExportData> {
    Json(generate_export_json(&project, Utc::now()))
}

async fn export_markdown_handler(Json(project): Json<Project>) -> Response {
    let now = Utc::now();
    let markdown = generate_blueprint_markdown(&project, now);
    let filename = header_safe(&blueprint_filename(&project.title, now));
    (
        [
            (CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        markdown,
    ).into_response()
}

async fn templates_handler() -> impl IntoResponse {
    Json(catalog::project_templates())
}

async fn template_handler(Path(id): Path<String>) -> Response {
    match catalog::find_template(&id) {
        Some(template) => Json(template).into_response(),
        None =>
            (
                StatusCode::NOT_FOUND,
                Json(ErrorBody { error: format!("Template '{}' not found", id) }),
            ).into_response(),
    }
}

async fn quick_actions_handler() -> impl IntoResponse {
    Json(catalog::quick_actions())
}

async fn models_handler() -> impl IntoResponse {
    Json(catalog::model_options())
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

// header values must be visible ASCII; quotes would end the filename early
fn header_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' || c == ' ' { c } else { '_' })
        .collect()
}
