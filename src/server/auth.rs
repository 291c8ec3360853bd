use axum::{
    body::Bytes,
    extract::{ Request, State },
    http::{ header::{ COOKIE, SET_COOKIE }, HeaderMap, StatusCode },
    middleware::Next,
    response::{ Html, IntoResponse, Redirect, Response },
    Json,
};
use log::{ debug, info, warn };
use serde::{ Deserialize, Serialize };

use super::api::AppState;
use crate::models::chat::ErrorBody;

pub const AUTH_COOKIE: &str = "auth-token";
pub const AUTH_COOKIE_VALUE: &str = "authenticated";
pub const COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;
pub const LOGIN_PATH: &str = "/login";
pub const LOGIN_API_PATH: &str = "/api/auth/login";

/// Reachable without the cookie. Matched by prefix.
const PUBLIC_PATHS: [&str; 3] = [LOGIN_PATH, LOGIN_API_PATH, "/health"];

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub password: Option<String>,
    pub secure_cookies: bool,
}

#[derive(Deserialize)]
struct LoginRequest {
    #[serde(default)]
    password: Option<String>,
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
}

pub fn auth_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        AUTH_COOKIE,
        AUTH_COOKIE_VALUE,
        COOKIE_MAX_AGE_SECS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn has_auth_cookie(headers: &HeaderMap) -> bool {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == AUTH_COOKIE && value == AUTH_COOKIE_VALUE)
}

fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|p| path.starts_with(p))
}

/// Routing filter: anything outside the public paths needs the auth cookie.
pub async fn require_auth(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if is_public_path(path) || has_auth_cookie(request.headers()) {
        return next.run(request).await;
    }
    debug!("No auth cookie for {}, redirecting to {}", path, LOGIN_PATH);
    Redirect::temporary(LOGIN_PATH).into_response()
}

pub async fn login_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(expected) = state.auth.password.as_deref() else {
        warn!("Login attempted but APP_PASSWORD is not configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Password is not configured");
    };

    let req: LoginRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            debug!("Unreadable login body: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "An error occurred");
        }
    };

    if req.password.as_deref() != Some(expected) {
        warn!("Login rejected: wrong password");
        return error_response(StatusCode::UNAUTHORIZED, "Wrong password");
    }

    info!("Login accepted");
    (
        [(SET_COOKIE, auth_cookie(state.auth.secure_cookies))],
        Json(LoginResponse { success: true }),
    ).into_response()
}

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { error: message.to_string() })).into_response()
}

const LOGIN_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>BlueprintOS - Login</title></head>
<body>
<form id="login">
  <input type="password" name="password" placeholder="Password" autofocus>
  <button type="submit">Log in</button>
  <p id="error"></p>
</form>
<script>
document.getElementById('login').addEventListener('submit', async (e) => {
  e.preventDefault();
  const password = e.target.password.value;
  const res = await fetch('/api/auth/login', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ password })
  });
  if (res.ok) { window.location.href = '/'; return; }
  const data = await res.json().catch(() => ({}));
  document.getElementById('error').textContent = data.error || 'Login failed';
});
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_carries_expected_attributes() {
        let cookie = auth_cookie(false);
        assert_eq!(
            cookie,
            "auth-token=authenticated; Path=/; Max-Age=604800; HttpOnly; SameSite=Lax"
        );
        assert!(auth_cookie(true).ends_with("; Secure"));
    }

    #[test]
    fn finds_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; auth-token=authenticated"));
        assert!(has_auth_cookie(&headers));
    }

    #[test]
    fn rejects_wrong_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("auth-token=guest"));
        assert!(!has_auth_cookie(&headers));
        assert!(!has_auth_cookie(&HeaderMap::new()));
    }

    #[test]
    fn login_paths_are_public() {
        assert!(is_public_path("/login"));
        assert!(is_public_path("/api/auth/login"));
        assert!(!is_public_path("/api/chat"));
        assert!(!is_public_path("/"));
    }
}
