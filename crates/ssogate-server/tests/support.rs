#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use ssogate_core::{CookieAccessor, MemoryCookies, PluginOptions};
use ssogate_server::auth::{AuthOrchestrator, OrchestratorConfig, RequestCycle};
use ssogate_server::bootstrap;
use ssogate_server::config::{ServerConfig, SsoConfig};
use ssogate_server::settings::Settings;
use tower::ServiceExt;
use tracing_subscriber::EnvFilter;

pub const APP_URL: &str = "https://app.example.com";
pub const SSO_LOGIN_URL: &str = "https://sso.example.com/login?state=abc";

pub fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("ssogate_server=debug,ssogate_client=debug"))
            .with_test_writer()
            .try_init();
    });
}

pub fn jwt(subject: &str, exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": subject, "exp": exp }).to_string());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

pub fn fresh_token(subject: &str) -> String {
    jwt(subject, Utc::now().timestamp() + 3600)
}

pub fn stale_token(subject: &str) -> String {
    jwt(subject, Utc::now().timestamp() - 60)
}

pub fn sso_config(server: &ServerGuard) -> SsoConfig {
    SsoConfig {
        app_url: format!("{APP_URL}/"),
        api_base: server.url(),
        ..SsoConfig::default()
    }
}

pub fn orchestrator(server: &ServerGuard) -> AuthOrchestrator {
    init_tracing();
    let config = OrchestratorConfig::from_sso_config(&sso_config(server));
    AuthOrchestrator::new(config, reqwest::Client::new())
}

pub fn orchestrator_with(server: &ServerGuard, plugin: PluginOptions) -> AuthOrchestrator {
    init_tracing();
    let config = OrchestratorConfig::from_sso_config(&SsoConfig {
        plugin,
        ..sso_config(server)
    });
    AuthOrchestrator::new(config, reqwest::Client::new())
}

pub fn cycle(path: &str, query: Option<&str>, cookies: &Arc<MemoryCookies>) -> RequestCycle {
    let cookies: Arc<dyn CookieAccessor> = cookies.clone();
    RequestCycle::new(path, query.map(str::to_string), cookies)
}

pub fn app(server: &ServerGuard) -> axum::Router {
    init_tracing();
    let settings = Settings {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        config: ServerConfig {
            sso: sso_config(server),
            ..ServerConfig::default()
        },
    };
    let state = bootstrap::build_state(&settings, reqwest::Client::new());
    bootstrap::build_app(state)
}

pub async fn get(app: &axum::Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder.body(Body::empty()).expect("request");
    app.clone().oneshot(request).await.expect("response")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json")
    }
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub fn assert_status(response: &Response<Body>, status: StatusCode) {
    assert_eq!(response.status(), status, "unexpected status");
}

pub async fn mock_sso_redirect(
    server: &mut ServerGuard,
    redirect_back: &str,
    hits: usize,
) -> Mock {
    server
        .mock("GET", "/token")
        .match_query(Matcher::UrlEncoded(
            "redirect_url".into(),
            redirect_back.into(),
        ))
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "redirect_url": SSO_LOGIN_URL }).to_string())
        .expect(hits)
        .create_async()
        .await
}

pub async fn mock_exchange(server: &mut ServerGuard, code: &str, token: &str, hits: usize) -> Mock {
    server
        .mock("GET", "/token")
        .match_query(Matcher::UrlEncoded("sso_token".into(), code.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "token": token }).to_string())
        .expect(hits)
        .create_async()
        .await
}

/// Catches any call to the SSO token endpoint.
pub async fn mock_no_sso_calls(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/token")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(0)
        .create_async()
        .await
}

pub async fn mock_me(server: &mut ServerGuard, token: &str, hits: usize) -> Mock {
    server
        .mock("GET", "/me")
        .match_header("authorization", format!("Bearer {token}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": {
                    "id": 7,
                    "name": "Ada",
                    "permissions": { "data": { "projects": { "12": ["view"] } } }
                }
            })
            .to_string(),
        )
        .expect(hits)
        .create_async()
        .await
}

pub async fn mock_no_me_calls(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/me")
        .with_status(500)
        .expect(0)
        .create_async()
        .await
}
