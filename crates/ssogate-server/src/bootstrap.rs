use std::any::Any;
use std::net::SocketAddr;
use std::time::Instant;

use anyhow::Context;
use axum::extract::MatchedPath;
use axum::http::{HeaderName, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use ssogate_core::{ErrorBody, SSO_TOKEN_PARAM};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::app::{self, AppState};
use crate::auth::{AuthOrchestrator, OrchestratorConfig, SsoPlugin};
use crate::runtime;
use crate::settings;

pub fn log_startup(settings: &settings::Settings) {
    let sso = &settings.config.sso;
    if sso.sso_base.is_none() {
        tracing::info!(
            event = "sso_base_defaulted",
            api_base = %sso.api_base,
            "SSO endpoints share the API base"
        );
    }
    if !sso.cookie.secure && sso.app_url.starts_with("https://") {
        tracing::warn!(
            event = "cookie_not_secure",
            "Access token cookie is sent without the Secure flag"
        );
    }
    tracing::info!(
        event = "server_startup",
        addr = %settings.addr,
        app_url = %sso.app_url,
        api_base = %sso.api_base,
        sso_base = %sso.effective_sso_base(),
        me_endpoint = %sso.plugin.endpoints.me,
        debug = sso.plugin.debug,
        log_format = ?settings.config.logging.format,
        "Server configuration loaded"
    );
}

pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!("ssogate/", env!("CARGO_PKG_VERSION")))
        .build()
}

pub fn build_state(settings: &settings::Settings, http: reqwest::Client) -> AppState {
    let sso = &settings.config.sso;
    let orchestrator = AuthOrchestrator::new(OrchestratorConfig::from_sso_config(sso), http);
    AppState {
        started_at: Instant::now(),
        plugin: SsoPlugin::new(orchestrator, sso.cookie.clone()),
    }
}

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn build_app(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    app::build_router(state)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CatchPanicLayer::custom(panic_response))
}

fn request_span<B>(request: &Request<B>) -> Span {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or("unmatched", MatchedPath::as_str);
    let span = tracing::info_span!(
        "http_request",
        method = %request.method(),
        route = %route,
        sso_return = request
            .uri()
            .query()
            .is_some_and(|query| query.contains(SSO_TOKEN_PARAM)),
        request_id = tracing::field::Empty
    );
    if let Some(id) = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
    {
        span.record("request_id", id);
    }
    span
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<&str>()
        .map(|value| (*value).to_string())
        .or_else(|| err.downcast_ref::<String>().cloned())
        .unwrap_or_default();
    tracing::error!(event = "panic_recovered", detail = %detail, "handler panicked");
    let body = ErrorBody {
        message: "internal server error".to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

pub async fn serve(settings: &settings::Settings, app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = settings.addr;
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(runtime::shutdown_signal())
        .await
        .context("server failed")
}
