use std::sync::Arc;

use axum::extract::{Path, RawQuery};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Extension, Json, Router};
use serde::Serialize;
use serde_json::Value;
use ssogate_client::{ApiClient, ClientError, Endpoint};
use ssogate_core::{ErrorBody, SessionState, User};

use crate::app::AppState;
use crate::auth::SsoContext;

#[derive(Serialize)]
struct SessionResponse {
    logged_in: bool,
    loading: bool,
    user: User,
    permissions: Option<Value>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(session))
        .route("/session", get(session))
        .route("/api/*path", get(proxy))
}

async fn session(
    context: SsoContext,
    Extension(state): Extension<SessionState>,
) -> Json<SessionResponse> {
    let permissions = state
        .user
        .permissions
        .data
        .as_ref()
        .and_then(|data| data.projects.clone());
    Json(SessionResponse {
        logged_in: context.logged_in,
        loading: state.loading,
        user: state.user,
        permissions,
    })
}

/// Forwards a GET, query included, to the application API with the request's
/// bearer token.
async fn proxy(
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    Extension(api): Extension<Arc<ApiClient>>,
) -> Result<Json<Value>, UpstreamError> {
    let target = match query.filter(|query| !query.is_empty()) {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };
    let value = api.get_json::<Value>(&Endpoint::Path(target)).await?;
    Ok(Json(value))
}

struct UpstreamError(ClientError);

impl From<ClientError> for UpstreamError {
    fn from(err: ClientError) -> Self {
        Self(err)
    }
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ClientError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            err => err
                .status()
                .and_then(|status| StatusCode::from_u16(status.as_u16()).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
        };
        tracing::warn!(event = "api_proxy_failed", status = status.as_u16(), error = %self.0);
        let body = ErrorBody {
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
