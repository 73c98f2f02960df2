use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ssogate_client::ClientError;
use ssogate_core::ErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("sso redirect failed: {0}")]
    SsoRedirect(#[source] ClientError),
    #[error("sso token exchange failed: {0}")]
    TokenExchange(#[source] ClientError),
    #[error("user fetch failed: {0}")]
    UserFetch(#[source] ClientError),
    #[error("invalid client configuration: {0}")]
    Configuration(#[source] ClientError),
}

impl AuthError {
    pub fn client_error(&self) -> &ClientError {
        match self {
            Self::SsoRedirect(err)
            | Self::TokenExchange(err)
            | Self::UserFetch(err)
            | Self::Configuration(err) => err,
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::SsoRedirect(_) => "sso_redirect",
            Self::TokenExchange(_) => "token_exchange",
            Self::UserFetch(_) => "user_fetch",
            Self::Configuration(_) => "configuration",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ if self.client_error().is_unauthorized() => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!(
            event = "auth_failed",
            stage = self.stage(),
            status = status.as_u16(),
            upstream_status = ?self.client_error().status(),
            error = %self
        );
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
