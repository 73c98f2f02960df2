use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use serde::Serialize;

/// Runtime object exposed to handlers behind the SSO middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SsoContext {
    pub logged_in: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for SsoContext
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<SsoContext>().copied().ok_or_else(|| {
            tracing::error!(event = "sso_context_missing", path = %parts.uri.path());
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}
