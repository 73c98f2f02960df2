use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::context::SsoContext;
use crate::auth::cookies::RequestCookies;
use crate::auth::orchestrator::{AuthOrchestrator, AuthOutcome, RequestCycle};
use crate::config::CookieConfig;

#[derive(Clone)]
pub struct SsoPlugin {
    orchestrator: Arc<AuthOrchestrator>,
    cookie: CookieConfig,
}

impl SsoPlugin {
    pub fn new(orchestrator: AuthOrchestrator, cookie: CookieConfig) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            cookie,
        }
    }

    pub fn orchestrator(&self) -> &AuthOrchestrator {
        &self.orchestrator
    }
}

pub async fn sso_middleware(
    State(plugin): State<SsoPlugin>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let cookies = Arc::new(RequestCookies::new(jar, plugin.cookie.clone()));
    let cycle = RequestCycle::from_uri(request.uri(), cookies.clone());

    let response = match plugin.orchestrator.authenticate(&cycle).await {
        Ok(AuthOutcome::RedirectToSso { location }) => found(location),
        Ok(AuthOutcome::Authenticated(authenticated)) => match authenticated.redirect_to {
            Some(target) => found(target),
            None => {
                let logged_in = authenticated.session.logged_in();
                let extensions = request.extensions_mut();
                extensions.insert(SsoContext { logged_in });
                extensions.insert(authenticated.session.into_state());
                extensions.insert(authenticated.api);
                next.run(request).await
            }
        },
        Err(err) => err.into_response(),
    };

    (cookies.jar(), response).into_response()
}

fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
