//! Per-request authentication sequence.
//!
//! One [`AuthOrchestrator`] is shared by the whole server. Each request builds
//! its own [`RequestCycle`] and gets fresh API/SSO clients, so no token or
//! cookie state is shared between concurrent requests.

use std::sync::Arc;

use axum::http::Uri;
use chrono::{DateTime, Utc};
use ssogate_client::{ApiClient, SsoClient};
use ssogate_core::{
    token_has_expired_at, AccessToken, CookieAccessor, PluginOptions, SessionStore, SsoToken,
    ACCESS_TOKEN_COOKIE, SSO_TOKEN_PARAM,
};
use tracing::{debug, info, warn};

use crate::auth::errors::AuthError;
use crate::config::SsoConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    NoToken,
    TokenExpired,
    TokenValid,
    AwaitingSsoRedirect,
    ExchangingToken,
    Authenticated,
}

/// Initial state for a stored cookie value.
pub fn classify_token(stored: Option<&str>, now: DateTime<Utc>) -> AuthState {
    match stored {
        None => AuthState::NoToken,
        Some(token) if token_has_expired_at(token, now) => AuthState::TokenExpired,
        Some(_) => AuthState::TokenValid,
    }
}

pub struct RequestCycle {
    pub path: String,
    pub query: Option<String>,
    pub cookies: Arc<dyn CookieAccessor>,
}

impl RequestCycle {
    pub fn new(
        path: impl Into<String>,
        query: Option<String>,
        cookies: Arc<dyn CookieAccessor>,
    ) -> Self {
        Self {
            path: path.into(),
            query: query.filter(|value| !value.is_empty()),
            cookies,
        }
    }

    pub fn from_uri(uri: &Uri, cookies: Arc<dyn CookieAccessor>) -> Self {
        Self::new(uri.path(), uri.query().map(str::to_string), cookies)
    }

    pub fn sso_token(&self) -> Option<SsoToken> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == SSO_TOKEN_PARAM)
            .and_then(|(_, value)| SsoToken::parse(&value))
    }

    pub fn full_path(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub app_url: String,
    pub api_base: String,
    pub sso_base: String,
    pub plugin: PluginOptions,
}

impl OrchestratorConfig {
    pub fn from_sso_config(config: &SsoConfig) -> Self {
        Self {
            app_url: config.app_url.trim().to_string(),
            api_base: config.api_base.trim().to_string(),
            sso_base: config.effective_sso_base().trim().to_string(),
            plugin: config.plugin.clone(),
        }
    }
}

pub enum AuthOutcome {
    RedirectToSso { location: String },
    Authenticated(AuthenticatedSession),
}

pub struct AuthenticatedSession {
    pub session: SessionStore,
    pub api: Arc<ApiClient>,
    /// Set when the request carried an exchange code; points at the
    /// requested path without its query.
    pub redirect_to: Option<String>,
}

pub struct AuthOrchestrator {
    config: OrchestratorConfig,
    http: reqwest::Client,
}

impl AuthOrchestrator {
    pub fn new(config: OrchestratorConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn redirect_back_url(&self, cycle: &RequestCycle) -> String {
        format!(
            "{}{}",
            self.config.app_url.trim_end_matches('/'),
            cycle.full_path()
        )
    }

    pub async fn authenticate(&self, cycle: &RequestCycle) -> Result<AuthOutcome, AuthError> {
        self.authenticate_at(cycle, Utc::now()).await
    }

    pub async fn authenticate_at(
        &self,
        cycle: &RequestCycle,
        now: DateTime<Utc>,
    ) -> Result<AuthOutcome, AuthError> {
        let api = ApiClient::new(
            self.http.clone(),
            &self.config.api_base,
            self.config.plugin.endpoints.clone(),
        )
        .map_err(AuthError::Configuration)?;

        let stored = cycle.cookies.get(ACCESS_TOKEN_COOKIE);
        let state = classify_token(stored.as_deref(), now);
        self.trace(state, cycle);
        let sso_token = cycle.sso_token();

        let token = match (state, stored) {
            (AuthState::TokenValid, Some(stored)) => AccessToken::new(stored),
            (state, _) => {
                if state == AuthState::TokenExpired {
                    cycle.cookies.clear(ACCESS_TOKEN_COOKIE);
                    info!(event = "token_cookie_cleared", path = %cycle.path);
                }
                let sso = SsoClient::new(self.http.clone(), &self.config.sso_base)
                    .map_err(AuthError::Configuration)?;
                let Some(code) = sso_token.as_ref() else {
                    self.trace(AuthState::AwaitingSsoRedirect, cycle);
                    let redirect_back = self.redirect_back_url(cycle);
                    let response = sso
                        .request_sso_redirect(&redirect_back)
                        .await
                        .map_err(AuthError::SsoRedirect)?;
                    info!(
                        event = "sso_redirect",
                        path = %cycle.path,
                        redirect_back = %redirect_back
                    );
                    return Ok(AuthOutcome::RedirectToSso {
                        location: response.redirect_url,
                    });
                };
                self.trace(AuthState::ExchangingToken, cycle);
                let token = sso
                    .exchange_sso_token(code)
                    .await
                    .map_err(AuthError::TokenExchange)?;
                cycle.cookies.set(ACCESS_TOKEN_COOKIE, token.as_str());
                info!(event = "sso_token_exchanged", path = %cycle.path);
                token
            }
        };

        api.set_token(token).await;
        api.install_refresh_interceptor(Arc::clone(&cycle.cookies));

        let mut session = SessionStore::new();
        session.begin_loading();
        let user = match api.fetch_me().await {
            Ok(user) => user,
            Err(err) => {
                if err.is_unauthorized() {
                    cycle.cookies.clear(ACCESS_TOKEN_COOKIE);
                    warn!(event = "user_fetch_unauthorized", path = %cycle.path);
                }
                return Err(AuthError::UserFetch(err));
            }
        };
        session.set_user(user);
        self.trace(AuthState::Authenticated, cycle);

        Ok(AuthOutcome::Authenticated(AuthenticatedSession {
            session,
            api: Arc::new(api),
            redirect_to: sso_token.map(|_| cycle.path.clone()),
        }))
    }

    fn trace(&self, state: AuthState, cycle: &RequestCycle) {
        debug!(event = "auth_state", state = ?state, path = %cycle.path);
    }
}
