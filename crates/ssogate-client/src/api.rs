use std::sync::{Arc, OnceLock};

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use ssogate_core::{
    AccessToken, AccessTokenResponse, CookieAccessor, Endpoints, MeResponse, User,
    ACCESS_TOKEN_COOKIE,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::endpoint::{join_url, Endpoint};
use crate::error::ClientError;
use crate::http::{non_empty_token, read_json, send_once};

/// Client for the application API. Carries the bearer token for one request
/// cycle and, once installed, the refresh interceptor.
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    endpoints: Endpoints,
    bearer: RwLock<Option<AccessToken>>,
    interceptor: OnceLock<RefreshInterceptor>,
}

struct RefreshInterceptor {
    cookies: Arc<dyn CookieAccessor>,
}

impl RefreshInterceptor {
    fn persist(&self, token: &AccessToken) {
        self.cookies.set(ACCESS_TOKEN_COOKIE, token.as_str());
    }
}

impl ApiClient {
    pub fn new(
        http: reqwest::Client,
        api_base: &str,
        endpoints: Endpoints,
    ) -> Result<Self, ClientError> {
        url::Url::parse(api_base)?;
        Ok(Self {
            http,
            base: api_base.trim_end_matches('/').to_string(),
            endpoints,
            bearer: RwLock::new(None),
            interceptor: OnceLock::new(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub async fn set_token(&self, token: AccessToken) {
        *self.bearer.write().await = Some(token);
    }

    pub async fn token(&self) -> Option<AccessToken> {
        self.bearer.read().await.clone()
    }

    /// Returns `false` when an interceptor was already installed for this client.
    pub fn install_refresh_interceptor(&self, cookies: Arc<dyn CookieAccessor>) -> bool {
        let installed = self
            .interceptor
            .set(RefreshInterceptor { cookies })
            .is_ok();
        if installed {
            debug!(event = "refresh_interceptor_installed", base = %self.base);
        }
        installed
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> Result<url::Url, ClientError> {
        join_url(&self.base, endpoint.path(&self.endpoints))
    }

    pub async fn send(
        &self,
        method: Method,
        endpoint: &Endpoint,
        payload: Option<serde_json::Value>,
    ) -> Result<Response, ClientError> {
        let url = self.url_for(endpoint)?;
        let bearer = self.token().await;
        let response = send_once(
            &self.http,
            method.clone(),
            url.clone(),
            bearer.as_ref(),
            payload.as_ref(),
        )
        .await?;
        if response.status() != StatusCode::UNAUTHORIZED || !endpoint.allows_refresh(&self.endpoints) {
            return Ok(response);
        }
        let Some(interceptor) = self.interceptor.get() else {
            return Ok(response);
        };

        info!(
            event = "token_refresh_started",
            method = %method,
            url = %url,
            "request unauthorized; refreshing access token"
        );
        let token = match self.refresh_token().await {
            Ok(token) => token,
            Err(err) => {
                warn!(event = "token_refresh_failed", url = %url, error = %err);
                return Err(err);
            }
        };
        interceptor.persist(&token);
        self.set_token(token.clone()).await;

        send_once(&self.http, method, url, Some(&token), payload.as_ref()).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, ClientError> {
        let response = self.send(Method::GET, endpoint, None).await?;
        read_json(response).await
    }

    pub async fn fetch_me(&self) -> Result<User, ClientError> {
        let me: MeResponse = self.get_json(&Endpoint::Me).await?;
        Ok(me.data)
    }

    /// Calls the refresh endpoint directly; the interceptor never wraps it.
    pub async fn refresh_token(&self) -> Result<AccessToken, ClientError> {
        let url = self.url_for(&Endpoint::TokenRefresh)?;
        let bearer = self.token().await;
        let response = send_once(&self.http, Method::GET, url, bearer.as_ref(), None).await?;
        let body: AccessTokenResponse = read_json(response).await?;
        non_empty_token(body.token)
    }
}
