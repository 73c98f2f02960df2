use reqwest::Method;
use ssogate_core::{
    AccessToken, AccessTokenResponse, SsoRedirectResponse, SsoToken, REDIRECT_URL_PARAM,
    SSO_TOKEN_PARAM, TOKEN_PATH,
};
use tracing::debug;

use crate::endpoint::join_url;
use crate::error::ClientError;
use crate::http::{non_empty_token, read_json, send_once};

/// Unauthenticated client for the SSO token endpoint.
pub struct SsoClient {
    http: reqwest::Client,
    base: String,
}

impl SsoClient {
    pub fn new(http: reqwest::Client, sso_base: &str) -> Result<Self, ClientError> {
        url::Url::parse(sso_base)?;
        Ok(Self {
            http,
            base: sso_base.trim_end_matches('/').to_string(),
        })
    }

    fn token_url(&self) -> Result<url::Url, ClientError> {
        join_url(&self.base, TOKEN_PATH)
    }

    pub async fn request_sso_redirect(
        &self,
        redirect_url: &str,
    ) -> Result<SsoRedirectResponse, ClientError> {
        let mut url = self.token_url()?;
        url.query_pairs_mut()
            .append_pair(REDIRECT_URL_PARAM, redirect_url);
        let response = send_once(&self.http, Method::GET, url, None, None).await?;
        let body: SsoRedirectResponse = read_json(response).await?;
        if body.redirect_url.trim().is_empty() {
            return Err(ClientError::MissingField("redirect_url"));
        }
        debug!(event = "sso_redirect_issued", redirect_url = %redirect_url);
        Ok(body)
    }

    pub async fn exchange_sso_token(&self, sso_token: &SsoToken) -> Result<AccessToken, ClientError> {
        let mut url = self.token_url()?;
        url.query_pairs_mut()
            .append_pair(SSO_TOKEN_PARAM, sso_token.as_str());
        let response = send_once(&self.http, Method::GET, url, None, None).await?;
        let body: AccessTokenResponse = read_json(response).await?;
        debug!(event = "sso_token_exchanged");
        non_empty_token(body.token)
    }
}
