use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use ssogate_core::AccessToken;
use tracing::debug;

use crate::error::ClientError;

pub(crate) async fn send_once(
    http: &reqwest::Client,
    method: Method,
    url: url::Url,
    bearer: Option<&AccessToken>,
    payload: Option<&serde_json::Value>,
) -> Result<Response, ClientError> {
    let method_label = method.clone();
    let url_label = url.to_string();
    let mut builder = http.request(method, url);
    if let Some(token) = bearer {
        let value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))?;
        builder = builder.header(AUTHORIZATION, value);
    }
    if let Some(payload) = payload {
        builder = builder.json(payload);
    }
    debug!(method = %method_label, url = %url_label, "http request");
    let start = std::time::Instant::now();
    let response = builder.send().await?;
    debug!(
        method = %method_label,
        url = %url_label,
        status = %response.status(),
        elapsed_ms = start.elapsed().as_millis(),
        "http response"
    );
    Ok(response)
}

pub(crate) async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status { status, url, body })
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

pub(crate) fn non_empty_token(token: String) -> Result<AccessToken, ClientError> {
    if token.trim().is_empty() {
        return Err(ClientError::MissingField("token"));
    }
    Ok(AccessToken::new(token))
}
