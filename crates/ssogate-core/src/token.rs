//! Bearer token inspection.
//!
//! Access tokens are compact JWTs issued by the API. Only the payload is read
//! here; signatures are the issuing server's concern.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not a compact JWT")]
    Malformed,
    #[error("token payload is not base64url: {0}")]
    Base64(String),
    #[error("token payload is not JSON: {0}")]
    Json(String),
    #[error("token has no numeric exp claim")]
    MissingExpiry,
    #[error("token exp claim out of range: {0}")]
    ExpiryOutOfRange(i64),
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn expires_at(&self) -> Result<DateTime<Utc>, TokenError> {
        token_expiry(&self.0)
    }

    pub fn has_expired_at(&self, now: DateTime<Utc>) -> bool {
        token_has_expired_at(&self.0, now)
    }

    pub fn has_expired(&self) -> bool {
        token_has_expired(&self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Short-lived code handed back by the SSO provider, exchanged once.
#[derive(Clone, PartialEq, Eq)]
pub struct SsoToken(String);

impl SsoToken {
    /// Returns `None` for blank codes so an empty `?sso_token=` is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SsoToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SsoToken(***)")
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub exp: Option<Number>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };
    if payload.is_empty() {
        return Err(TokenError::Malformed);
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| TokenError::Base64(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| TokenError::Json(err.to_string()))
}

pub fn token_expiry(token: &str) -> Result<DateTime<Utc>, TokenError> {
    let claims = decode_claims(token)?;
    let exp = claims.exp.ok_or(TokenError::MissingExpiry)?;
    let seconds = match exp.as_i64() {
        Some(seconds) => seconds,
        None => exp
            .as_f64()
            .filter(|value| value.is_finite())
            .map(|value| value.floor() as i64)
            .ok_or(TokenError::MissingExpiry)?,
    };
    DateTime::<Utc>::from_timestamp(seconds, 0).ok_or(TokenError::ExpiryOutOfRange(seconds))
}

/// Undecodable tokens count as expired so the caller re-authenticates.
pub fn token_has_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match token_expiry(token) {
        Ok(expires_at) => now >= expires_at,
        Err(err) => {
            tracing::debug!(event = "token_undecodable", error = %err);
            true
        }
    }
}

pub fn token_has_expired(token: &str) -> bool {
    token_has_expired_at(token, Utc::now())
}
