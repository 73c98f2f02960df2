use serde::{Deserialize, Serialize};

use crate::session::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub data: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsoRedirectResponse {
    pub redirect_url: String,
}

/// Returned by both the SSO exchange and the refresh endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    #[serde(alias = "access_token")]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
