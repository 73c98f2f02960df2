/// Cookie holding the raw bearer token for the application API.
pub const ACCESS_TOKEN_COOKIE: &str = "auth._token.local";

/// Query parameter the SSO provider appends when redirecting back.
pub const SSO_TOKEN_PARAM: &str = "sso_token";

/// Query parameter carrying the URL the SSO provider should return to.
pub const REDIRECT_URL_PARAM: &str = "redirect_url";

pub const TOKEN_PATH: &str = "token";
pub const TOKEN_REFRESH_PATH: &str = "token/refresh";
pub const DEFAULT_ME_PATH: &str = "me";
