use ssogate_core::{Endpoints, TOKEN_PATH, TOKEN_REFRESH_PATH};

use crate::error::ClientError;

/// Application API endpoints, identified by role rather than by URL shape.
///
/// `Path` is relative to the API base and may carry a `?query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Me,
    TokenRefresh,
    Path(String),
}

impl Endpoint {
    pub fn path<'a>(&'a self, endpoints: &'a Endpoints) -> &'a str {
        match self {
            Self::Me => endpoints.me.as_str(),
            Self::TokenRefresh => TOKEN_REFRESH_PATH,
            Self::Path(path) => path.as_str(),
        }
    }

    /// Token endpoints are never intercepted: a 401 from the exchange or the
    /// refresh call cannot trigger another refresh.
    pub fn allows_refresh(&self, endpoints: &Endpoints) -> bool {
        match self {
            Self::TokenRefresh => false,
            _ => !is_token_route(self.path(endpoints)),
        }
    }
}

fn is_token_route(path: &str) -> bool {
    let (route, _) = split_query(path);
    let route = route.trim_matches('/');
    route == TOKEN_PATH || route == TOKEN_REFRESH_PATH
}

fn split_query(path: &str) -> (&str, Option<&str>) {
    match path.split_once('?') {
        Some((route, query)) => (route, Some(query)),
        None => (path, None),
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | ".." | "%2e" | "%2e%2e" | ".%2e" | "%2e."
    )
}

pub(crate) fn join_url(base: &str, path: &str) -> Result<url::Url, ClientError> {
    let (route, query) = split_query(path);
    if route.split(['/', '\\']).any(is_dot_segment) {
        return Err(ClientError::InvalidPath(route.to_string()));
    }
    let route = route.trim_start_matches('/');
    let mut url = if route.is_empty() {
        url::Url::parse(base)?
    } else {
        url::Url::parse(&format!("{}/{}", base.trim_end_matches('/'), route))?
    };
    if let Some(query) = query.filter(|query| !query.is_empty()) {
        url.set_query(Some(query));
    }
    Ok(url)
}
