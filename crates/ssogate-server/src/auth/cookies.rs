use std::sync::{Mutex, MutexGuard};

use axum_extra::extract::cookie::{Cookie, CookieJar};
use ssogate_core::CookieAccessor;

use crate::config::CookieConfig;

/// Cookie accessor over the jar of a single request. Writes are collected in
/// the jar and emitted as `Set-Cookie` headers with the response.
pub struct RequestCookies {
    jar: Mutex<CookieJar>,
    options: CookieConfig,
}

impl RequestCookies {
    pub fn new(jar: CookieJar, options: CookieConfig) -> Self {
        Self {
            jar: Mutex::new(jar),
            options,
        }
    }

    pub fn jar(&self) -> CookieJar {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, CookieJar> {
        self.jar
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CookieAccessor for RequestCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.lock()
            .get(name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    fn set(&self, name: &str, value: &str) {
        let cookie = Cookie::build((name.to_string(), value.to_string()))
            .path("/")
            .secure(self.options.secure)
            .http_only(self.options.http_only)
            .build();
        let mut jar = self.lock();
        *jar = jar.clone().add(cookie);
    }
}
