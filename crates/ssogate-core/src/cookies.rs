use std::collections::HashMap;
use std::sync::Mutex;

/// Read/write access to the cookies of one request cycle.
///
/// Implementations use interior mutability: the orchestrator and the refresh
/// interceptor hold the same accessor for the lifetime of a request.
pub trait CookieAccessor: Send + Sync {
    /// Empty values are reported as absent.
    fn get(&self, name: &str) -> Option<String>;

    /// Setting an empty string invalidates the cookie.
    fn set(&self, name: &str, value: &str);

    fn clear(&self, name: &str) {
        self.set(name, "");
    }
}

#[derive(Debug, Default)]
pub struct MemoryCookies {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryCookies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cookie(name: &str, value: &str) -> Self {
        let cookies = Self::new();
        cookies.set(name, value);
        cookies
    }

    /// Raw stored value, including empty invalidation markers.
    pub fn raw(&self, name: &str) -> Option<String> {
        let values = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        values.get(name).cloned()
    }
}

impl CookieAccessor for MemoryCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.raw(name).filter(|value| !value.is_empty())
    }

    fn set(&self, name: &str, value: &str) {
        let mut values = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(name.to_string(), value.to_string());
    }
}
