use std::env;
use std::net::SocketAddr;

use tracing::warn;

use crate::config::ServerConfig;

mod env_config;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug)]
pub struct Settings {
    pub addr: SocketAddr,
    pub config: ServerConfig,
}

impl Settings {
    #[must_use]
    pub fn from_env() -> Self {
        let config_path =
            env::var("SSOGATE_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
        let mut config = env_config::load_config(&config_path);
        env_config::apply_sso_env_overrides(&mut config);
        env_config::apply_logging_env_overrides(&mut config);

        let default_addr = SocketAddr::from(([127, 0, 0, 1], 3000));
        let configured = env::var("SSOGATE_ADDR")
            .ok()
            .map(|value| ("SSOGATE_ADDR", value))
            .or_else(|| {
                config
                    .server
                    .addr
                    .clone()
                    .map(|value| ("server.addr", value))
            });
        let addr = match configured {
            Some((field, value)) => value.trim().parse::<SocketAddr>().unwrap_or_else(|_| {
                warn!(event = "config_invalid", field, value = %value, default = DEFAULT_ADDR);
                default_addr
            }),
            None => default_addr,
        };

        Self { addr, config }
    }
}

pub fn preflight(settings: &Settings) -> Result<(), Vec<String>> {
    let sso = &settings.config.sso;
    let mut missing = Vec::new();
    if let Some(err) = validate_url("APP_URL or sso.app_url", &sso.app_url) {
        missing.push(err);
    }
    if let Some(err) = validate_url("API_BASE or sso.api_base", &sso.api_base) {
        missing.push(err);
    }
    if sso.sso_base.is_some() {
        if let Some(err) = validate_url("SSO_BASE or sso.sso_base", sso.effective_sso_base()) {
            missing.push(err);
        }
    }
    if sso.plugin.endpoints.me.trim().trim_matches('/').is_empty() {
        missing.push("sso.plugin.endpoints.me must not be empty".to_string());
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

fn validate_url(field: &str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return Some(format!("{field} is required"));
    }
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => None,
        Ok(url) => Some(format!("{field} has unsupported scheme: {}", url.scheme())),
        Err(err) => Some(format!("{field} is not a valid url: {err}")),
    }
}
