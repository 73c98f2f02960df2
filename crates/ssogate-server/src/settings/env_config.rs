use std::env;
use std::fs;
use std::io;
use std::path::Path;

use tracing::warn;

use crate::config::{LogFormat, ServerConfig};

/// Reads the YAML config file. A missing file is normal; an unreadable or
/// malformed one is logged and replaced by defaults.
pub(super) fn load_config(path: &str) -> ServerConfig {
    read_config(Path::new(path)).unwrap_or_else(|reason| {
        warn!(event = "config_ignored", path, reason = %reason);
        ServerConfig::default()
    })
}

fn read_config(path: &Path) -> Result<ServerConfig, String> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(ServerConfig::default()),
        Err(err) => return Err(format!("unreadable: {err}")),
    };
    if contents.trim().is_empty() {
        return Ok(ServerConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|err| format!("malformed: {err}"))
}

pub(super) fn apply_sso_env_overrides(config: &mut ServerConfig) {
    if let Some(value) = non_empty_env("APP_URL") {
        config.sso.app_url = value;
    }
    if let Some(value) = non_empty_env("API_BASE") {
        config.sso.api_base = value;
    }
    if let Some(value) = non_empty_env("SSO_BASE") {
        config.sso.sso_base = Some(value);
    }
    if let Some(value) = non_empty_env("SSOGATE_ENDPOINT_ME") {
        config.sso.plugin.endpoints.me = value;
    }
    if let Ok(value) = env::var("SSOGATE_DEBUG") {
        if let Some(enabled) = parse_bool(&value) {
            config.sso.plugin.debug = enabled;
        } else {
            warn!(event = "config_invalid", field = "SSOGATE_DEBUG", value = %value);
        }
    }
    if let Ok(value) = env::var("SSOGATE_COOKIE_SECURE") {
        if let Some(enabled) = parse_bool(&value) {
            config.sso.cookie.secure = enabled;
        } else {
            warn!(event = "config_invalid", field = "SSOGATE_COOKIE_SECURE", value = %value);
        }
    }
}

pub(super) fn apply_logging_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("LOG_FORMAT") {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => config.logging.format = LogFormat::Json,
            "pretty" | "text" => config.logging.format = LogFormat::Pretty,
            _ => warn!(event = "config_invalid", field = "LOG_FORMAT", value = %value),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
